//! Entrance timing for the children of a revealed section.

use std::time::Duration;

use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use shared::domain::SectionId;

use crate::reveal::Section;

pub const DEFAULT_STAGGER: Duration = Duration::from_millis(100);
/// Per-card offset used when filter results re-enter the grid.
pub const GRID_ENTRANCE_STAGGER: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stagger must be a positive duration")]
pub struct StaggerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggerConfig {
    base_delay: Duration,
    stagger: Duration,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::ZERO,
            stagger: DEFAULT_STAGGER,
        }
    }
}

impl StaggerConfig {
    pub fn new(base_delay: Duration, stagger: Duration) -> Result<Self, StaggerError> {
        if stagger.is_zero() {
            return Err(StaggerError);
        }
        Ok(Self {
            base_delay,
            stagger,
        })
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    pub fn delay_for(&self, order: usize) -> Duration {
        let order = u32::try_from(order).unwrap_or(u32::MAX);
        self.base_delay
            .saturating_add(self.stagger.saturating_mul(order))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntranceSlot {
    pub element: String,
    pub order: usize,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntranceStarted {
    pub section_id: SectionId,
    pub element: String,
    pub order: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StaggeredSequencer;

impl StaggeredSequencer {
    pub fn schedule(&self, section: &Section) -> Vec<EntranceSlot> {
        section
            .children
            .iter()
            .map(|child| EntranceSlot {
                element: child.key.clone(),
                order: child.order,
                delay: child.reveal_delay(&section.stagger),
            })
            .collect()
    }

    /// Starts every child's timer at once; each reports to `sink` when its own
    /// delay elapses, independent of its siblings.
    pub fn play(
        &self,
        section_id: &SectionId,
        schedule: Vec<EntranceSlot>,
        sink: mpsc::UnboundedSender<EntranceStarted>,
    ) -> Vec<JoinHandle<()>> {
        schedule
            .into_iter()
            .map(|slot| {
                let sink = sink.clone();
                let section_id = section_id.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(slot.delay).await;
                    debug!(section = %section_id, element = %slot.element, "entrance started");
                    let _ = sink.send(EntranceStarted {
                        section_id,
                        element: slot.element,
                        order: slot.order,
                    });
                })
            })
            .collect()
    }
}

pub fn delays_for_visible(count: usize, stagger: Duration) -> Vec<Duration> {
    (0..count)
        .map(|index| stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX)))
        .collect()
}

#[cfg(test)]
#[path = "tests/stagger_tests.rs"]
mod tests;
