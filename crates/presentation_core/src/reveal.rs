//! Trigger-once reveal of page sections driven by viewport intersection ratios.

use std::collections::HashMap;

use tokio::sync::broadcast;
use tracing::{debug, info};

use shared::domain::SectionId;

use crate::stagger::StaggerConfig;

pub const DEFAULT_REVEAL_THRESHOLD: f32 = 0.1;
const REVEAL_EVENT_CAPACITY: usize = 64;

/// Minimum visible fraction of a section before it reveals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealThreshold(f32);

impl RevealThreshold {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_crossed_by(self, ratio: f32) -> bool {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.max(0.0) };
        ratio >= self.0
    }
}

impl Default for RevealThreshold {
    fn default() -> Self {
        Self(DEFAULT_REVEAL_THRESHOLD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatableElement {
    pub owner: SectionId,
    pub key: String,
    pub order: usize,
}

impl AnimatableElement {
    pub fn reveal_delay(&self, stagger: &StaggerConfig) -> std::time::Duration {
        stagger.delay_for(self.order)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub revealed: bool,
    pub stagger: StaggerConfig,
    pub children: Vec<AnimatableElement>,
}

impl Section {
    pub fn new(id: SectionId, stagger: StaggerConfig) -> Self {
        Self {
            id,
            revealed: false,
            stagger,
            children: Vec::new(),
        }
    }

    pub fn push_child(&mut self, key: impl Into<String>) -> &AnimatableElement {
        let order = self.children.len();
        self.children.push(AnimatableElement {
            owner: self.id.clone(),
            key: key.into(),
            order,
        });
        &self.children[order]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    Revealed { section: Section },
}

pub struct RevealController {
    sections: HashMap<SectionId, Section>,
    events: broadcast::Sender<RevealEvent>,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealController {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(REVEAL_EVENT_CAPACITY);
        Self {
            sections: HashMap::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RevealEvent> {
        self.events.subscribe()
    }

    /// Registers a section and its children. Re-mounting a known section keeps
    /// its children and its reveal state.
    pub fn mount_section<I, S>(&mut self, id: SectionId, stagger: StaggerConfig, children: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.sections.contains_key(&id) {
            debug!(section = %id, "section already mounted");
            return;
        }
        let mut section = Section::new(id.clone(), stagger);
        for child in children {
            section.push_child(child);
        }
        self.sections.insert(id, section);
    }

    pub fn observe(
        &mut self,
        section_id: &SectionId,
        ratio: f32,
        threshold: RevealThreshold,
    ) -> bool {
        let section = self
            .sections
            .entry(section_id.clone())
            .or_insert_with(|| Section::new(section_id.clone(), StaggerConfig::default()));

        if section.revealed {
            return true;
        }
        if !threshold.is_crossed_by(ratio) {
            return false;
        }

        section.revealed = true;
        info!(
            section = %section_id,
            ratio,
            threshold = threshold.value(),
            children = section.children.len(),
            "section revealed"
        );
        // No subscribers is fine; the flag itself is the source of truth.
        let _ = self.events.send(RevealEvent::Revealed {
            section: section.clone(),
        });
        true
    }

    pub fn is_revealed(&self, section_id: &SectionId) -> bool {
        self.sections
            .get(section_id)
            .map(|section| section.revealed)
            .unwrap_or(false)
    }

    pub fn section(&self, section_id: &SectionId) -> Option<&Section> {
        self.sections.get(section_id)
    }
}

#[cfg(test)]
#[path = "tests/reveal_tests.rs"]
mod tests;
