//! Page-level event intake: routes discrete UI events to the owning component
//! and reports what changed.

use std::time::Duration;

use shared::{
    domain::{FieldName, ItemId, SectionId, SubmissionStatus, Theme},
    error::ContactError,
};
use tracing::{debug, warn};

use crate::{
    clipboard::CopyAction,
    collection::{Catalog, FilterTransition, FilterableCollection},
    reveal::{RevealController, RevealThreshold},
    stagger::{
        delays_for_visible, EntranceSlot, StaggerConfig, StaggeredSequencer,
        GRID_ENTRANCE_STAGGER,
    },
    submission::ContactForm,
    theme::ThemePreference,
};

/// Entrance timing per page section as `(anchor, base delay ms, stagger ms)`.
const SECTION_TIMINGS: &[(&str, u64, u64)] = &[
    ("hero", 1200, 100),
    ("about", 600, 100),
    ("skills", 0, 50),
    ("projects", 0, 100),
    ("experience", 0, 200),
    ("education", 0, 150),
    ("contact", 0, 200),
];

pub fn section_stagger(section: &SectionId) -> StaggerConfig {
    SECTION_TIMINGS
        .iter()
        .find(|(anchor, _, _)| *anchor == section.as_str())
        .and_then(|(_, base, stagger)| {
            StaggerConfig::new(
                Duration::from_millis(*base),
                Duration::from_millis(*stagger),
            )
            .ok()
        })
        .unwrap_or_default()
}

pub fn standard_sections() -> impl Iterator<Item = SectionId> {
    SECTION_TIMINGS
        .iter()
        .map(|(anchor, _, _)| SectionId::new(*anchor))
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Intersection { section: SectionId, ratio: f32 },
    SelectCategory(String),
    EditField { field: FieldName, value: String },
    Submit,
    CopyEmail,
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageUpdate {
    Unchanged,
    SectionRevealed {
        section: SectionId,
        entrances: Vec<EntranceSlot>,
    },
    FilterChanged {
        category: String,
        transition: FilterTransition,
        visible: Vec<ItemId>,
        /// Entrance offset for each card in `visible`, in the same order.
        entrance_delays: Vec<Duration>,
    },
    FormStatus {
        status: SubmissionStatus,
        error: Option<String>,
    },
    FormRejected(ContactError),
    Copied,
    ThemeChanged(Theme),
}

pub struct PageParts {
    pub catalog: Catalog,
    pub contact: ContactForm,
    pub copy_email: CopyAction,
    pub theme: ThemePreference,
    pub reveal_threshold: RevealThreshold,
}

pub struct PortfolioPage {
    reveal: RevealController,
    sequencer: StaggeredSequencer,
    projects: FilterableCollection,
    contact: ContactForm,
    copy_email: CopyAction,
    theme: ThemePreference,
    threshold: RevealThreshold,
}

impl PortfolioPage {
    pub fn new(parts: PageParts) -> Self {
        Self {
            reveal: RevealController::new(),
            sequencer: StaggeredSequencer,
            projects: FilterableCollection::new(parts.catalog),
            contact: parts.contact,
            copy_email: parts.copy_email,
            theme: parts.theme,
            threshold: parts.reveal_threshold,
        }
    }

    pub fn mount_section<I, S>(&mut self, section: SectionId, children: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stagger = section_stagger(&section);
        self.reveal.mount_section(section, stagger, children);
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn projects(&self) -> &FilterableCollection {
        &self.projects
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn copy_email(&self) -> &CopyAction {
        &self.copy_email
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub async fn handle(&mut self, event: PageEvent) -> PageUpdate {
        match event {
            PageEvent::Intersection { section, ratio } => {
                let was_revealed = self.reveal.is_revealed(&section);
                if !self.reveal.observe(&section, ratio, self.threshold) || was_revealed {
                    return PageUpdate::Unchanged;
                }
                let entrances = self
                    .reveal
                    .section(&section)
                    .map(|revealed| self.sequencer.schedule(revealed))
                    .unwrap_or_default();
                PageUpdate::SectionRevealed { section, entrances }
            }
            PageEvent::SelectCategory(category) => match self.projects.set_filter(&category) {
                Ok(transition) => {
                    let visible: Vec<ItemId> =
                        self.projects.visible_items().map(|item| item.id).collect();
                    PageUpdate::FilterChanged {
                        entrance_delays: delays_for_visible(visible.len(), GRID_ENTRANCE_STAGGER),
                        visible,
                        category,
                        transition,
                    }
                }
                Err(err) => {
                    warn!(error = %err, "ignoring filter selection");
                    PageUpdate::Unchanged
                }
            },
            PageEvent::EditField { field, value } => {
                match self.contact.update_field(field, value).await {
                    Ok(()) => self.form_status().await,
                    Err(err) => {
                        debug!(error = %err, %field, "edit rejected");
                        PageUpdate::FormRejected(err)
                    }
                }
            }
            // Delivery continues in the background; its outcome arrives on the
            // form's event channel.
            PageEvent::Submit => match self.contact.start_submit().await {
                Ok(_delivery) => self.form_status().await,
                Err(err) => {
                    debug!(error = %err, "submit rejected");
                    PageUpdate::FormRejected(err)
                }
            },
            PageEvent::CopyEmail => {
                self.copy_email.copy();
                PageUpdate::Copied
            }
            PageEvent::ToggleTheme => PageUpdate::ThemeChanged(self.theme.toggle()),
        }
    }

    async fn form_status(&self) -> PageUpdate {
        PageUpdate::FormStatus {
            status: self.contact.status().await,
            error: self.contact.error_message().await,
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
