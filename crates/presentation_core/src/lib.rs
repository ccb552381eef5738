//! Interaction and presentation state for the portfolio page: trigger-once
//! section reveals, the project filter, the contact form and its banners.

pub mod clipboard;
pub mod collection;
pub mod feedback;
pub mod page;
pub mod reveal;
pub mod stagger;
pub mod submission;
pub mod theme;
pub mod transport;

pub use clipboard::{ClipboardWriter, CopyAction};
pub use collection::{Catalog, CatalogItem, FilterError, FilterTransition, FilterableCollection};
pub use feedback::{EphemeralFeedback, FeedbackDurations};
pub use page::{PageEvent, PageParts, PageUpdate, PortfolioPage};
pub use reveal::{RevealController, RevealEvent, RevealThreshold, Section};
pub use stagger::{EntranceSlot, StaggerConfig, StaggeredSequencer};
pub use submission::{ContactForm, ContactFormConfig, FormEvent};
pub use theme::{MemoryThemeStore, ThemePreference, ThemeStore};
pub use transport::{
    HttpSubmissionTransport, SimulatedOutcome, SimulatedTransport, SubmissionTransport,
};
