//! folio core - section tracking, frame scheduling and content model
//!
//! This crate holds the behaviour behind the portfolio page:
//! - the fixed set of page sections and their geometry
//! - the scroll tracker that decides which section is active
//! - a frame clock with cancellable requests and the animated counter on top of it
//! - smooth scrolling and navigation state
//! - the static portfolio content
//!
//! Everything here is single-threaded: shared cells are `Rc`/`RefCell`/`Cell`
//! and every subscription or frame request is an RAII handle.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,  // Often necessary for clarity
    clippy::cast_precision_loss,      // Counter targets are display values
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
)]

pub mod bus;
pub mod content;
pub mod counter;
pub mod frame;
pub mod layout;
pub mod nav;
pub mod section;
pub mod smooth;
pub mod tracker;
pub mod viewport;

pub use bus::{ScrollBus, ScrollEvent, Subscription};
pub use content::Portfolio;
pub use counter::{AnimatedCounter, CounterSpec};
pub use frame::{FrameClock, FrameHandle};
pub use layout::{PageLayout, SectionBounds, SectionLayout};
pub use nav::Navigator;
pub use section::SectionId;
pub use smooth::SmoothScroll;
pub use tracker::{locate_section, ActiveSection, MountedTracker, ScrollTracker};
pub use viewport::Viewport;

/// Result type used throughout folio core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for folio core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Portfolio content could not be loaded or exported
    #[error("Content error: {0}")]
    Content(String),
}

impl From<folio_utils::UtilError> for Error {
    fn from(err: folio_utils::UtilError) -> Self {
        match err {
            folio_utils::UtilError::Io(e) => Self::Io(e),
            other => Self::Content(other.to_string()),
        }
    }
}
