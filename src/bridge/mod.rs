//! Bridge between the download worker and the UI thread

pub mod messages;
pub mod queue;

pub use messages::{SessionOutcome, Severity, UiUpdate};
pub use queue::{channel, UpdateQueue, UpdateSender, POLL_INTERVAL};
