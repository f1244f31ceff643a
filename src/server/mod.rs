//! Local HTTP server that shows a note to the human and collects a decision.

pub mod activity;
pub mod protocol;
pub mod routes;
pub mod save;
#[allow(clippy::module_inception)]
pub mod server;
pub mod shell;

pub use activity::ActivityClock;
pub use protocol::{Ack, ContentResponse, FeedbackRequest, SaveRequest, SaveResponse};
pub use routes::{router, AppState};
pub use save::{write_note, SaveError};
pub use server::{shutdown_signal, ReviewInterrupted, ReviewServer};
