pub mod reader;
pub mod types;

pub use reader::{into_session, parse_event, read_event, EventError};
pub use types::{ReviewEvent, ToolInput};
