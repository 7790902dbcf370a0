//! Log events and their parts: levels, sources, messages and causes.

pub mod level;
pub mod log_event;
pub mod source;

pub use level::LogLevel;
pub use log_event::{render_cause, Cause, LogEvent, LogMessage, Payload};
pub use source::{ActorPath, LogSource};
