//! Error types for the log bridge.

use thiserror::Error;

/// Errors surfaced by the bridge to its immediate caller.
///
/// All of these are local and synchronous. Once an event is on the bus,
/// delivery problems belong to the receiving logger and are never reported
/// back to the adapter that published it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BridgeError {
    /// A required argument was missing or blank.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A raw level value does not name one of the four log levels.
    #[error("Log level out of range: {0}")]
    LevelOutOfRange(u8),

    /// A level name could not be parsed.
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// The logger actor's mailbox is closed.
    #[error("Logger actor closed")]
    ActorClosed,

    /// The logger actor dropped the response channel.
    #[error("Logger actor dropped response channel")]
    ActorDropped,

    /// The logger task panicked or was cancelled.
    #[error("Logger task failed: {0}")]
    TaskFailed(String),
}

impl BridgeError {
    pub(crate) fn blank(name: &'static str) -> Self {
        BridgeError::InvalidArgument {
            name,
            reason: "must not be empty".to_string(),
        }
    }
}
