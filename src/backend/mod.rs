//! # Logging Backend
//!
//! The downstream side of the bridge: the native event shape and the two
//! capabilities the bridge needs from a backend.
//!
//! - [`LoggerProvider`]: look a logger up by name.
//! - [`BackendLogger`]: record one [`LoggingEvent`].
//!
//! Two providers ship with the crate: [`TracingProvider`], which re-emits
//! events through `tracing`, and [`MemoryProvider`], which keeps them for
//! inspection.

pub mod memory;
pub mod tracing;

pub use self::memory::MemoryProvider;
pub use self::tracing::TracingProvider;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::event::LogLevel;
use crate::properties::Properties;

/// Placeholder for location fields that could not be determined.
pub const NOT_AVAILABLE: &str = "?";

/// Backend severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warning => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// Where the log call was made. Unknown parts are [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationInfo {
    pub class_name: String,
    pub method_name: String,
    pub file_name: String,
    pub line_number: String,
}

impl LocationInfo {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        file_name: impl Into<String>,
        line_number: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            file_name: file_name.into(),
            line_number: line_number.into(),
        }
    }
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({}:{})",
            self.class_name, self.method_name, self.file_name, self.line_number
        )
    }
}

/// A log event in the backend's own terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingEvent {
    pub level: Level,
    pub logger_name: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub thread_name: String,
    pub exception: Option<String>,
    pub location: LocationInfo,
    pub properties: Properties,
}

/// A named backend logger.
#[async_trait]
pub trait BackendLogger: Send + Sync {
    fn name(&self) -> &str;

    async fn log(&self, event: LoggingEvent);
}

/// Looks loggers up by qualified name.
pub trait LoggerProvider: Send + Sync {
    fn logger(&self, name: &str) -> Arc<dyn BackendLogger>;
}
