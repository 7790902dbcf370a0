use std::error::Error;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{LogLevel, LogSource};
use crate::properties::Properties;

/// The error attached to a log event, shared so events stay cheap to clone.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// A message enriched with the context properties in effect when it was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    message: String,
    properties: Properties,
}

impl Payload {
    pub fn new(message: impl Into<String>, properties: Properties) -> Self {
        Self {
            message: message.into(),
            properties,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl From<String> for Payload {
    fn from(message: String) -> Self {
        Payload::new(message, Properties::new())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What a log event carries: a bare message or an enriched [`Payload`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogMessage {
    Plain(String),
    Enriched(Payload),
}

impl LogMessage {
    /// Splits the message into its text and its properties; plain messages
    /// have none.
    pub fn parts(&self) -> (&str, Option<&Properties>) {
        match self {
            LogMessage::Plain(message) => (message, None),
            LogMessage::Enriched(payload) => (payload.message(), Some(payload.properties())),
        }
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMessage::Plain(message) => f.write_str(message),
            LogMessage::Enriched(payload) => write!(f, "{payload}"),
        }
    }
}

/// A log event as it travels over the bus.
///
/// Built once at the call site and never modified afterwards.
#[derive(Debug, Clone)]
pub struct LogEvent {
    level: LogLevel,
    log_source: LogSource,
    message: LogMessage,
    cause: Option<Cause>,
    timestamp: DateTime<Utc>,
    thread: String,
}

impl LogEvent {
    /// Creates an event stamped with the current time and thread.
    pub fn new(level: LogLevel, log_source: LogSource, message: LogMessage, cause: Option<Cause>) -> Self {
        Self {
            level,
            log_source,
            message,
            cause,
            timestamp: Utc::now(),
            thread: current_thread_label(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn log_source(&self) -> &LogSource {
        &self.log_source
    }

    pub fn message(&self) -> &LogMessage {
        &self.message
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Name of the thread the event was created on, or its id when unnamed.
    pub fn thread(&self) -> &str {
        &self.thread
    }
}

pub(crate) fn current_thread_label() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

/// Renders a cause and its `source()` chain as `outer: inner: root`.
pub fn render_cause(cause: &(dyn Error + 'static)) -> String {
    let mut text = cause.to_string();
    let mut source = cause.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct RequestFailed(#[source] io::Error);

    #[test]
    fn test_payload_displays_message() {
        let payload = Payload::new("message", Properties::new());
        assert_eq!(payload.to_string(), "message");
        assert!(payload.properties().is_empty());
    }

    #[test]
    fn test_plain_message_has_no_properties() {
        let message = LogMessage::Plain("hello".to_string());
        assert_eq!(message.parts(), ("hello", None));
    }

    #[test]
    fn test_cause_chain_is_rendered() {
        let cause = RequestFailed(io::Error::new(io::ErrorKind::TimedOut, "socket timed out"));
        assert_eq!(render_cause(&cause), "request failed: socket timed out");
    }

    #[test]
    fn test_event_records_thread() {
        let source = LogSource::new("worker", "app::Worker").unwrap();
        let event = LogEvent::new(LogLevel::Info, source, LogMessage::Plain("hi".into()), None);
        assert_eq!(event.thread(), current_thread_label());
        assert!(event.cause().is_none());
    }
}
