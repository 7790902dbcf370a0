//! An in-memory backend that keeps every event it is given.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::{BackendLogger, LoggerProvider, LoggingEvent};

/// Records events from all of its loggers into one shared, ordered buffer.
///
/// Clones share the buffer, so a test can keep one handle and give another
/// to the logging system.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    events: Arc<Mutex<Vec<LoggingEvent>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<LoggingEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Drains the buffer.
    pub fn take(&self) -> Vec<LoggingEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LoggerProvider for MemoryProvider {
    fn logger(&self, name: &str) -> Arc<dyn BackendLogger> {
        Arc::new(MemoryLogger {
            name: name.to_string(),
            events: self.events.clone(),
        })
    }
}

/// A named view onto a [`MemoryProvider`]'s buffer.
#[derive(Debug)]
pub struct MemoryLogger {
    name: String,
    events: Arc<Mutex<Vec<LoggingEvent>>>,
}

#[async_trait]
impl BackendLogger for MemoryLogger {
    fn name(&self) -> &str {
        &self.name
    }

    async fn log(&self, event: LoggingEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Level, LocationInfo, NOT_AVAILABLE};
    use crate::properties::Properties;
    use chrono::Utc;

    fn event(message: &str) -> LoggingEvent {
        LoggingEvent {
            level: Level::Info,
            logger_name: "app::Worker".to_string(),
            timestamp: Utc::now(),
            message: message.to_string(),
            thread_name: "main".to_string(),
            exception: None,
            location: LocationInfo::new(NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE),
            properties: Properties::new(),
        }
    }

    #[tokio::test]
    async fn test_loggers_share_one_buffer() {
        let provider = MemoryProvider::new();
        provider.logger("a").log(event("first")).await;
        provider.clone().logger("b").log(event("second")).await;

        let messages: Vec<_> = provider.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_take_drains() {
        let provider = MemoryProvider::new();
        provider.logger("a").log(event("only")).await;

        assert_eq!(provider.take().len(), 1);
        assert!(provider.is_empty());
    }
}
