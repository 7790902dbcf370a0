//! A backend that re-emits translated events through `tracing`.

use std::sync::Arc;

use async_trait::async_trait;

use super::{BackendLogger, Level, LoggerProvider, LoggingEvent};

/// Hands out [`TracingLogger`]s; every name maps to a fresh, stateless logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProvider;

impl LoggerProvider for TracingProvider {
    fn logger(&self, name: &str) -> Arc<dyn BackendLogger> {
        Arc::new(TracingLogger {
            name: name.to_string(),
        })
    }
}

/// Writes each event as a `tracing` event at the mapped level.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

#[async_trait]
impl BackendLogger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    async fn log(&self, event: LoggingEvent) {
        let LoggingEvent {
            level,
            logger_name,
            message,
            thread_name,
            exception,
            location,
            properties,
            ..
        } = event;
        match level {
            Level::Debug => ::tracing::debug!(
                logger = %logger_name, location = %location, thread = %thread_name,
                exception = ?exception, properties = %properties, "{message}"
            ),
            Level::Info => ::tracing::info!(
                logger = %logger_name, location = %location, thread = %thread_name,
                exception = ?exception, properties = %properties, "{message}"
            ),
            Level::Warn => ::tracing::warn!(
                logger = %logger_name, location = %location, thread = %thread_name,
                exception = ?exception, properties = %properties, "{message}"
            ),
            Level::Error => ::tracing::error!(
                logger = %logger_name, location = %location, thread = %thread_name,
                exception = ?exception, properties = %properties, "{message}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_is_named() {
        let logger = TracingProvider.logger("app::Worker");
        assert_eq!(logger.name(), "app::Worker");
    }
}
