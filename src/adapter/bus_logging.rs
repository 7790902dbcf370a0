//! The runtime's default bus-backed adapter.

use super::{AdapterKind, EnabledLevels, LoggingAdapter};
use crate::bus::LoggingBus;
use crate::event::{Cause, LogEvent, LogLevel, LogMessage, LogSource};

/// Publishes plain messages to the bus with no context and no caller info.
///
/// This is what the runtime hands out when nothing asks for a
/// [`ContextLoggingAdapter`](super::ContextLoggingAdapter).
/// [`for_context`](super::for_context) upgrades it to one bound to the same
/// bus and log source.
#[derive(Debug, Clone)]
pub struct BusLogging {
    bus: LoggingBus,
    log_source: LogSource,
    enabled: EnabledLevels,
}

impl BusLogging {
    pub fn new(bus: LoggingBus, log_source: LogSource) -> Self {
        let enabled = EnabledLevels::from_threshold(bus.level());
        Self {
            bus,
            log_source,
            enabled,
        }
    }

    pub fn bus(&self) -> &LoggingBus {
        &self.bus
    }

    pub fn log_source(&self) -> &LogSource {
        &self.log_source
    }
}

impl LoggingAdapter for BusLogging {
    fn is_enabled(&self, level: LogLevel) -> bool {
        self.enabled.get(level)
    }

    fn notify_log(&self, level: LogLevel, message: &str, cause: Option<Cause>) {
        self.bus.publish(LogEvent::new(
            level,
            self.log_source.clone(),
            LogMessage::Plain(message.to_string()),
            cause,
        ));
    }

    fn kind(&self) -> AdapterKind<'_> {
        AdapterKind::Bus(self)
    }
}
