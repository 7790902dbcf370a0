//! # Logging Adapters
//!
//! The handles application code logs through.
//!
//! - [`LoggingAdapter`]: the generic handle trait with leveled log calls.
//! - [`ContextLoggingAdapter`]: immutable, chainable handle that carries
//!   context properties and resolves the call site.
//! - [`BusLogging`]: the runtime's default handle; plain messages, no context.
//! - [`for_context`] and friends: enrich any handle, upgrading a
//!   [`BusLogging`] into a [`ContextLoggingAdapter`] when needed.
//!
//! Which handles can be enriched is decided by [`AdapterKind`], a closed set
//! every adapter reports through [`LoggingAdapter::kind`].

pub mod bus_logging;
pub mod context;
pub mod enrich;

pub use bus_logging::BusLogging;
pub use context::ContextLoggingAdapter;
pub use enrich::{for_context, for_context_at, for_context_property};

use std::sync::Arc;

use crate::event::{Cause, LogLevel};

/// Shared, type-erased logging handle.
pub type LoggerHandle = Arc<dyn LoggingAdapter>;

/// What kind of handle an adapter is, for enrichment purposes.
pub enum AdapterKind<'a> {
    /// Already context-propagating.
    Context(&'a ContextLoggingAdapter),
    /// The default bus-backed handle; can be upgraded.
    Bus(&'a BusLogging),
    /// Anything else; cannot carry context.
    Other,
}

/// A leveled logging handle.
///
/// Level checks return flags fixed when the adapter was created. The
/// convenience methods check them before calling [`LoggingAdapter::notify_log`],
/// so disabled levels never build or publish an event.
pub trait LoggingAdapter: Send + Sync {
    fn is_enabled(&self, level: LogLevel) -> bool;

    /// Builds and publishes one event, without checking the level.
    fn notify_log(&self, level: LogLevel, message: &str, cause: Option<Cause>);

    fn kind(&self) -> AdapterKind<'_> {
        AdapterKind::Other
    }

    fn is_debug_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Debug)
    }

    fn is_info_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Info)
    }

    fn is_warning_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Warning)
    }

    fn is_error_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Error)
    }

    fn log(&self, level: LogLevel, message: &str) {
        if self.is_enabled(level) {
            self.notify_log(level, message, None);
        }
    }

    fn log_with_cause(&self, level: LogLevel, cause: Cause, message: &str) {
        if self.is_enabled(level) {
            self.notify_log(level, message, Some(cause));
        }
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn error_with_cause(&self, cause: Cause, message: &str) {
        self.log_with_cause(LogLevel::Error, cause, message);
    }
}

/// Level flags computed once from a bus threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EnabledLevels {
    debug: bool,
    info: bool,
    warning: bool,
    error: bool,
}

impl EnabledLevels {
    pub(crate) fn from_threshold(threshold: LogLevel) -> Self {
        Self {
            debug: LogLevel::Debug.passes(threshold),
            info: LogLevel::Info.passes(threshold),
            warning: LogLevel::Warning.passes(threshold),
            error: LogLevel::Error.passes(threshold),
        }
    }

    pub(crate) fn get(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_levels_from_threshold() {
        let flags = EnabledLevels::from_threshold(LogLevel::Warning);
        assert!(!flags.get(LogLevel::Debug));
        assert!(!flags.get(LogLevel::Info));
        assert!(flags.get(LogLevel::Warning));
        assert!(flags.get(LogLevel::Error));
    }
}
