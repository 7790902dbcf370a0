//! Lifecycle management for the log bridge.
//!
//! - [`BridgeConfig`] - Bus threshold, bus path and the logger's own source name
//! - [`LoggingSystem`] - Starts the bus and the logger actor, hands out adapters,
//!   and shuts everything down
//! - [`setup_tracing`] - Initializes the crate's own diagnostics

pub mod config;
pub mod system;
pub mod tracing;

pub use self::config::{BridgeConfig, DEFAULT_LOGGER_SOURCE};
pub use self::system::LoggingSystem;
pub use self::tracing::{setup_tracing, try_setup_tracing};
