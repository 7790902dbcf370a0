//! Bridge configuration.

use serde::Deserialize;

use crate::bus::DEFAULT_BUS_PATH;
use crate::error::BridgeError;
use crate::event::LogLevel;

/// Default source name the logger actor logs its own notices under.
pub const DEFAULT_LOGGER_SOURCE: &str = "BridgeLogger";

/// Settings for a [`LoggingSystem`](super::LoggingSystem).
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bus threshold; adapters read it once when they are created.
    pub log_level: LogLevel,
    /// Path of the bus, used as the sender of events it publishes.
    pub bus_path: String,
    /// Source name of the logger actor's own adapter.
    pub logger_source: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Debug,
            bus_path: DEFAULT_BUS_PATH.to_string(),
            logger_source: DEFAULT_LOGGER_SOURCE.to_string(),
        }
    }
}

impl BridgeConfig {
    pub const LOG_LEVEL_VAR: &'static str = "BRIDGE_LOG_LEVEL";
    pub const BUS_PATH_VAR: &'static str = "BRIDGE_BUS_PATH";
    pub const LOGGER_SOURCE_VAR: &'static str = "BRIDGE_LOGGER_SOURCE";

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from defaults plus whatever `lookup` returns.
    ///
    /// An unparseable level is an error, never a silent fallback.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BridgeError> {
        let mut config = Self::default();
        if let Some(level) = lookup(Self::LOG_LEVEL_VAR) {
            config.log_level = level.parse()?;
        }
        if let Some(path) = lookup(Self::BUS_PATH_VAR) {
            config.bus_path = path;
        }
        if let Some(source) = lookup(Self::LOGGER_SOURCE_VAR) {
            config.logger_source = source;
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects blank paths and source names.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.bus_path.trim().is_empty() {
            return Err(BridgeError::blank("bus_path"));
        }
        if self.logger_source.trim().is_empty() {
            return Err(BridgeError::blank("logger_source"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: BridgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.bus_path, "/system/event-stream");
    }

    #[test]
    fn test_json_fields() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"log_level": "warn", "logger_source": "Bridge"}"#).unwrap();
        assert_eq!(config.log_level, LogLevel::Warning);
        assert_eq!(config.logger_source, "Bridge");
        assert_eq!(config.bus_path, DEFAULT_BUS_PATH);
    }

    #[test]
    fn test_json_rejects_unknown_level() {
        let result: Result<BridgeConfig, _> = serde_json::from_str(r#"{"log_level": "verbose"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (BridgeConfig::LOG_LEVEL_VAR, "ERROR"),
            (BridgeConfig::BUS_PATH_VAR, "/system/logs"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.bus_path, "/system/logs");
        assert_eq!(config.logger_source, DEFAULT_LOGGER_SOURCE);
    }

    #[test]
    fn test_lookup_errors() {
        assert_eq!(
            BridgeConfig::from_lookup(lookup(&[(BridgeConfig::LOG_LEVEL_VAR, "loud")])),
            Err(BridgeError::UnknownLevel("loud".to_string()))
        );
        assert_eq!(
            BridgeConfig::from_lookup(lookup(&[(BridgeConfig::LOGGER_SOURCE_VAR, " ")])),
            Err(BridgeError::blank("logger_source"))
        );
    }
}
