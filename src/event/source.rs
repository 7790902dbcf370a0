use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::BridgeError;

/// Address of an actor, e.g. `/user/orders/worker-1`.
///
/// Cheap to clone; the path text is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorPath(Arc<str>);

impl ActorPath {
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(Arc::from(path.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path of a child actor.
    pub fn child(&self, name: &str) -> Self {
        Self::new(format!("{}/{}", self.0.trim_end_matches('/'), name))
    }
}

impl Serialize for ActorPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl fmt::Display for ActorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The logical originator of log events: a source name plus the qualified
/// name of the owning type (the "log class").
///
/// The log class doubles as the backend logger name and as the scope the
/// caller resolver searches the stack for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogSource {
    source: Arc<str>,
    log_class: Arc<str>,
}

impl LogSource {
    /// Creates a log source. Both parts must be non-blank.
    pub fn new(source: impl AsRef<str>, log_class: impl AsRef<str>) -> Result<Self, BridgeError> {
        let source = source.as_ref();
        let log_class = log_class.as_ref();
        if source.trim().is_empty() {
            return Err(BridgeError::blank("source"));
        }
        if log_class.trim().is_empty() {
            return Err(BridgeError::blank("log_class"));
        }
        Ok(Self {
            source: Arc::from(source),
            log_class: Arc::from(log_class),
        })
    }

    /// Creates a log source whose log class is `T`'s qualified type name.
    pub fn of<T: ?Sized>(source: impl AsRef<str>) -> Result<Self, BridgeError> {
        Self::new(source, std::any::type_name::<T>())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn log_class(&self) -> &str {
        &self.log_class
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.source, self.log_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Worker;

    #[test]
    fn test_blank_parts_are_rejected() {
        assert_eq!(
            LogSource::new("", "a::B"),
            Err(BridgeError::blank("source"))
        );
        assert_eq!(
            LogSource::new("worker", "  "),
            Err(BridgeError::blank("log_class"))
        );
    }

    #[test]
    fn test_log_class_from_type() {
        let source = LogSource::of::<Worker>("worker").unwrap();
        assert_eq!(source.source(), "worker");
        assert!(source.log_class().ends_with("source::tests::Worker"));
    }

    #[test]
    fn test_path_serializes_as_string() {
        let path = ActorPath::new("/user/orders");
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!("/user/orders"));
    }

    #[test]
    fn test_child_path() {
        let parent = ActorPath::new("/user/orders/");
        assert_eq!(parent.child("worker-1").as_str(), "/user/orders/worker-1");
    }
}
