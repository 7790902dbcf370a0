//! # Context Properties
//!
//! Named values attached to log events.
//!
//! - [`Property`]: one key/value pair.
//! - [`Properties`]: a merged, point-in-time snapshot keyed by name.
//! - [`PropertyChain`]: the persistent list of property deltas an adapter
//!   carries around; see [`chain`].
//!
//! The [`keys`] module lists the names the bridge itself reads and writes.

pub mod chain;

pub use chain::PropertyChain;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::event::ActorPath;

/// Property names with a meaning to the bridge.
pub mod keys {
    /// Path of the actor that delivered the event.
    pub const ACTOR_PATH: &str = "ActorPath";
    /// Qualified name of the type that issued the log call.
    pub const DECLARING_TYPE_NAME: &str = "DeclaringTypeName";
    pub const FILE_NAME: &str = "FileName";
    pub const LINE_NUMBER: &str = "LineNumber";
    /// Source name of the adapter that created the event.
    pub const LOG_SOURCE: &str = "LogSource";
    pub const METHOD_NAME: &str = "MethodName";

    /// The four keys that together describe the call site.
    pub const CALLER_INFO: [&str; 4] = [DECLARING_TYPE_NAME, FILE_NAME, LINE_NUMBER, METHOD_NAME];
}

/// Value of a context property.
///
/// `Null` is a legal value and is distinct from the key being absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(ActorPath),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(n) => write!(f, "{n}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
            PropertyValue::Str(s) => f.write_str(s),
            PropertyValue::Path(p) => write!(f, "{p}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<ActorPath> for PropertyValue {
    fn from(value: ActorPath) -> Self {
        PropertyValue::Path(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Into::into)
    }
}

/// A single named property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> From<(K, V)> for Property {
    fn from((key, value): (K, V)) -> Self {
        Property::new(key, value)
    }
}

/// A snapshot of merged properties, one value per key, in first-insertion order.
///
/// Snapshots handed out by an adapter are never modified afterwards; the
/// mutating methods are crate-internal and used only while a snapshot is
/// being assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Properties {
    entries: IndexMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when every caller-info key is present.
    pub fn has_caller_info(&self) -> bool {
        keys::CALLER_INFO.iter().all(|key| self.contains_key(key))
    }

    pub fn declaring_type_name(&self) -> Option<&str> {
        self.get(keys::DECLARING_TYPE_NAME).and_then(PropertyValue::as_str)
    }

    pub fn method_name(&self) -> Option<&str> {
        self.get(keys::METHOD_NAME).and_then(PropertyValue::as_str)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.get(keys::FILE_NAME).and_then(PropertyValue::as_str)
    }

    /// The line number, only when stored as an integer.
    pub fn line_number(&self) -> Option<i64> {
        self.get(keys::LINE_NUMBER).and_then(PropertyValue::as_int)
    }

    pub fn actor_path(&self) -> Option<&ActorPath> {
        match self.get(keys::ACTOR_PATH) {
            Some(PropertyValue::Path(path)) => Some(path),
            _ => None,
        }
    }

    pub fn log_source(&self) -> Option<&str> {
        self.get(keys::LOG_SOURCE).and_then(PropertyValue::as_str)
    }

    /// Sets a key, replacing any previous value in place.
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Overlays `other` on top of `self`: keys in `other` win.
    pub(crate) fn overlay(&mut self, other: &Properties) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

impl<P: Into<Property>> FromIterator<P> for Properties {
    /// Later pairs win over earlier pairs with the same key.
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for property in iter {
            let Property { key, value } = property.into();
            properties.insert(key, value);
        }
        properties
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = indexmap::map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}
