//! # Caller Resolution
//!
//! Recovers the call site (declaring type, method, file, line) that logically
//! issued a log call, skipping the adapter's own frames.
//!
//! Two mechanisms are available:
//!
//! - **Runtime**: a [`CallerLocator`] searches the stack for the first frame
//!   declared inside the adapter's log class. [`StackLocator`] does this over
//!   a [`CallStack`]; the default stack is a real backtrace.
//! - **Compile time**: [`CallSite::here`] captures file and line through
//!   `#[track_caller]`, with no stack capture at all.
//!
//! [`fill_missing_caller_info`] checks the properties first and does not touch
//! the locator when all four caller keys are already present. Fields the
//! caller supplied are never overwritten.

pub mod stack;

pub use stack::{BacktraceStack, CallStack, Frame};

use std::panic::Location;

use crate::properties::{keys, Properties, Property, PropertyValue};

/// Finds the frame that issued a log call for a given log class.
pub trait CallerLocator: Send + Sync {
    fn locate(&self, log_class: &str) -> Option<Frame>;
}

/// Locates the caller by walking a captured [`CallStack`].
#[derive(Debug, Clone, Default)]
pub struct StackLocator<S = BacktraceStack> {
    stack: S,
}

impl<S: CallStack> StackLocator<S> {
    pub fn new(stack: S) -> Self {
        Self { stack }
    }
}

impl<S: CallStack> CallerLocator for StackLocator<S> {
    fn locate(&self, log_class: &str) -> Option<Frame> {
        self.stack
            .capture()
            .into_iter()
            .find(|frame| frame.is_within(log_class))
    }
}

/// A locator that never finds anything; caller info stays unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocator;

impl CallerLocator for NoLocator {
    fn locate(&self, _log_class: &str) -> Option<Frame> {
        None
    }
}

/// Adds whichever caller-info keys are missing from `properties`.
///
/// Returns without consulting `locator` when all four keys are present.
pub fn fill_missing_caller_info(properties: &mut Properties, log_class: &str, locator: &dyn CallerLocator) {
    if properties.has_caller_info() {
        return;
    }
    let Some(frame) = locator.locate(log_class) else {
        return;
    };

    if let Some(method) = frame.method_name() {
        if let Some(scope) = frame.declaring_scope() {
            set_if_missing(properties, keys::DECLARING_TYPE_NAME, scope);
        }
        set_if_missing(properties, keys::METHOD_NAME, method);
    }
    if let Some(line) = frame.line.filter(|line| *line > 0) {
        set_if_missing(properties, keys::LINE_NUMBER, line);
    }
    if let Some(file) = frame.file {
        set_if_missing(properties, keys::FILE_NAME, file);
    }
}

fn set_if_missing(properties: &mut Properties, key: &str, value: impl Into<PropertyValue>) {
    if !properties.contains_key(key) {
        properties.insert(key, value);
    }
}

/// A call site captured at compile time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallSite {
    pub file_name: Option<&'static str>,
    pub line_number: u32,
    pub method_name: Option<&'static str>,
}

impl CallSite {
    /// The location of the caller of the function this is invoked from.
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self {
            file_name: Some(location.file()),
            line_number: location.line(),
            method_name: None,
        }
    }

    /// A call site with nothing known.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method_name: &'static str) -> Self {
        self.method_name = Some(method_name);
        self
    }

    /// The properties this call site contributes; a zero line is left out.
    pub fn properties(&self) -> Vec<Property> {
        let mut properties = Vec::with_capacity(3);
        if let Some(file) = self.file_name {
            properties.push(Property::new(keys::FILE_NAME, file));
        }
        if self.line_number > 0 {
            properties.push(Property::new(keys::LINE_NUMBER, self.line_number));
        }
        if let Some(method) = self.method_name {
            properties.push(Property::new(keys::METHOD_NAME, method));
        }
        properties
    }
}
