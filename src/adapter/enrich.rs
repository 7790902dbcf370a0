//! Enriching arbitrary logging handles with context.
//!
//! These functions accept any [`LoggerHandle`]. A context adapter is enriched
//! directly, a [`BusLogging`](super::BusLogging) is first upgraded into a
//! [`ContextLoggingAdapter`] on the same bus and log source, and any other
//! handle gets a warning logged through it and is returned unchanged.

use std::sync::Arc;

use super::{AdapterKind, ContextLoggingAdapter, LoggerHandle};
use crate::caller::CallSite;
use crate::properties::{Property, PropertyValue};

const NOT_ENRICHABLE: &str =
    "Cannot enrich log event with properties because the adapter is neither a ContextLoggingAdapter nor a BusLogging";

/// Adds `properties`, plus the caller's file and line, to `adapter`.
#[track_caller]
pub fn for_context<I, P>(adapter: &LoggerHandle, properties: I) -> LoggerHandle
where
    I: IntoIterator<Item = P>,
    P: Into<Property>,
{
    for_context_at(adapter, properties, CallSite::here())
}

/// Adds one property, plus the caller's file and line, to `adapter`.
#[track_caller]
pub fn for_context_property(
    adapter: &LoggerHandle,
    key: impl Into<String>,
    value: impl Into<PropertyValue>,
) -> LoggerHandle {
    for_context_at(adapter, [Property::new(key, value)], CallSite::here())
}

/// Adds the call site's properties, then `properties`, to `adapter`.
///
/// Returns the very same handle when `adapter` is already a context adapter
/// and there is nothing to add, or when it cannot carry context at all.
pub fn for_context_at<I, P>(adapter: &LoggerHandle, properties: I, call_site: CallSite) -> LoggerHandle
where
    I: IntoIterator<Item = P>,
    P: Into<Property>,
{
    let (base, upgraded) = match adapter.kind() {
        AdapterKind::Context(context) => (context.clone(), false),
        AdapterKind::Bus(bus) => (
            ContextLoggingAdapter::new(bus.bus().clone(), bus.log_source().clone()),
            true,
        ),
        AdapterKind::Other => {
            adapter.warning(NOT_ENRICHABLE);
            return Arc::clone(adapter);
        }
    };

    let enriched = base
        .with_properties(call_site.properties())
        .with_properties(properties);
    if !upgraded && enriched.ptr_eq(&base) {
        return Arc::clone(adapter);
    }
    Arc::new(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{BusLogging, LoggingAdapter};
    use crate::bus::LoggingBus;
    use crate::caller::NoLocator;
    use crate::event::{Cause, LogLevel, LogSource};
    use crate::properties::keys;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingAdapter {
        messages: Mutex<Vec<(LogLevel, String)>>,
    }

    impl LoggingAdapter for RecordingAdapter {
        fn is_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn notify_log(&self, level: LogLevel, message: &str, _cause: Option<Cause>) {
            self.messages.lock().unwrap().push((level, message.to_string()));
        }
    }

    fn source() -> LogSource {
        LogSource::new("enrich", "app::Enrich").unwrap()
    }

    fn context_handle() -> LoggerHandle {
        let adapter = ContextLoggingAdapter::new(LoggingBus::new(LogLevel::Debug), source())
            .with_locator(Arc::new(NoLocator));
        Arc::new(adapter)
    }

    fn context_properties(handle: &LoggerHandle) -> crate::properties::Properties {
        match handle.kind() {
            AdapterKind::Context(context) => context.context_properties(),
            _ => panic!("expected a context adapter"),
        }
    }

    #[test]
    fn test_nothing_to_add_returns_same_handle() {
        let handle = context_handle();
        let enriched = for_context_at(&handle, Vec::<Property>::new(), CallSite::none());
        assert!(Arc::ptr_eq(&enriched, &handle));
    }

    #[test]
    fn test_call_site_is_recorded() {
        let handle = context_handle();
        let enriched = for_context(&handle, Vec::<Property>::new());

        assert!(!Arc::ptr_eq(&enriched, &handle));
        let properties = context_properties(&enriched);
        assert_eq!(properties.file_name(), Some(file!()));
        assert!(properties.line_number().is_some_and(|line| line > 0));
        assert!(!properties.contains_key(keys::METHOD_NAME));
    }

    #[test]
    fn test_properties_follow_call_site() {
        let handle = context_handle();
        let enriched = for_context(&handle, [("key1", "value1"), ("key2", "value2")]);

        let properties = context_properties(&enriched);
        let keys: Vec<_> = properties.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["FileName", "LineNumber", "key1", "key2"]);
    }

    #[test]
    fn test_single_property_with_method() {
        let handle = context_handle();
        let site = CallSite::here().with_method("test_single_property_with_method");
        let enriched = for_context_at(&handle, [("key", "value")], site);

        let properties = context_properties(&enriched);
        assert_eq!(properties.method_name(), Some("test_single_property_with_method"));
        assert_eq!(properties.get("key"), Some(&PropertyValue::from("value")));

        let single = for_context_property(&handle, "key", "value");
        assert!(context_properties(&single).contains_key("key"));
    }

    #[test]
    fn test_bus_logging_is_upgraded() {
        let bus = LoggingBus::new(LogLevel::Info);
        let handle: LoggerHandle = Arc::new(BusLogging::new(bus.clone(), source()));

        let enriched = for_context_at(&handle, Vec::<Property>::new(), CallSite::none());

        assert!(!Arc::ptr_eq(&enriched, &handle));
        match enriched.kind() {
            AdapterKind::Context(context) => {
                assert!(context.bus().ptr_eq(&bus));
                assert_eq!(context.log_source(), &source());
                assert!(!context.is_debug_enabled());
            }
            _ => panic!("expected an upgraded adapter"),
        }
    }

    #[test]
    fn test_other_adapters_get_a_warning() {
        let recorder = Arc::new(RecordingAdapter::default());
        let handle: LoggerHandle = recorder.clone();

        let result = for_context(&handle, [("key", "value")]);

        assert!(Arc::ptr_eq(&result, &handle));
        let messages = recorder.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], (LogLevel::Warning, NOT_ENRICHABLE.to_string()));
    }
}
