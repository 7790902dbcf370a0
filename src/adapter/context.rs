//! The context-propagating adapter.

use std::fmt;
use std::sync::Arc;

use super::{AdapterKind, EnabledLevels, LoggingAdapter};
use crate::bus::LoggingBus;
use crate::caller::{fill_missing_caller_info, BacktraceStack, CallerLocator, StackLocator};
use crate::event::{Cause, LogEvent, LogLevel, LogMessage, LogSource, Payload};
use crate::properties::{Properties, Property, PropertyChain, PropertyValue};

struct Inner {
    bus: LoggingBus,
    log_source: LogSource,
    chain: PropertyChain,
    enabled: EnabledLevels,
    locator: Arc<dyn CallerLocator>,
}

/// An immutable logging handle that carries context properties.
///
/// Every `with_*` call returns a new adapter and leaves `self` untouched, so
/// one base adapter can be shared freely between tasks and each derivation
/// sees only its own additions. Cloning is cheap and keeps identity:
/// a clone is [`ptr_eq`](ContextLoggingAdapter::ptr_eq) to its original.
///
/// Level flags are read from the bus once, when the adapter is built. Later
/// changes to the bus threshold are not seen by existing adapters.
///
/// # Example
/// ```
/// use actor_log_bridge::adapter::{ContextLoggingAdapter, LoggingAdapter};
/// use actor_log_bridge::bus::LoggingBus;
/// use actor_log_bridge::event::{LogLevel, LogSource};
///
/// let bus = LoggingBus::new(LogLevel::Debug);
/// let log = ContextLoggingAdapter::new(bus, LogSource::new("orders", "app::Orders").unwrap());
///
/// let log = log.with_property("order_id", 42);
/// log.info("order accepted");
/// ```
#[derive(Clone)]
pub struct ContextLoggingAdapter {
    inner: Arc<Inner>,
}

impl ContextLoggingAdapter {
    /// Binds an adapter to `bus` and `log_source`, resolving callers from a
    /// captured backtrace.
    pub fn new(bus: LoggingBus, log_source: LogSource) -> Self {
        Self::build(bus, log_source, PropertyChain::empty(), Arc::new(StackLocator::new(BacktraceStack)))
    }

    fn build(
        bus: LoggingBus,
        log_source: LogSource,
        chain: PropertyChain,
        locator: Arc<dyn CallerLocator>,
    ) -> Self {
        let enabled = EnabledLevels::from_threshold(bus.level());
        Self {
            inner: Arc::new(Inner {
                bus,
                log_source,
                chain,
                enabled,
                locator,
            }),
        }
    }

    fn derive(&self, chain: PropertyChain) -> Self {
        Self::build(
            self.inner.bus.clone(),
            self.inner.log_source.clone(),
            chain,
            self.inner.locator.clone(),
        )
    }

    /// Returns an adapter that resolves callers with `locator`.
    pub fn with_locator(&self, locator: Arc<dyn CallerLocator>) -> Self {
        Self::build(
            self.inner.bus.clone(),
            self.inner.log_source.clone(),
            self.inner.chain.clone(),
            locator,
        )
    }

    pub fn bus(&self) -> &LoggingBus {
        &self.inner.bus
    }

    pub fn log_source(&self) -> &LogSource {
        &self.inner.log_source
    }

    pub fn chain(&self) -> &PropertyChain {
        &self.inner.chain
    }

    /// True when both handles are the same adapter instance.
    pub fn ptr_eq(&self, other: &ContextLoggingAdapter) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a new adapter with one more context property.
    pub fn with_property(&self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.derive(self.inner.chain.append(Property::new(key, value)))
    }

    /// Returns a new adapter with `properties` appended in order.
    ///
    /// When `properties` is empty, returns `self` (a clone that is
    /// [`ptr_eq`](ContextLoggingAdapter::ptr_eq) to it) instead of a new adapter.
    pub fn with_properties<I, P>(&self, properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Property>,
    {
        let chain = self.inner.chain.append_all(properties);
        if chain.ptr_eq(&self.inner.chain) {
            self.clone()
        } else {
            self.derive(chain)
        }
    }

    /// The merged context properties, most recent value per key.
    pub fn context_properties(&self) -> Properties {
        self.inner.chain.to_properties()
    }

    /// Builds the payload for `message`: context properties plus whatever
    /// caller info can be resolved from the current stack.
    pub fn build_message(&self, message: &str) -> Payload {
        let mut properties = self.context_properties();
        fill_missing_caller_info(
            &mut properties,
            self.inner.log_source.log_class(),
            self.inner.locator.as_ref(),
        );
        Payload::new(message, properties)
    }

    /// Builds the event a log call at `level` would publish.
    pub fn create_log_event(&self, level: LogLevel, message: &str, cause: Option<Cause>) -> LogEvent {
        LogEvent::new(
            level,
            self.inner.log_source.clone(),
            LogMessage::Enriched(self.build_message(message)),
            cause,
        )
    }
}

impl LoggingAdapter for ContextLoggingAdapter {
    fn is_enabled(&self, level: LogLevel) -> bool {
        self.inner.enabled.get(level)
    }

    fn notify_log(&self, level: LogLevel, message: &str, cause: Option<Cause>) {
        self.inner.bus.publish(self.create_log_event(level, message, cause));
    }

    fn kind(&self) -> AdapterKind<'_> {
        AdapterKind::Context(self)
    }
}

impl fmt::Debug for ContextLoggingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLoggingAdapter")
            .field("log_source", &self.inner.log_source)
            .field("chain", &self.inner.chain)
            .field("enabled", &self.inner.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::{CallStack, Frame, NoLocator};
    use crate::properties::keys;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStack {
        captures: Arc<AtomicUsize>,
    }

    impl CallStack for CountingStack {
        fn capture(&self) -> Vec<Frame> {
            self.captures.fetch_add(1, Ordering::SeqCst);
            vec![Frame::new("app::Worker::handle", Some("src/worker.rs".into()), Some(17))]
        }
    }

    fn adapter(level: LogLevel) -> ContextLoggingAdapter {
        let bus = LoggingBus::new(level);
        let source = LogSource::new("worker", "app::Worker").unwrap();
        ContextLoggingAdapter::new(bus, source).with_locator(Arc::new(NoLocator))
    }

    #[test]
    fn test_with_property_returns_new_adapter() {
        let base = adapter(LogLevel::Debug);
        let derived = base.with_property("key1", "value1");

        assert!(!derived.ptr_eq(&base));
        assert!(base.context_properties().is_empty());
        assert_eq!(
            derived.context_properties(),
            [("key1", "value1")].into_iter().collect::<Properties>()
        );
    }

    #[test]
    fn test_with_properties_empty_returns_same_adapter() {
        let base = adapter(LogLevel::Debug).with_property("k", 1);
        let same = base.with_properties(Vec::<Property>::new());
        assert!(same.ptr_eq(&base));

        let also_same = base.with_properties(None::<Property>);
        assert!(also_same.ptr_eq(&base));
    }

    #[test]
    fn test_with_properties_adds_all() {
        let base = adapter(LogLevel::Debug);
        let derived = base.with_properties([("key1", "value1"), ("key2", "value2")]);

        assert!(!derived.ptr_eq(&base));
        let properties = derived.context_properties();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("key2"), Some(&PropertyValue::from("value2")));
    }

    #[test]
    fn test_last_set_value_wins() {
        let log = adapter(LogLevel::Debug)
            .with_property("k", "first")
            .with_properties([("k", "second"), ("j", "x")])
            .with_property("k", "third");
        let properties = log.context_properties();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("k"), Some(&PropertyValue::from("third")));
    }

    #[test]
    fn test_derived_adapters_are_isolated() {
        let base = adapter(LogLevel::Debug).with_property("shared", true);
        let a = base.with_property("a", 1);
        let b = base.with_property("b", 2);

        assert!(!a.context_properties().contains_key("b"));
        assert!(!b.context_properties().contains_key("a"));
        assert!(a.context_properties().contains_key("shared"));
    }

    #[test]
    fn test_level_flags_are_fixed_at_construction() {
        let log = adapter(LogLevel::Info);
        assert!(!log.is_debug_enabled());
        assert!(log.is_info_enabled());
        assert!(log.is_warning_enabled());
        assert!(log.is_error_enabled());

        log.bus().set_level(LogLevel::Error);
        assert!(log.is_info_enabled());
    }

    #[test]
    fn test_payload_carries_context_properties() {
        let log = adapter(LogLevel::Debug).with_properties([("key1", "value1"), ("key2", "value2")]);
        let payload = log.build_message("message");
        assert_eq!(payload.message(), "message");
        assert_eq!(payload.properties(), &log.context_properties());
    }

    #[test]
    fn test_create_log_event_for_each_level() {
        let log = adapter(LogLevel::Debug);
        for level in LogLevel::ALL {
            for with_cause in [true, false] {
                let cause: Option<Cause> = with_cause.then(|| Arc::new(io::Error::other("cause")) as Cause);
                let event = log.create_log_event(level, "message", cause.clone());

                assert_eq!(event.level(), level);
                assert_eq!(event.log_source(), log.log_source());
                assert_eq!(event.message(), &LogMessage::Enriched(log.build_message("message")));
                match (event.cause(), &cause) {
                    (Some(actual), Some(expected)) => assert!(Arc::ptr_eq(actual, expected)),
                    (None, None) => {}
                    _ => panic!("cause mismatch"),
                }
            }
        }
    }

    #[test]
    fn test_complete_caller_info_skips_stack_capture() {
        let captures = Arc::new(AtomicUsize::new(0));
        let log = adapter(LogLevel::Debug)
            .with_locator(Arc::new(StackLocator::new(CountingStack { captures: captures.clone() })))
            .with_properties([
                Property::new(keys::DECLARING_TYPE_NAME, "app::Given"),
                Property::new(keys::METHOD_NAME, "given"),
                Property::new(keys::FILE_NAME, "given.rs"),
                Property::new(keys::LINE_NUMBER, 9),
            ]);

        let payload = log.build_message("hello");

        assert_eq!(captures.load(Ordering::SeqCst), 0);
        assert_eq!(payload.properties().method_name(), Some("given"));
        assert_eq!(payload.properties().line_number(), Some(9));
    }

    #[test]
    fn test_missing_caller_info_is_resolved() {
        let captures = Arc::new(AtomicUsize::new(0));
        let log = adapter(LogLevel::Debug)
            .with_locator(Arc::new(StackLocator::new(CountingStack { captures: captures.clone() })));

        let payload = log.build_message("hello");

        assert_eq!(captures.load(Ordering::SeqCst), 1);
        let properties = payload.properties();
        assert_eq!(properties.declaring_type_name(), Some("app::Worker"));
        assert_eq!(properties.method_name(), Some("handle"));
        assert_eq!(properties.file_name(), Some("src/worker.rs"));
        assert_eq!(properties.line_number(), Some(17));
        assert!(log.context_properties().is_empty());
    }

    #[tokio::test]
    async fn test_log_publishes_once_when_enabled() {
        let log = adapter(LogLevel::Info);
        let mut events = log.bus().subscribe_channel();

        log.debug("suppressed");
        log.info("hello");

        let envelope = events.recv().await.unwrap();
        assert_eq!(envelope.event.level(), LogLevel::Info);
        assert_eq!(envelope.event.message().to_string(), "hello");
        assert!(events.try_recv().is_err());
    }
}
