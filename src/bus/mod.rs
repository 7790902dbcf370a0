//! # Logging Bus
//!
//! The event stream adapters publish to and logger actors subscribe to.
//!
//! Publishing is fire-and-forget: [`LoggingBus::publish`] hands the event to
//! every live subscriber and returns without waiting. Subscribers whose
//! mailbox has closed are pruned on the next publish.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::debug;

use crate::event::{ActorPath, LogEvent, LogLevel};

/// Default path of the bus itself; used as the sender of published events.
pub const DEFAULT_BUS_PATH: &str = "/system/event-stream";

/// A log event paired with the identity of whoever delivered it.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub event: LogEvent,
    pub sender: ActorPath,
}

/// Something that receives envelopes from the bus.
///
/// `deliver` runs on the publishing thread and should not block.
pub trait Subscriber: Send + Sync {
    /// Delivers an envelope. Returns `false` once the subscriber is gone.
    fn deliver(&self, envelope: Envelope) -> bool;
}

impl Subscriber for mpsc::UnboundedSender<Envelope> {
    fn deliver(&self, envelope: Envelope) -> bool {
        self.send(envelope).is_ok()
    }
}

struct BusInner {
    path: ActorPath,
    level: RwLock<LogLevel>,
    subscribers: Mutex<Vec<Arc<dyn Subscriber>>>,
}

/// Shared handle to the logging bus.
#[derive(Clone)]
pub struct LoggingBus {
    inner: Arc<BusInner>,
}

impl LoggingBus {
    pub fn new(level: LogLevel) -> Self {
        Self::with_path(level, ActorPath::new(DEFAULT_BUS_PATH))
    }

    pub fn with_path(level: LogLevel, path: ActorPath) -> Self {
        Self {
            inner: Arc::new(BusInner {
                path,
                level: RwLock::new(level),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn path(&self) -> &ActorPath {
        &self.inner.path
    }

    /// The current threshold.
    pub fn level(&self) -> LogLevel {
        *self.inner.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the threshold. Adapters already created keep the flags they
    /// computed at construction.
    pub fn set_level(&self, level: LogLevel) {
        *self.inner.level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscriber);
    }

    /// Subscribes a fresh channel and returns its receiving end.
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<Envelope> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribe(Arc::new(sender));
        receiver
    }

    /// Removes every subscriber, closing the bus's side of their mailboxes.
    pub fn unsubscribe_all(&self) {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Publishes an event with the bus as its sender.
    pub fn publish(&self, event: LogEvent) {
        let sender = self.inner.path.clone();
        self.publish_from(event, sender);
    }

    /// Publishes an event on behalf of `sender`.
    ///
    /// Subscribers are called without the subscriber lock held, so a
    /// subscriber may publish to this bus from inside `deliver`.
    pub fn publish_from(&self, event: LogEvent, sender: ActorPath) {
        let subscribers = self.snapshot();
        let closed: Vec<Arc<dyn Subscriber>> = subscribers
            .into_iter()
            .filter(|subscriber| {
                !subscriber.deliver(Envelope {
                    event: event.clone(),
                    sender: sender.clone(),
                })
            })
            .collect();
        if !closed.is_empty() {
            self.prune(&closed);
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn Subscriber>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn prune(&self, closed: &[Arc<dyn Subscriber>]) {
        let mut subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|subscriber| !closed.iter().any(|gone| same_subscriber(gone, subscriber)));
        debug!(dropped = before - subscribers.len(), "Pruned closed subscribers");
    }

    /// True when both handles refer to the same bus.
    pub fn ptr_eq(&self, other: &LoggingBus) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

fn same_subscriber(a: &Arc<dyn Subscriber>, b: &Arc<dyn Subscriber>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl fmt::Debug for LoggingBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingBus")
            .field("path", &self.inner.path)
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}
