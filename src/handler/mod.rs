//! # Logger Actor
//!
//! The receiving side of the bridge. A [`BridgeLogger`] subscribes to the
//! bus through its [`LoggerClient`], takes envelopes off its mailbox one at a
//! time, translates each into a backend event and hands it to the backend
//! logger named after the event's log class.
//!
//! ## Messages
//!
//! - `Log`: one envelope from the bus, at any of the four levels.
//! - `Initialize`: the start-up handshake. The actor logs a startup notice
//!   through its own context adapter and replies [`LoggerInitialized`].
//!
//! Events are handled strictly in arrival order; a backend `log` call is
//! awaited before the next message is taken.

pub mod translate;

pub use translate::create_logging_event;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::adapter::{ContextLoggingAdapter, LoggingAdapter};
use crate::backend::LoggerProvider;
use crate::bus::{Envelope, LoggingBus, Subscriber};
use crate::error::BridgeError;
use crate::event::LogSource;

/// Startup notice logged in reply to the init handshake.
pub const STARTED_MESSAGE: &str = "Log bridge started";

/// Reply to a successful init handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerInitialized;

/// Messages the logger actor understands.
#[derive(Debug)]
pub enum LoggerMessage {
    Log(Envelope),
    Initialize {
        respond_to: oneshot::Sender<LoggerInitialized>,
    },
}

/// The logger actor. Owns its mailbox and the backend provider.
pub struct BridgeLogger {
    receiver: mpsc::UnboundedReceiver<LoggerMessage>,
    provider: Arc<dyn LoggerProvider>,
    log: ContextLoggingAdapter,
}

impl BridgeLogger {
    /// Creates the actor and its client. The actor logs its own notices to
    /// `bus` under `log_source`.
    pub fn new(
        bus: LoggingBus,
        log_source: LogSource,
        provider: Arc<dyn LoggerProvider>,
    ) -> (Self, LoggerClient) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            provider,
            log: ContextLoggingAdapter::new(bus, log_source),
        };
        (actor, LoggerClient { sender })
    }

    /// Runs the actor until every client, including the bus subscription,
    /// has been dropped. Queued messages are drained first.
    pub async fn run(mut self) {
        let logger = self.log.log_source().source().to_string();
        info!(%logger, "Logger started");
        let mut handled = 0usize;

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LoggerMessage::Log(envelope) => {
                    self.handle(envelope).await;
                    handled += 1;
                }
                LoggerMessage::Initialize { respond_to } => {
                    debug!(%logger, "Initialize");
                    self.log.info(STARTED_MESSAGE);
                    let _ = respond_to.send(LoggerInitialized);
                }
            }
        }

        info!(%logger, handled, "Shutdown");
    }

    async fn handle(&self, envelope: Envelope) {
        let Envelope { event, sender } = envelope;
        let backend = self.provider.logger(event.log_source().log_class());
        let translated = create_logging_event(event.level().into(), &event, &sender);
        backend.log(translated).await;
    }
}

/// Handle to a running [`BridgeLogger`]. Subscribe it to the bus to route
/// events to the actor.
#[derive(Debug, Clone)]
pub struct LoggerClient {
    sender: mpsc::UnboundedSender<LoggerMessage>,
}

impl LoggerClient {
    /// Performs the init handshake and waits for the reply.
    pub async fn initialize(&self) -> Result<LoggerInitialized, BridgeError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LoggerMessage::Initialize { respond_to })
            .map_err(|_| BridgeError::ActorClosed)?;
        response.await.map_err(|_| BridgeError::ActorDropped)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Subscriber for LoggerClient {
    fn deliver(&self, envelope: Envelope) -> bool {
        self.sender.send(LoggerMessage::Log(envelope)).is_ok()
    }
}
