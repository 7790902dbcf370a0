use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::BridgeConfig;
use crate::adapter::{BusLogging, ContextLoggingAdapter};
use crate::backend::LoggerProvider;
use crate::bus::LoggingBus;
use crate::error::BridgeError;
use crate::event::{ActorPath, LogSource};
use crate::handler::{BridgeLogger, LoggerClient};

/// A running bridge: the bus, one logger actor subscribed to it, and the
/// backend the actor writes to.
///
/// `LoggingSystem` is responsible for:
/// - **Startup**: creating the bus, spawning the logger actor, subscribing it
///   and completing the init handshake
/// - **Adapter creation**: handing out adapters bound to the bus
/// - **Shutdown**: closing the subscription and waiting for queued events to
///   reach the backend
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use actor_log_bridge::adapter::LoggingAdapter;
/// use actor_log_bridge::backend::TracingProvider;
/// use actor_log_bridge::lifecycle::{BridgeConfig, LoggingSystem};
///
/// # async fn demo() -> Result<(), actor_log_bridge::error::BridgeError> {
/// let system = LoggingSystem::start(&BridgeConfig::default(), Arc::new(TracingProvider)).await?;
///
/// struct Orders;
/// let log = system.logger_for::<Orders>("orders")?.with_property("order_id", 7);
/// log.info("order accepted");
///
/// system.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct LoggingSystem {
    bus: LoggingBus,
    client: LoggerClient,
    handle: JoinHandle<()>,
}

impl LoggingSystem {
    /// Starts the bridge and waits until the logger actor has acknowledged
    /// the init handshake.
    pub async fn start(
        config: &BridgeConfig,
        provider: Arc<dyn LoggerProvider>,
    ) -> Result<Self, BridgeError> {
        config.validate()?;
        let bus = LoggingBus::with_path(config.log_level, ActorPath::new(&config.bus_path));
        let source = LogSource::of::<BridgeLogger>(&config.logger_source)?;

        let (logger, client) = BridgeLogger::new(bus.clone(), source, provider);
        let handle = tokio::spawn(logger.run());
        bus.subscribe(Arc::new(client.clone()));

        client.initialize().await?;
        info!(bus = %bus.path(), level = %config.log_level, "Logging system started");

        Ok(Self { bus, client, handle })
    }

    pub fn bus(&self) -> &LoggingBus {
        &self.bus
    }

    /// A context adapter bound to this system's bus.
    pub fn logger(&self, log_source: LogSource) -> ContextLoggingAdapter {
        ContextLoggingAdapter::new(self.bus.clone(), log_source)
    }

    /// A context adapter whose log class is `T`'s qualified type name.
    pub fn logger_for<T: ?Sized>(&self, source: &str) -> Result<ContextLoggingAdapter, BridgeError> {
        Ok(self.logger(LogSource::of::<T>(source)?))
    }

    /// The plain bus-backed adapter, without context.
    pub fn bus_logging(&self, log_source: LogSource) -> BusLogging {
        BusLogging::new(self.bus.clone(), log_source)
    }

    /// Stops the bridge.
    ///
    /// Events already on the bus are still delivered to the backend before
    /// this returns. Adapters that outlive the system keep working but their
    /// events reach no one.
    pub async fn shutdown(self) -> Result<(), BridgeError> {
        info!("Shutting down logging system...");

        self.bus.unsubscribe_all();
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Logger task failed: {:?}", e);
            return Err(BridgeError::TaskFailed(e.to_string()));
        }

        info!("Logging system shutdown complete.");
        Ok(())
    }
}
