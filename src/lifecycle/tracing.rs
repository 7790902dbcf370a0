//! # Diagnostics
//!
//! The bridge reports on itself (logger start and shutdown, pruned
//! subscribers, system lifecycle) through `tracing`. When the
//! [`TracingProvider`](crate::backend::TracingProvider) backend is in use,
//! translated events go through the same subscriber.
//!
//! Levels are controlled with `RUST_LOG`:
//!
//! ```bash
//! # Translated events and lifecycle notices
//! RUST_LOG=info cargo test
//!
//! # Also the logger's per-message diagnostics
//! RUST_LOG=actor_log_bridge=debug cargo test
//! ```
//!
//! Each translated event carries its backend fields inline:
//!
//! ```text
//! INFO hello logger=app::Orders location=app::Orders.accept(src/orders.rs:88) thread=main exception=None properties={ActorPath=/system/event-stream, LogSource=orders, k=v}
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Panics if a global subscriber is already set; use [`try_setup_tracing`]
/// where that can happen, such as in tests.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but returns `false` instead of panicking when a
/// global subscriber is already installed.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
