#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Actor Log Bridge
//!
//! > **Structured, context-carrying logging from actors into any backend.**
//!
//! Actors log through cheap, immutable adapters. Each adapter publishes
//! events onto a logging bus; a logger actor subscribed to that bus turns them
//! into backend events with the caller's location, the sender's path, the log
//! source and the full error chain attached.
//!
//! ## 🏗️ Design
//!
//! ### Persistent context
//! An adapter's context properties live in a [`PropertyChain`](properties::PropertyChain),
//! a singly linked list of `Arc` nodes. Adding a property allocates one node and
//! shares everything behind it, so deriving a child adapter never copies the
//! parent's context and never affects siblings. The chain is merged into a
//! snapshot only when an event is actually logged, with the most recent value
//! for each key winning.
//!
//! ### Caller resolution on the calling thread
//! Location is resolved when the event is built, before it is published. If
//! the context already holds all four caller keys, the stack is never
//! inspected. See [`caller`].
//!
//! ### One logger, one mailbox
//! The [`BridgeLogger`](handler::BridgeLogger) actor processes envelopes
//! sequentially, in arrival order. Publishing is fire-and-forget.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Context ([`properties`])
//! - **Key items**: [`Properties`](properties::Properties), [`PropertyChain`](properties::PropertyChain), [`keys`](properties::keys).
//!
//! ### 2. Events and the bus ([`event`], [`bus`])
//! - **Key items**: [`LogEvent`](event::LogEvent), [`LogLevel`](event::LogLevel), [`LoggingBus`](bus::LoggingBus).
//!
//! ### 3. The adapters ([`adapter`], [`caller`])
//! - **Role**: What application code holds and logs through.
//! - **Key items**: [`ContextLoggingAdapter`](adapter::ContextLoggingAdapter), [`for_context`](adapter::for_context), [`CallSite`](caller::CallSite).
//!
//! ### 4. The receiving side ([`handler`], [`backend`])
//! - **Role**: Translate bus events and hand them to a backend logger.
//! - **Key items**: [`create_logging_event`](handler::create_logging_event), [`LoggerProvider`](backend::LoggerProvider), [`TracingProvider`](backend::TracingProvider).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`LoggingSystem`](lifecycle::LoggingSystem), [`BridgeConfig`](lifecycle::BridgeConfig), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### Running Tests
//!
//! ```bash
//! RUST_LOG=info cargo test
//! ```

pub mod adapter;
pub mod backend;
pub mod bus;
pub mod caller;
pub mod error;
pub mod event;
pub mod handler;
pub mod lifecycle;
pub mod properties;
