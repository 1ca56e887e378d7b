//! # webiar-client
//!
//! The client side of the webiar worker protocol: an explicit connection
//! state machine, a reconnect supervisor with a fixed retry delay, and
//! the [`ChatSession`] view-model that owns the chat history, the HTML
//! document, and the outbound send guard.
//!
//! The pieces are wired with channels: the session enqueues
//! [`webiar_wire::ClientFrame`]s on an mpsc the connection drains, the
//! connection pushes decoded [`webiar_wire::ServerFrame`]s back on
//! another, and connection state is published on a `watch` channel that
//! doubles as the online/offline indicator.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod session;
pub mod state;
pub mod supervisor;

pub use errors::ClientError;
pub use session::{ChatSession, IgnoreReason, SessionEvent, SubmitOutcome};
pub use state::{ConnectionEvent, ConnectionState};
pub use supervisor::{ConnectOptions, run_supervisor};
