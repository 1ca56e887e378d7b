//! # webiar-preview
//!
//! The preview frame, reimagined for a terminal client: a small local
//! HTTP server that renders the current HTML document. Point a browser
//! at it and reload to see the latest revision — responses are marked
//! `no-store` so the browser never caches a stale document.
//!
//! The document is read from a `tokio::sync::watch` channel owned by
//! the chat session; every wholesale replacement there is immediately
//! visible here. The HTML is served verbatim, unsanitized by contract.

#![deny(unsafe_code)]

pub mod config;
pub mod server;

pub use config::PreviewConfig;
pub use server::{PreviewError, PreviewServer};
