//! # webiar-core
//!
//! Session-owned state for the webiar client: the append-only chat
//! history and the HTML document that backs the editor and the live
//! preview. Both structures live only for the duration of a session
//! and are never persisted.

#![deny(unsafe_code)]

pub mod document;
pub mod history;

pub use document::HtmlDocument;
pub use history::{ChatHistory, ChatMessage, GREETING, Role};
