//! # webiar-wire
//!
//! The JSON frame protocol spoken over the webiar WebSocket. One frame
//! per text message, discriminated by a `type` tag. The string values
//! are the wire contract — the worker on the other end matches on them
//! verbatim.

#![deny(unsafe_code)]

pub mod errors;
pub mod frames;

pub use errors::FrameError;
pub use frames::{ClientFrame, ServerFrame, decode, encode};
