//! Frame types and the text codec.
//!
//! Frames are internally tagged on `type`. Outbound and inbound frames
//! share the `chat` and `updateHtml` tags but carry different payloads,
//! so they are distinct enums rather than one bidirectional type.

use serde::{Deserialize, Serialize};

use crate::errors::FrameError;

/// A frame sent from this client to the worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    /// A user instruction plus the editor contents it applies to.
    #[serde(rename = "chat")]
    Chat {
        /// The user's instruction text.
        message: String,
        /// Current editor HTML, sent so the worker modifies what the
        /// user is actually looking at.
        html: String,
    },

    /// The user edited the HTML directly; sent on every edit.
    #[serde(rename = "updateHtml")]
    UpdateHtml {
        /// Full editor contents.
        html: String,
    },
}

/// A frame received from the worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    /// Assistant reply text for the chat log.
    #[serde(rename = "chat")]
    Chat {
        /// Reply text.
        content: String,
    },

    /// Worker-authored replacement for the whole document.
    #[serde(rename = "updateHtml")]
    UpdateHtml {
        /// Full replacement HTML.
        html: String,
    },

    /// A logical error reported by the worker.
    #[serde(rename = "error")]
    Error {
        /// Human-readable error text.
        message: String,
    },
}

/// Serialize an outbound frame to its wire text.
pub fn encode(frame: &ClientFrame) -> Result<String, FrameError> {
    serde_json::to_string(frame).map_err(|source| FrameError::Encode { source })
}

/// Parse one inbound text message into a frame.
///
/// Malformed JSON, missing fields, and unknown `type` tags all come back
/// as [`FrameError::Decode`]; the dispatcher decides what to do with them.
pub fn decode(text: &str) -> Result<ServerFrame, FrameError> {
    serde_json::from_str(text).map_err(|source| FrameError::Decode { source })
}
