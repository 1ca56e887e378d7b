//! The chat session view-model.
//!
//! [`ChatSession`] gathers what the original front-end kept as
//! free-floating page state — the history array, the editor contents,
//! the processing flag — into one owned object. It is single-owner by
//! design: the front-end task feeds it user submissions and decoded
//! server frames, and consumes the [`SessionEvent`]s it emits.

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use webiar_core::{ChatHistory, ChatMessage, HtmlDocument};
use webiar_wire::{ClientFrame, ServerFrame};

/// What happened to a submitted message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was appended to history and handed to the connection.
    Sent,
    /// The submission was dropped without side effects.
    Ignored(IgnoreReason),
}

/// Why a submission was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The input was empty or whitespace-only.
    EmptyInput,
    /// A send was already in flight.
    Busy,
}

/// Events the session emits for the front-end to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A message was appended to the history.
    MessageAppended(ChatMessage),
    /// A request went out; show the typing indicator.
    TypingStarted,
    /// A reply (or server error) arrived; hide the typing indicator.
    TypingStopped,
}

/// One page session: history, document, and the in-flight send guard.
pub struct ChatSession {
    history: ChatHistory,
    document: watch::Sender<HtmlDocument>,
    outbound: mpsc::Sender<ClientFrame>,
    events: mpsc::UnboundedSender<SessionEvent>,
    /// Blocks re-entrant submits. Set before the frame is enqueued and
    /// cleared once the enqueue returns, whatever the outcome — the send
    /// is fire-and-forget, so this guards re-entrancy, not backpressure.
    in_flight: bool,
}

impl ChatSession {
    /// Create a session with a greeted history and an empty document.
    pub fn new(
        outbound: mpsc::Sender<ClientFrame>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let (document, _) = watch::channel(HtmlDocument::new());
        Self {
            history: ChatHistory::with_greeting(),
            document,
            outbound,
            events,
            in_flight: false,
        }
    }

    /// Subscribe to document replacements (the preview feed).
    #[must_use]
    pub fn document(&self) -> watch::Receiver<HtmlDocument> {
        self.document.subscribe()
    }

    /// The chat history so far.
    #[must_use]
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Current editor contents.
    #[must_use]
    pub fn editor_html(&self) -> String {
        self.document.borrow().html().to_owned()
    }

    /// Whether a send is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Submit a user instruction.
    ///
    /// Empty input and re-entrant submits are dropped without side
    /// effects. Otherwise the message is appended to history and a
    /// `chat` frame carrying the current editor contents is enqueued.
    /// A full or closed outbound channel is logged and swallowed — the
    /// transport layer owns retry, nothing else is surfaced.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        if self.in_flight {
            debug!("submit ignored: send already in flight");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }

        self.in_flight = true;

        let entry = self.history.push_user(message);
        self.emit(SessionEvent::MessageAppended(entry));
        self.emit(SessionEvent::TypingStarted);

        let frame = ClientFrame::Chat {
            message: message.to_owned(),
            html: self.editor_html(),
        };
        if let Err(e) = self.outbound.try_send(frame) {
            warn!(error = %e, "failed to enqueue chat frame");
        }

        // Cleared regardless of the enqueue outcome.
        self.in_flight = false;
        SubmitOutcome::Sent
    }

    /// Replace the editor contents and transmit the edit.
    ///
    /// Mirrors the original's editor listener: every edit replaces the
    /// document (refreshing the preview) and goes out as an `updateHtml`
    /// frame. Returns the new document revision.
    pub fn set_editor_html(&mut self, html: &str) -> u64 {
        let revision = self.replace_document(html);
        let frame = ClientFrame::UpdateHtml {
            html: html.to_owned(),
        };
        if let Err(e) = self.outbound.try_send(frame) {
            warn!(error = %e, "failed to enqueue updateHtml frame");
        }
        revision
    }

    /// Dispatch one decoded server frame.
    pub fn handle_frame(&mut self, frame: ServerFrame) {
        match frame {
            ServerFrame::Chat { content } => {
                debug!(len = content.len(), "assistant reply");
                self.emit(SessionEvent::TypingStopped);
                let entry = self.history.push_assistant(content);
                self.emit(SessionEvent::MessageAppended(entry));
            }
            ServerFrame::UpdateHtml { html } => {
                let revision = self.replace_document(&html);
                debug!(revision, "document replaced by worker");
            }
            ServerFrame::Error { message } => {
                // Rendered as a plain chat bubble, same as the original:
                // no special styling, no retry affordance.
                warn!(message = %message, "worker reported an error");
                self.emit(SessionEvent::TypingStopped);
                let entry = self.history.push_assistant(format!("Error: {message}"));
                self.emit(SessionEvent::MessageAppended(entry));
            }
        }
    }

    fn replace_document(&mut self, html: &str) -> u64 {
        let mut revision = 0;
        self.document.send_modify(|doc| {
            revision = doc.replace(html);
        });
        revision
    }

    fn emit(&self, event: SessionEvent) {
        // A dropped receiver means the front-end is gone; nothing to do.
        let _ = self.events.send(event);
    }

    #[cfg(test)]
    pub(crate) fn force_in_flight(&mut self) {
        self.in_flight = true;
    }
}
