//! Connection lifecycle as an explicit state machine.
//!
//! Three states, driven by typed events. The transition function is
//! pure so the table can be tested exhaustively; the live state is
//! published on a `tokio::sync::watch` channel which serves as the
//! online/offline indicator.

use tokio::sync::watch;

/// Where the connection currently is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// A dial is in progress.
    Connecting,
    /// The socket is open.
    Online,
    /// The socket is down and a retry timer is pending.
    OfflineRetrying,
}

impl ConnectionState {
    /// Whether the socket is currently open.
    #[must_use]
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

/// Events that drive the connection state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The socket opened.
    Opened,
    /// The socket closed (server close, stream end, or local teardown).
    Closed,
    /// A transport error occurred. Log-only while online: the close that
    /// follows drives the actual transition.
    Errored,
    /// A frame arrived. Never changes state; payload handling lives in
    /// the session dispatcher.
    MessageReceived,
    /// The fixed reconnect delay elapsed.
    RetryElapsed,
}

/// Compute the next state for `event` in `state`.
///
/// Unlisted combinations keep the current state.
#[must_use]
pub fn transition(state: ConnectionState, event: ConnectionEvent) -> ConnectionState {
    use ConnectionEvent as E;
    use ConnectionState as S;

    match (state, event) {
        (S::Connecting, E::Opened) => S::Online,
        // A failed dial surfaces as Errored; either way we fall back to
        // the retry timer.
        (S::Connecting, E::Closed | E::Errored) => S::OfflineRetrying,
        (S::Online, E::Closed) => S::OfflineRetrying,
        (S::OfflineRetrying, E::RetryElapsed) => S::Connecting,
        (state, _) => state,
    }
}

/// Apply `event` to the state published on `status`, notifying watchers
/// only when the state actually changes. Returns the resulting state.
pub fn apply(status: &watch::Sender<ConnectionState>, event: ConnectionEvent) -> ConnectionState {
    let mut result = *status.borrow();
    let _ = status.send_if_modified(|state| {
        let next = transition(*state, event);
        result = next;
        if next == *state {
            false
        } else {
            *state = next;
            true
        }
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionEvent as E;
    use ConnectionState as S;

    #[test]
    fn open_brings_the_connection_online() {
        assert_eq!(transition(S::Connecting, E::Opened), S::Online);
    }

    #[test]
    fn close_while_online_schedules_retry() {
        assert_eq!(transition(S::Online, E::Closed), S::OfflineRetrying);
    }

    #[test]
    fn failed_dial_schedules_retry() {
        assert_eq!(transition(S::Connecting, E::Errored), S::OfflineRetrying);
        assert_eq!(transition(S::Connecting, E::Closed), S::OfflineRetrying);
    }

    #[test]
    fn error_while_online_is_log_only() {
        // The close handler drives the transition; the error itself does not.
        assert_eq!(transition(S::Online, E::Errored), S::Online);
    }

    #[test]
    fn retry_timer_re_enters_connecting() {
        assert_eq!(transition(S::OfflineRetrying, E::RetryElapsed), S::Connecting);
    }

    #[test]
    fn messages_never_change_state() {
        for state in [S::Connecting, S::Online, S::OfflineRetrying] {
            assert_eq!(transition(state, E::MessageReceived), state);
        }
    }

    #[test]
    fn retry_elapsed_is_meaningless_outside_offline() {
        assert_eq!(transition(S::Connecting, E::RetryElapsed), S::Connecting);
        assert_eq!(transition(S::Online, E::RetryElapsed), S::Online);
    }

    #[test]
    fn is_online_only_for_online() {
        assert!(S::Online.is_online());
        assert!(!S::Connecting.is_online());
        assert!(!S::OfflineRetrying.is_online());
    }

    #[test]
    fn apply_notifies_only_on_change() {
        let (tx, mut rx) = watch::channel(S::Connecting);
        rx.mark_unchanged();

        // No-op event: watchers stay quiet.
        assert_eq!(apply(&tx, E::MessageReceived), S::Connecting);
        assert!(!rx.has_changed().unwrap());

        // Real transition: watchers are notified.
        assert_eq!(apply(&tx, E::Opened), S::Online);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), S::Online);
    }
}
