// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The session-level lifecycle state machine, tracked on stream ID 0.

use crate::state::{self, event, is};

/// The lifecycle state of a yamux session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Open,
    GoAwaySent,
    GoAwayReceived,
    Closed,
}

impl SessionState {
    event! {
        /// Either side sent or received the session-open handshake
        /// (`Ping|SYN` followed by `Ping|ACK`).
        session_opened(
            Idle => Open,
        );
        /// We sent `GoAway`; no new streams may be opened locally thereafter.
        send_go_away(
            Open => GoAwaySent,
        );
        /// We received `GoAway` from the peer.
        recv_go_away(
            Open | GoAwaySent => GoAwayReceived,
        );
        /// The underlying transport ended, or a fatal protocol error occurred.
        shutdown(
            Idle | Open | GoAwaySent | GoAwayReceived => Closed,
        );
    }

    is!(
        /// True once the session has completed its opening handshake and may
        /// carry streams.
        is_open,
        Open
    );

    is!(
        /// True once either side has sent `GoAway` or the session is closed;
        /// no new streams may be opened.
        is_quiescing_or_closed,
        GoAwaySent | GoAwayReceived | Closed
    );
}

pub type Result = state::Result<SessionState>;
pub type Error = state::Error<SessionState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_open_handshake() {
        let mut s = SessionState::Idle;
        s.session_opened().unwrap();
        assert_eq!(s, SessionState::Open);
        assert!(s.is_open());
    }

    #[test]
    fn local_go_away_then_remote_go_away() {
        let mut s = SessionState::Open;
        s.send_go_away().unwrap();
        assert_eq!(s, SessionState::GoAwaySent);
        assert!(s.is_quiescing_or_closed());
        s.recv_go_away().unwrap();
        assert_eq!(s, SessionState::GoAwayReceived);
    }

    #[test]
    fn shutdown_reachable_from_every_non_terminal_state() {
        for mut s in [
            SessionState::Idle,
            SessionState::Open,
            SessionState::GoAwaySent,
            SessionState::GoAwayReceived,
        ] {
            assert!(s.shutdown().is_ok());
            assert_eq!(s, SessionState::Closed);
        }
    }

    #[test]
    fn go_away_before_open_is_invalid() {
        let mut s = SessionState::Idle;
        assert!(s.send_go_away().is_err());
    }
}
