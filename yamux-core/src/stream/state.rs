// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The per-stream lifecycle state machine.
//!
//! Unlike a protocol with independent send/receive half-streams, a yamux
//! stream has a single combined state that both the send and receive paths
//! validate their transitions against.

use crate::state::{self, event, is};

/// The lifecycle state of a single yamux stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamState {
    #[default]
    Idle,
    SynSent,
    SynReceived,
    Established,
    LocalHalfClosed,
    RemoteHalfClosed,
    Closed,
    Reset,
}

impl StreamState {
    event! {
        /// We sent a SYN to open the stream locally.
        send_syn(
            Idle => SynSent,
        );
        /// We sent an ACK, either completing a locally-initiated handshake
        /// or responding to a peer's SYN.
        send_ack(
            SynReceived => Established,
        );
        /// We sent a Data or WindowUpdate frame on an already-open stream.
        send_data(
            Established => Established,
        );
        /// We sent a FIN, half-closing our send side.
        send_fin(
            Established => LocalHalfClosed,
            RemoteHalfClosed => Closed,
        );
        /// We received a SYN from the peer, opening the stream remotely.
        recv_syn(
            Idle => SynReceived,
        );
        /// We received an ACK completing a locally-initiated handshake.
        recv_ack(
            SynSent => Established,
        );
        /// We received a Data frame within the advertised window.
        recv_data(
            Established => Established,
            LocalHalfClosed => LocalHalfClosed,
        );
        /// We received a WindowUpdate crediting our outbound window.
        recv_window_update(
            Established => Established,
            LocalHalfClosed => LocalHalfClosed,
        );
        /// We received a FIN, half-closing the peer's send side.
        recv_fin(
            Established => RemoteHalfClosed,
            LocalHalfClosed => Closed,
        );
        /// Either side sent or received an RST, terminating the stream.
        reset(
            Idle | SynSent | SynReceived | Established | LocalHalfClosed | RemoteHalfClosed => Reset,
        );
    }

    is!(
        /// True once the stream has finished its opening handshake.
        is_established,
        Established
    );

    is!(
        /// True once no further frames will be sent or accepted for this stream.
        is_terminal,
        Closed | Reset
    );

    is!(
        /// True while a local or remote half-close has happened but the stream
        /// isn't fully closed.
        is_half_closed,
        LocalHalfClosed | RemoteHalfClosed
    );
}

pub type Result = state::Result<StreamState>;
pub type Error = state::Error<StreamState>;
