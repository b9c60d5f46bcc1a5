// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The callback surface the [`crate::session::Session`] engine drives.
//!
//! `yamux-transport` has no hard dependency on any particular async runtime:
//! application-visible events (a stream accepted, data arrived, a stream
//! closed) are reported through this trait instead. The `yamux` crate
//! implements it for its `tokio`-backed handles.

use bytes::Bytes;
use yamux_core::{Error, StreamId, StreamState};

/// Receives the application-visible events produced by a [`crate::session::Session`].
///
/// All methods are invoked synchronously from inside the single logical
/// executor that owns the session (see the crate's concurrency notes); a
/// `Delegate` implementation must not block.
pub trait Delegate {
    /// The peer opened a new stream. Return `true` to accept it (the session
    /// will reply `ACK`) or `false` to reject it (the session replies `RST`).
    ///
    /// Called at most once per stream ID.
    fn accept_inbound_stream(&mut self, id: StreamId) -> bool;

    /// `Data` payload arrived for `id` and has already been credited against
    /// the inbound flow-control window.
    fn on_data(&mut self, id: StreamId, payload: Bytes);

    /// The stream's lifecycle state changed; handles waiting on `id` should
    /// be woken to re-check their condition.
    fn on_stream_state_changed(&mut self, id: StreamId, state: StreamState);

    /// The stream reached a terminal state and its registry entry has been reclaimed.
    fn on_stream_closed(&mut self, id: StreamId);

    /// A `Ping|ACK` arrived after the session's opening handshake already
    /// completed, i.e. it is the peer's echo of one of our keep-alive pings.
    ///
    /// Pongs are not individually correlated to the ping that elicited them
    /// here (the wire format carries no ping ID beyond the session-open
    /// exchange's use of the same flags); callers that need per-ping RTTs
    /// should match pongs to pings in send order.
    fn on_pong(&mut self);

    /// A session-fatal error occurred; every stream has been or is about to
    /// be torn down and no further frames will be produced.
    fn on_session_error(&mut self, error: Error);

    /// The peer credited `id`'s outbound window via `WindowUpdate`.
    ///
    /// Fired after every successful increment, not only when a write was
    /// actually waiting on it; a writer suspended on [`crate::session::Session::write`]
    /// returning `Ok(0)` should re-attempt the write once this fires for its stream.
    fn on_window_increased(&mut self, id: StreamId);
}
