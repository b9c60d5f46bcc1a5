// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Session-wide handles: opening outbound streams, accepting inbound ones,
//! and session control (ping, shutdown).

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use yamux_core::{Error, StreamId};

use crate::command::Command;
use crate::stream::Stream;

/// Fires `Command::CancelOpen` if dropped before [`CancelGuard::disarm`] is
/// called, i.e. if the `open_stream()` future is dropped (cancelled, or the
/// caller timed out) before the peer's `ACK` resolved it.
struct CancelGuard {
    cmd_tx: Option<mpsc::UnboundedSender<Command>>,
    id: StreamId,
}

impl CancelGuard {
    fn armed(cmd_tx: mpsc::UnboundedSender<Command>, id: StreamId) -> Self {
        Self { cmd_tx: Some(cmd_tx), id }
    }

    fn disarm(&mut self) {
        self.cmd_tx = None;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(cmd_tx) = self.cmd_tx.take() {
            let _ = cmd_tx.send(Command::CancelOpen { id: self.id });
        }
    }
}

/// A cloneable handle for session-wide operations.
///
/// Every clone submits commands to the same underlying executor task; the
/// session is only actually torn down once the task itself exits.
#[derive(Clone)]
pub struct Control {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Control {
    pub(crate) fn new(cmd_tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { cmd_tx }
    }

    /// Opens a new outbound stream, completing once the peer's `ACK` arrives.
    ///
    /// Dropping the returned future before it resolves (including via a
    /// timeout) cancels the open: an `ACK` arriving afterwards is answered
    /// with an immediate `RST` instead of leaking an established stream no
    /// handle can reach.
    pub async fn open_stream(&self) -> Result<Stream, Error> {
        let (id_reply, id_rx) = oneshot::channel();
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Open { id_reply, reply })
            .map_err(|_| Error::TransportShutdown)?;
        let id = id_rx.await.map_err(|_| Error::TransportShutdown)??;
        let mut guard = CancelGuard::armed(self.cmd_tx.clone(), id);
        let result = rx.await.map_err(|_| Error::TransportShutdown)?;
        guard.disarm();
        result
    }

    /// Sends a keep-alive ping and resolves with the observed round-trip time.
    pub async fn ping(&self) -> Result<Duration, Error> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Ping { reply })
            .map_err(|_| Error::TransportShutdown)?;
        rx.await.map_err(|_| Error::TransportShutdown)
    }

    /// Stops accepting new streams, half-closes every open stream, and sends
    /// `GoAway` once they have all reached a terminal state.
    pub async fn close_all(&self) -> Result<(), Error> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CloseAll { reply })
            .map_err(|_| Error::TransportShutdown)?;
        rx.await.map_err(|_| Error::TransportShutdown)
    }
}

/// The sequence of streams the peer opens on this session.
pub struct Incoming {
    accept_rx: mpsc::Receiver<Stream>,
}

impl Incoming {
    pub(crate) fn new(accept_rx: mpsc::Receiver<Stream>) -> Self {
        Self { accept_rx }
    }

    /// Waits for the next inbound stream. Returns `None` once the session
    /// has ended and no further streams will be accepted.
    pub async fn accept(&mut self) -> Option<Stream> {
        self.accept_rx.recv().await
    }
}
