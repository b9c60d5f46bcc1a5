// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The application-facing handle for a single yamux stream.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::sync::{mpsc, oneshot, watch};

use yamux_core::{Error, StreamId, StreamState};

use crate::command::Command;

/// A bidirectional byte stream multiplexed over a single yamux session.
///
/// Implements [`AsyncRead`]/[`AsyncWrite`]; reads observe data in receive
/// order, writes are delivered to the peer in the order they were made. Use
/// [`Stream::reset`] to abort the stream instead of half-closing it.
pub struct Stream {
    id: StreamId,
    cmd_tx: mpsc::UnboundedSender<Command>,
    data_rx: mpsc::UnboundedReceiver<Bytes>,
    state_rx: watch::Receiver<StreamState>,
    read_buf: Bytes,
    pending_write: Option<oneshot::Receiver<Result<usize, Error>>>,
    pending_shutdown: Option<oneshot::Receiver<Result<(), Error>>>,
}

impl Stream {
    pub(crate) fn new(
        id: StreamId,
        cmd_tx: mpsc::UnboundedSender<Command>,
        data_rx: mpsc::UnboundedReceiver<Bytes>,
        state_rx: watch::Receiver<StreamState>,
    ) -> Self {
        Self {
            id,
            cmd_tx,
            data_rx,
            state_rx,
            read_buf: Bytes::new(),
            pending_write: None,
            pending_shutdown: None,
        }
    }

    /// This stream's locally-known ID.
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// The stream's current lifecycle state, as last observed by this handle.
    pub fn state(&self) -> StreamState {
        *self.state_rx.borrow()
    }

    /// Aborts the stream immediately: the peer observes an `RST`, and
    /// subsequent reads/writes on either side fail.
    pub async fn reset(&self) -> Result<(), Error> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { id: self.id, reply })?;
        rx.await.map_err(|_| Error::TransportShutdown)?
    }

    fn send(&self, command: Command) -> Result<(), Error> {
        self.cmd_tx
            .send(command)
            .map_err(|_| Error::TransportShutdown)
    }
}

impl AsyncRead for Stream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        loop {
            if !self.read_buf.is_empty() {
                let n = self.read_buf.len().min(buf.remaining());
                buf.put_slice(&self.read_buf[..n]);
                self.read_buf.advance(n);
                return Poll::Ready(Ok(()));
            }
            match self.data_rx.poll_recv(cx) {
                Poll::Ready(Some(chunk)) => {
                    self.read_buf = chunk;
                    continue;
                }
                Poll::Ready(None) => return Poll::Ready(Ok(())),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl AsyncWrite for Stream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        loop {
            if let Some(rx) = &mut self.pending_write {
                let result = match Pin::new(rx).poll(cx) {
                    Poll::Ready(Ok(result)) => result.map_err(io::Error::from),
                    Poll::Ready(Err(_)) => Err(io::Error::from(Error::TransportShutdown)),
                    Poll::Pending => return Poll::Pending,
                };
                self.pending_write = None;
                return Poll::Ready(result);
            }

            let (reply, rx) = oneshot::channel();
            let command = Command::Write {
                id: self.id,
                bytes: Bytes::copy_from_slice(buf),
                reply,
            };
            if self.send(command).is_err() {
                return Poll::Ready(Err(io::Error::from(Error::TransportShutdown)));
            }
            self.pending_write = Some(rx);
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<io::Result<()>> {
        loop {
            if let Some(rx) = &mut self.pending_shutdown {
                let result = match Pin::new(rx).poll(cx) {
                    Poll::Ready(Ok(result)) => result.map_err(io::Error::from),
                    Poll::Ready(Err(_)) => Ok(()),
                    Poll::Pending => return Poll::Pending,
                };
                self.pending_shutdown = None;
                return Poll::Ready(result);
            }

            let (reply, rx) = oneshot::channel();
            if self
                .send(Command::Close {
                    id: self.id,
                    reply,
                })
                .is_err()
            {
                return Poll::Ready(Ok(()));
            }
            self.pending_shutdown = Some(rx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_observes_buffered_chunks_in_order() {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        let (_state_tx, state_rx) = watch::channel(StreamState::Established);
        let mut stream = Stream::new(StreamId::new(1), cmd_tx, data_rx, state_rx);

        data_tx.send(Bytes::from_static(b"hello ")).unwrap();
        data_tx.send(Bytes::from_static(b"world")).unwrap();
        drop(data_tx);

        let mut collected = Vec::new();
        let mut buf = [0u8; 4];
        loop {
            let mut read_buf = ReadBuf::new(&mut buf);
            std::future::poll_fn(|cx| Pin::new(&mut stream).poll_read(cx, &mut read_buf))
                .await
                .unwrap();
            if read_buf.filled().is_empty() {
                break;
            }
            collected.extend_from_slice(read_buf.filled());
        }
        assert_eq!(collected, b"hello world");
    }
}
