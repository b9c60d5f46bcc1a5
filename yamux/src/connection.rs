// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The single executor task that owns a `yamux_transport::Session` and
//! drives it against a concrete transport.
//!
//! Per the concurrency model, exactly one task ever mutates the session: a
//! `tokio::select!` loop over transport reads, a command channel fed by
//! `Stream`/`Control` handles, and an optional keep-alive ping tick.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot, watch};

use yamux_core::frame::HEADER_LEN;
use yamux_core::{Config, Error, Role, SessionState, StreamId, StreamState};
use yamux_transport::{Delegate, Session};

use crate::command::Command;
use crate::control::{Control, Incoming};
use crate::stream::Stream;

const READ_CHUNK: usize = 64 * 1024;

type StreamChannels = (mpsc::UnboundedSender<Bytes>, watch::Sender<StreamState>);
type PendingOpen = (Stream, oneshot::Sender<Result<Stream, Error>>);
type PendingPing = (Instant, Option<oneshot::Sender<Duration>>);
type PendingWrite = (Bytes, oneshot::Sender<Result<usize, Error>>);

struct ConnectionDelegate {
    accept_tx: mpsc::Sender<Stream>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    channels: HashMap<StreamId, StreamChannels>,
    pending_opens: HashMap<StreamId, PendingOpen>,
    pending_pings: VecDeque<PendingPing>,
    /// A write that couldn't be sent in full because the outbound window was
    /// exhausted; retried once `on_window_increased` fires for its stream.
    pending_writes: HashMap<StreamId, PendingWrite>,
    /// Streams `on_window_increased` observed credit for since the last drain.
    ready_writes: Vec<StreamId>,
}

impl Delegate for ConnectionDelegate {
    fn accept_inbound_stream(&mut self, id: StreamId) -> bool {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(StreamState::SynReceived);
        let stream = Stream::new(id, self.cmd_tx.clone(), data_rx, state_rx);
        match self.accept_tx.try_send(stream) {
            Ok(()) => {
                self.channels.insert(id, (data_tx, state_tx));
                true
            }
            Err(_) => false,
        }
    }

    fn on_data(&mut self, id: StreamId, payload: Bytes) {
        if let Some((data_tx, _)) = self.channels.get(&id) {
            let _ = data_tx.send(payload);
        }
    }

    fn on_stream_state_changed(&mut self, id: StreamId, state: StreamState) {
        if let Some((_, state_tx)) = self.channels.get(&id) {
            let _ = state_tx.send(state);
        }
        if matches!(state, StreamState::Established) {
            if let Some((stream, reply)) = self.pending_opens.remove(&id) {
                let _ = reply.send(Ok(stream));
            }
        }
    }

    fn on_stream_closed(&mut self, id: StreamId) {
        self.channels.remove(&id);
        if let Some((_, reply)) = self.pending_opens.remove(&id) {
            let _ = reply.send(Err(Error::ChannelSetupRejected {
                reason: "stream closed before it was established",
            }));
        }
        if let Some((_, reply)) = self.pending_writes.remove(&id) {
            let _ = reply.send(Err(Error::StreamNotWritable));
        }
        self.ready_writes.retain(|ready| *ready != id);
    }

    fn on_session_error(&mut self, error: Error) {
        tracing::error!(%error, "yamux session failed");
        self.channels.clear();
        for (_, (_, reply)) in self.pending_opens.drain() {
            let _ = reply.send(Err(error));
        }
        for (_, (_, reply)) in self.pending_writes.drain() {
            let _ = reply.send(Err(error));
        }
        self.ready_writes.clear();
    }

    fn on_pong(&mut self) {
        if let Some((sent_at, reply)) = self.pending_pings.pop_front() {
            let rtt = sent_at.elapsed();
            match reply {
                Some(reply) => {
                    let _ = reply.send(rtt);
                }
                None => tracing::trace!(?rtt, "keep-alive pong"),
            }
        }
    }

    fn on_window_increased(&mut self, id: StreamId) {
        if self.pending_writes.contains_key(&id) {
            self.ready_writes.push(id);
        }
    }
}

/// Drives `transport` as a yamux session until the transport ends or the
/// session fails, returning handles to open/accept streams and control it.
///
/// The session's executor runs as its own `tokio::task`; dropping both
/// returned handles and all `Stream`s lets that task observe no further
/// work and exit once the transport is closed.
pub fn connect<T>(transport: T, role: Role, config: Config) -> (Control, Incoming)
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (accept_tx, accept_rx) = mpsc::channel(config.accept_backlog());

    tokio::spawn(run(transport, role, config, cmd_rx, accept_tx, cmd_tx.clone()));

    (Control::new(cmd_tx), Incoming::new(accept_rx))
}

async fn run<T>(
    mut transport: T,
    role: Role,
    config: Config,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    accept_tx: mpsc::Sender<Stream>,
    cmd_tx: mpsc::UnboundedSender<Command>,
) where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    let ping_interval = config.session_ping_interval();
    let delegate = ConnectionDelegate {
        accept_tx,
        cmd_tx,
        channels: HashMap::new(),
        pending_opens: HashMap::new(),
        pending_pings: VecDeque::new(),
        pending_writes: HashMap::new(),
        ready_writes: Vec::new(),
    };
    let mut session = Session::new(role, config, delegate);
    session.attach();
    if flush_outbound(&mut transport, &mut session).await.is_err() {
        return;
    }

    let mut ping_ticker = ping_interval.map(tokio::time::interval);
    let mut next_ping_value: u32 = 1;
    let mut read_buf = vec![0u8; READ_CHUNK];
    let mut pending = Vec::new();

    loop {
        tokio::select! {
            result = transport.read(&mut read_buf) => {
                match result {
                    Ok(0) | Err(_) => {
                        session.handle_transport_shutdown();
                        let _ = flush_outbound(&mut transport, &mut session).await;
                        break;
                    }
                    Ok(n) => {
                        pending.extend_from_slice(&read_buf[..n]);
                        let consumed = drain_frames(&mut session, &pending);
                        pending.drain(..consumed);
                        drain_pending_writes(&mut session);
                        if flush_outbound(&mut transport, &mut session).await.is_err() {
                            break;
                        }
                        if matches!(session.state(), SessionState::Closed) {
                            break;
                        }
                    }
                }
            }
            Some(command) = cmd_rx.recv() => {
                handle_command(&mut session, command, &mut next_ping_value);
                drain_pending_writes(&mut session);
                if flush_outbound(&mut transport, &mut session).await.is_err() {
                    break;
                }
            }
            _ = tick(&mut ping_ticker) => {
                session.ping(next_ping_value);
                session.delegate_mut().pending_pings.push_back((Instant::now(), None));
                next_ping_value = next_ping_value.wrapping_add(1).max(1);
                if flush_outbound(&mut transport, &mut session).await.is_err() {
                    break;
                }
            }
            else => break,
        }
    }
}

async fn tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Feeds every complete frame in `pending` through the session, stopping at
/// the first incomplete one or the first session-fatal error. Returns the
/// number of bytes that were fully processed (and so can be dropped by the
/// caller); on a session-fatal error the remainder is dropped too, since the
/// session has already queued `GoAway` and torn every stream down.
fn drain_frames(session: &mut Session<ConnectionDelegate>, pending: &[u8]) -> usize {
    let mut offset = 0;
    loop {
        match session.receive(&pending[offset..]) {
            Ok(0) => return offset,
            Ok(consumed) => offset += consumed,
            Err(_) => return pending.len(),
        }
    }
}

/// Retries every write that was parked waiting on outbound window credit and
/// has since been told (via `Delegate::on_window_increased`) that more is
/// available, resolving its caller's `poll_write` once enough has arrived.
fn drain_pending_writes(session: &mut Session<ConnectionDelegate>) {
    let ready: Vec<StreamId> = session.delegate_mut().ready_writes.drain(..).collect();
    for id in ready {
        let Some((bytes, reply)) = session.delegate_mut().pending_writes.remove(&id) else {
            continue;
        };
        match session.write(id, &bytes) {
            Ok(0) if !bytes.is_empty() => {
                // Still nothing to spend against; wait for the next increment.
                session.delegate_mut().pending_writes.insert(id, (bytes, reply));
            }
            result => {
                let _ = reply.send(result);
            }
        }
    }
}

fn handle_command(
    session: &mut Session<ConnectionDelegate>,
    command: Command,
    next_ping_value: &mut u32,
) {
    match command {
        Command::Open { id_reply, reply } => match session.open_stream() {
            Ok(id) => {
                let _ = id_reply.send(Ok(id));
                let (data_tx, data_rx) = mpsc::unbounded_channel();
                let (state_tx, state_rx) = watch::channel(StreamState::SynSent);
                let stream = Stream::new(id, session.delegate_mut().cmd_tx.clone(), data_rx, state_rx);
                let delegate = session.delegate_mut();
                delegate.channels.insert(id, (data_tx, state_tx));
                delegate.pending_opens.insert(id, (stream, reply));
            }
            Err(error) => {
                let _ = id_reply.send(Err(error));
            }
        },
        Command::CancelOpen { id } => {
            let _ = session.cancel_open(id);
        }
        Command::Write { id, bytes, reply } => match session.write(id, &bytes) {
            Ok(0) if !bytes.is_empty() => {
                session.delegate_mut().pending_writes.insert(id, (bytes, reply));
            }
            result => {
                let _ = reply.send(result);
            }
        },
        Command::Close { id, reply } => {
            let _ = reply.send(session.close_stream(id));
        }
        Command::Reset { id, reply } => {
            let _ = reply.send(session.reset_stream(id));
        }
        Command::Ping { reply } => {
            session.ping(*next_ping_value);
            session
                .delegate_mut()
                .pending_pings
                .push_back((Instant::now(), Some(reply)));
            *next_ping_value = next_ping_value.wrapping_add(1).max(1);
        }
        Command::CloseAll { reply } => {
            session.close_all_streams();
            let _ = reply.send(());
        }
    }
}

async fn flush_outbound<T: AsyncWrite + Unpin>(
    transport: &mut T,
    session: &mut Session<ConnectionDelegate>,
) -> io::Result<()> {
    let frames = session.take_outbound();
    if frames.is_empty() {
        return Ok(());
    }
    for frame in frames {
        let mut header_bytes = [0u8; HEADER_LEN];
        yamux_core::frame::encode_header(&frame.header, &mut header_bytes);
        transport.write_all(&header_bytes).await?;
        if let Some(payload) = frame.payload {
            transport.write_all(&payload).await?;
        }
    }
    transport.flush().await
}
