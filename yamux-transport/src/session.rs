// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The session engine: stream registry, inbound routing, and outbound framing.
//!
//! This type has no I/O of its own. A caller feeds it inbound bytes via
//! [`Session::receive`] and drains [`Session::take_outbound`] after each
//! call; the `yamux` crate is what actually owns a socket and an executor.

use bytes::Bytes;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use yamux_core::frame::{Decoded, Flags, Frame, FrameDecoder, FrameType, Header, Message, OwnedFrame};
use yamux_core::{Config, Error, GoAwayCode, Role, SessionState, StreamId, StreamState};

use crate::delegate::Delegate;
use crate::registry::StreamEntry;

/// Outbound frames queued by a [`Session`] call, to be flushed by the caller.
pub type OutboundQueue = SmallVec<[OwnedFrame; 4]>;

/// Drives one yamux session: the stream table, the session-level state
/// machine, and the inbound routing algorithm.
///
/// Per the single-actor concurrency model, a `Session` is not `Sync` in
/// spirit even though nothing here forces it: exactly one task may call
/// `receive`/`open_stream`/`write`/etc. at a time.
pub struct Session<D> {
    role: Role,
    config: Config,
    state: SessionState,
    streams: HashMap<StreamId, StreamEntry>,
    /// Stream IDs recently torn down; trailing frames for them are tolerated
    /// until their own FIN/RST is observed, then the ID is discarded.
    errored_ids: HashSet<StreamId>,
    next_local_id: Option<StreamId>,
    decoder: FrameDecoder,
    outbound: OutboundQueue,
    delegate: D,
    quiescing: bool,
}

impl<D: Delegate> Session<D> {
    pub fn new(role: Role, config: Config, delegate: D) -> Self {
        Self {
            role,
            config,
            state: SessionState::default(),
            streams: HashMap::new(),
            errored_ids: HashSet::new(),
            next_local_id: Some(StreamId::initial(role)),
            decoder: FrameDecoder::new(),
            outbound: SmallVec::new(),
            delegate,
            quiescing: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stream_state(&self, id: StreamId) -> Option<StreamState> {
        self.streams.get(&id).map(|entry| entry.state)
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// Queues the session-open handshake if this endpoint is the listener.
    ///
    /// The initiator stays `Idle` until it observes the listener's SYN.
    pub fn attach(&mut self) {
        if self.role.is_listener() {
            self.queue(FrameType::Ping, Flags::SYN, 0, 0);
        }
    }

    /// Takes ownership of the frames queued since the last call.
    pub fn take_outbound(&mut self) -> OutboundQueue {
        core::mem::take(&mut self.outbound)
    }

    fn queue(&mut self, frame_type: FrameType, flags: Flags, stream_id: u32, length: u32) {
        self.outbound
            .push(Frame::new(Header::new(frame_type, flags, stream_id, length), None));
    }

    fn queue_data(&mut self, stream_id: u32, flags: Flags, payload: Bytes) {
        self.outbound.push(Frame::new(
            Header::new(FrameType::Data, flags, stream_id, payload.len() as u32),
            Some(payload),
        ));
    }

    // -- outbound stream lifecycle -----------------------------------------

    /// Allocates and opens a new locally-initiated stream, queuing its SYN.
    pub fn open_stream(&mut self) -> Result<StreamId, Error> {
        if self.quiescing || self.state.is_quiescing_or_closed() {
            return Err(Error::ChannelSetupRejected {
                reason: "session is quiescing or closed",
            });
        }
        let id = self.next_local_id.ok_or(Error::ChannelSetupRejected {
            reason: "local stream id space is exhausted",
        })?;
        self.next_local_id = id.next_of_role();

        let mut entry = StreamEntry::new(self.config.initial_stream_window_bytes(), true);
        entry.state.send_syn()?;
        self.streams.insert(id, entry);
        self.queue(FrameType::WindowUpdate, Flags::SYN, id.as_u32(), 0);
        tracing::debug!(stream = id.as_u32(), "opening stream");
        Ok(id)
    }

    /// Marks a pending local open as cancelled: an ACK arriving afterwards is
    /// answered with an immediate RST instead of completing the open.
    pub fn cancel_open(&mut self, id: StreamId) -> Result<(), Error> {
        let entry = self
            .streams
            .get_mut(&id)
            .ok_or(Error::UnknownStream { id: id.as_u32() })?;
        entry.cancelled = true;
        Ok(())
    }

    /// Writes application bytes to `id`, splitting across `Data` frames
    /// bounded by the peer's free window and the configured frame size cap.
    ///
    /// Returns `Ok(0)` for a non-empty `bytes` when the outbound window is
    /// currently exhausted; the caller is expected to retry once
    /// [`Delegate::on_window_increased`](crate::delegate::Delegate::on_window_increased)
    /// fires for `id`.
    pub fn write(&mut self, id: StreamId, mut bytes: &[u8]) -> Result<usize, Error> {
        let max_frame_payload_bytes = self.config.max_frame_payload_bytes();
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                if self.errored_ids.contains(&id) {
                    return Err(Error::StreamNotWritable);
                }
                return Err(Error::UnknownStream { id: id.as_u32() });
            }
        };
        if !matches!(entry.state, StreamState::Established) {
            return Err(Error::StreamNotWritable);
        }

        let mut written = 0usize;
        while !bytes.is_empty() {
            let cap = entry.outbound.max_frame_payload(max_frame_payload_bytes);
            if cap == 0 {
                break;
            }
            let take = (cap as usize).min(bytes.len());
            let (chunk, rest) = bytes.split_at(take);
            entry.outbound.on_buffer(take as u64);
            entry.outbound.on_wrote(take as u32);
            self.outbound.push(Frame::new(
                Header::new(FrameType::Data, Flags::EMPTY, id.as_u32(), take as u32),
                Some(Bytes::copy_from_slice(chunk)),
            ));
            written += take;
            bytes = rest;
        }
        Ok(written)
    }

    /// Half-closes `id`. Idempotent: closing an already-closed stream is a no-op.
    pub fn close_stream(&mut self, id: StreamId) -> Result<(), Error> {
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                if self.errored_ids.contains(&id) {
                    return Ok(());
                }
                return Err(Error::UnknownStream { id: id.as_u32() });
            }
        };
        match entry.state.send_fin() {
            Ok(()) => {
                self.queue(FrameType::WindowUpdate, Flags::FIN, id.as_u32(), 0);
                self.finalize_if_terminal(id);
                Ok(())
            }
            Err(yamux_core::state::Error::NoOp { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Aborts `id` immediately, queuing an RST. Idempotent for the same reason as
    /// [`Session::close_stream`].
    pub fn reset_stream(&mut self, id: StreamId) -> Result<(), Error> {
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                if self.errored_ids.contains(&id) {
                    return Ok(());
                }
                return Err(Error::UnknownStream { id: id.as_u32() });
            }
        };
        match entry.state.reset() {
            Ok(()) => {
                self.queue(FrameType::WindowUpdate, Flags::RST, id.as_u32(), 0);
                self.finalize_if_terminal(id);
                Ok(())
            }
            Err(yamux_core::state::Error::NoOp { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Queues a session-level `Ping` carrying an opaque value the peer will echo.
    pub fn ping(&mut self, value: u32) {
        self.queue(FrameType::Ping, Flags::EMPTY, 0, value);
    }

    /// Sends `GoAway` and stops accepting new streams locally.
    pub fn go_away(&mut self, code: GoAwayCode) -> Result<(), Error> {
        self.state.send_go_away()?;
        self.queue(FrameType::GoAway, Flags::EMPTY, 0, code.as_u32());
        Ok(())
    }

    /// Stops accepting new streams, FINs every established stream, RSTs every
    /// stream that hasn't reached a state `close_stream` can FIN (still
    /// mid-handshake, or already half-closed in the direction the FIN would
    /// need), and sends `GoAway(NoError)` once they have all reached a
    /// terminal state.
    pub fn close_all_streams(&mut self) {
        self.quiescing = true;
        let ids: Vec<StreamId> = self.streams.keys().copied().collect();
        for id in ids {
            if self.close_stream(id).is_err() {
                let _ = self.reset_stream(id);
            }
        }
        self.maybe_finish_quiesce();
    }

    fn maybe_finish_quiesce(&mut self) {
        if self.quiescing && self.streams.is_empty() {
            self.quiescing = false;
            let _ = self.go_away(GoAwayCode::NoError);
        }
    }

    /// Forcibly terminates the session: every stream fails with
    /// [`Error::TransportShutdown`] and no further frames are produced.
    pub fn handle_transport_shutdown(&mut self) {
        self.fail_session(Error::TransportShutdown);
    }

    fn fail_session(&mut self, error: Error) {
        if matches!(self.state, SessionState::Closed) {
            return;
        }
        tracing::error!(%error, "session failed");
        if let Some(code) = error.go_away_code() {
            self.queue(FrameType::GoAway, Flags::EMPTY, 0, code.as_u32());
        }
        let ids: Vec<StreamId> = self.streams.keys().copied().collect();
        for id in ids {
            self.streams.remove(&id);
            self.delegate.on_stream_closed(id);
        }
        self.errored_ids.clear();
        let _ = self.state.shutdown();
        self.delegate.on_session_error(error);
    }

    fn finalize_if_terminal(&mut self, id: StreamId) {
        let terminal = self.streams.get(&id).map(|entry| entry.state.is_terminal());
        if terminal == Some(true) {
            self.streams.remove(&id);
            self.errored_ids.insert(id);
            self.delegate.on_stream_closed(id);
            if self.quiescing {
                self.maybe_finish_quiesce();
            }
        }
    }

    // -- inbound -------------------------------------------------------------

    /// Feeds newly-received bytes through the frame codec and routes every
    /// decoded frame. Returns the number of bytes consumed from `input`.
    ///
    /// On a session-fatal error, the session is already torn down
    /// (`GoAway` queued, every stream failed) by the time this returns `Err`;
    /// the caller's only remaining job is to close the transport.
    pub fn receive(&mut self, input: &[u8]) -> Result<usize, Error> {
        let mut offset = 0;
        loop {
            match self.decoder.decode(&input[offset..]) {
                Ok(Decoded::NeedMoreData) => return Ok(offset),
                Ok(Decoded::Frame { frame, consumed }) => {
                    offset += consumed;
                    if let Err(err) = self.process_frame(frame) {
                        self.fail_session(err);
                        return Err(err);
                    }
                }
                Err(err) => {
                    self.fail_session(err);
                    return Err(err);
                }
            }
        }
    }

    fn process_frame(&mut self, frame: OwnedFrame) -> Result<(), Error> {
        for message in frame.messages() {
            self.process_message(message)?;
        }
        Ok(())
    }

    fn process_message(&mut self, message: Message<Bytes>) -> Result<(), Error> {
        match message {
            Message::SessionOpen => {
                self.queue(FrameType::Ping, Flags::ACK, 0, 0);
                if matches!(self.state, SessionState::Idle) {
                    self.state.session_opened()?;
                }
            }
            Message::SessionOpenAck => {
                if matches!(self.state, SessionState::Idle) {
                    self.state.session_opened()?;
                } else {
                    // Once the handshake is done, a Ping|ACK can only be the
                    // peer echoing one of our keep-alive pings.
                    self.delegate.on_pong();
                }
            }
            Message::Ping { value } => {
                self.queue(FrameType::Ping, Flags::ACK, 0, value);
            }
            Message::GoAway { code: _ } => {
                self.state.recv_go_away()?;
                let ids: Vec<StreamId> = self.streams.keys().copied().collect();
                for id in ids {
                    self.streams.remove(&id);
                    self.delegate.on_stream_closed(id);
                }
                self.errored_ids.clear();
                // The peer won't send or accept anything further: close the
                // transport from this side too instead of idling forever in
                // `GoAwayReceived`.
                let _ = self.state.shutdown();
            }
            Message::ChannelOpen { id } => self.handle_channel_open(StreamId::new(id))?,
            Message::ChannelOpenAck { id } => self.handle_channel_open_ack(StreamId::new(id))?,
            Message::ChannelData { id, payload } => {
                self.handle_channel_data(StreamId::new(id), payload)?
            }
            Message::ChannelWindowAdjust { id, increment } => {
                self.handle_window_adjust(StreamId::new(id), increment)?
            }
            Message::ChannelClose { id } => self.handle_channel_close(StreamId::new(id))?,
            Message::ChannelReset { id } => self.handle_channel_reset(StreamId::new(id))?,
        }
        Ok(())
    }

    fn handle_channel_open(&mut self, id: StreamId) -> Result<(), Error> {
        // ID collision (still live, or recently torn down): reject locally, the
        // session stays valid.
        if self.streams.contains_key(&id) || self.errored_ids.contains(&id) {
            self.queue(FrameType::WindowUpdate, Flags::RST, id.as_u32(), 0);
            return Ok(());
        }
        // Wrong parity is a peer protocol violation, not a benign collision.
        if id.role() != Some(self.role.peer_role()) {
            return Err(Error::ProtocolViolation {
                reason: "stream id parity does not match the peer's role",
            });
        }
        if self.quiescing || self.state.is_quiescing_or_closed() {
            self.queue(FrameType::WindowUpdate, Flags::RST, id.as_u32(), 0);
            self.errored_ids.insert(id);
            return Ok(());
        }

        let mut entry = StreamEntry::new(self.config.initial_stream_window_bytes(), false);
        entry.state.recv_syn()?;
        if self.delegate.accept_inbound_stream(id) {
            entry.state.send_ack()?;
            self.streams.insert(id, entry);
            self.queue(FrameType::WindowUpdate, Flags::ACK, id.as_u32(), 0);
            self.delegate
                .on_stream_state_changed(id, StreamState::Established);
        } else {
            self.queue(FrameType::WindowUpdate, Flags::RST, id.as_u32(), 0);
            self.errored_ids.insert(id);
        }
        Ok(())
    }

    fn handle_channel_open_ack(&mut self, id: StreamId) -> Result<(), Error> {
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                if self.errored_ids.contains(&id) {
                    return Ok(());
                }
                return Err(Error::UnknownStream { id: id.as_u32() });
            }
        };
        if entry.cancelled {
            self.queue(FrameType::WindowUpdate, Flags::RST, id.as_u32(), 0);
            self.streams.remove(&id);
            self.errored_ids.insert(id);
            return Ok(());
        }
        entry.state.recv_ack()?;
        self.delegate
            .on_stream_state_changed(id, StreamState::Established);
        Ok(())
    }

    fn handle_channel_data(&mut self, id: StreamId, payload: Bytes) -> Result<(), Error> {
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                if self.errored_ids.contains(&id) {
                    return Ok(());
                }
                return Err(Error::UnknownStream { id: id.as_u32() });
            }
        };
        entry.inbound.on_receive(payload.len() as u32)?;
        entry.state.recv_data()?;
        self.delegate.on_data(id, payload);
        if let Some(delta) = self.streams.get_mut(&id).and_then(|e| e.inbound.poll_increment()) {
            self.queue(FrameType::WindowUpdate, Flags::EMPTY, id.as_u32(), delta);
        }
        Ok(())
    }

    fn handle_window_adjust(&mut self, id: StreamId, increment: u32) -> Result<(), Error> {
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                if self.errored_ids.contains(&id) {
                    return Ok(());
                }
                return Err(Error::UnknownStream { id: id.as_u32() });
            }
        };
        entry.outbound.on_window_increment(increment)?;
        entry.state.recv_window_update()?;
        self.delegate.on_window_increased(id);
        Ok(())
    }

    fn handle_channel_close(&mut self, id: StreamId) -> Result<(), Error> {
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                if self.errored_ids.remove(&id) {
                    return Ok(());
                }
                return Err(Error::UnknownStream { id: id.as_u32() });
            }
        };
        entry.state.recv_fin()?;
        let new_state = entry.state;
        self.delegate.on_stream_state_changed(id, new_state);
        self.finalize_if_terminal(id);
        Ok(())
    }

    fn handle_channel_reset(&mut self, id: StreamId) -> Result<(), Error> {
        let entry = match self.streams.get_mut(&id) {
            Some(entry) => entry,
            None => {
                self.errored_ids.remove(&id);
                return Ok(());
            }
        };
        let _ = entry.state.reset();
        self.finalize_if_terminal(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDelegate {
        accepted: Vec<StreamId>,
        data: Vec<(StreamId, Bytes)>,
        closed: Vec<StreamId>,
        errors: Vec<Error>,
        window_increased: Vec<StreamId>,
    }

    impl Delegate for RecordingDelegate {
        fn accept_inbound_stream(&mut self, id: StreamId) -> bool {
            self.accepted.push(id);
            true
        }
        fn on_data(&mut self, id: StreamId, payload: Bytes) {
            self.data.push((id, payload));
        }
        fn on_stream_state_changed(&mut self, _id: StreamId, _state: StreamState) {}
        fn on_stream_closed(&mut self, id: StreamId) {
            self.closed.push(id);
        }
        fn on_session_error(&mut self, error: Error) {
            self.errors.push(error);
        }
        fn on_pong(&mut self) {}
        fn on_window_increased(&mut self, id: StreamId) {
            self.window_increased.push(id);
        }
    }

    fn header_bytes(frame_type: FrameType, flags: Flags, stream_id: u32, length: u32) -> [u8; 12] {
        let mut out = [0u8; 12];
        yamux_core::frame::encode_header(&Header::new(frame_type, flags, stream_id, length), &mut out);
        out
    }

    #[test]
    fn listener_session_open_handshake() {
        let mut session = Session::new(Role::Listener, Config::default(), RecordingDelegate::default());
        session.attach();
        assert_eq!(session.take_outbound().len(), 1);

        let ack = header_bytes(FrameType::Ping, Flags::ACK, 0, 0);
        session.receive(&ack).unwrap();
        assert_eq!(session.state(), SessionState::Open);
    }

    #[test]
    fn ordinary_ping_is_echoed() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        let ping = header_bytes(FrameType::Ping, Flags::EMPTY, 0, 1234);
        session.receive(&ping).unwrap();
        let outbound = session.take_outbound();
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].header.flags, Flags::ACK);
        assert_eq!(outbound[0].header.length, 1234);
    }

    #[test]
    fn inbound_data_open_delivers_and_half_closes() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        let header = header_bytes(FrameType::Data, Flags::SYN | Flags::FIN, 2, 12);
        let mut bytes = Vec::from(&header[..]);
        bytes.extend_from_slice(b"Hello World!");

        session.receive(&bytes).unwrap();
        assert_eq!(
            session.stream_state(StreamId::new(2)),
            Some(StreamState::RemoteHalfClosed)
        );
        assert_eq!(session.delegate.data.len(), 1);
        assert_eq!(session.delegate.data[0].1, Bytes::from_static(b"Hello World!"));
    }

    #[test]
    fn wrong_parity_syn_fails_the_session() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        let header = header_bytes(FrameType::Data, Flags::SYN, 3, 0);
        assert!(session.receive(&header).is_err());
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.delegate.errors.len(), 1);
    }

    #[test]
    fn window_increment_overflow_fails_the_session() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        session.open_stream().unwrap();
        let ack = header_bytes(FrameType::WindowUpdate, Flags::ACK, 1, 0);
        session.receive(&ack).unwrap();

        // Drain the stream's outbound window close to the u32 ceiling so the
        // next increment overflows.
        if let Some(entry) = session.streams.get_mut(&StreamId::new(1)) {
            entry.outbound = yamux_core::flow::OutboundController::new(u32::MAX - 10);
        }
        let overflow = header_bytes(FrameType::WindowUpdate, Flags::EMPTY, 1, 20);
        assert!(session.receive(&overflow).is_err());
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn write_reports_zero_when_the_outbound_window_is_exhausted_then_notifies_on_credit() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        session.open_stream().unwrap();
        let ack = header_bytes(FrameType::WindowUpdate, Flags::ACK, 1, 0);
        session.receive(&ack).unwrap();

        // Drain the window to zero so the next write can't send anything.
        if let Some(entry) = session.streams.get_mut(&StreamId::new(1)) {
            entry.outbound = yamux_core::flow::OutboundController::new(0);
        }
        assert_eq!(session.write(StreamId::new(1), b"hello").unwrap(), 0);
        assert!(session.delegate.window_increased.is_empty());

        let credit = header_bytes(FrameType::WindowUpdate, Flags::EMPTY, 1, 5);
        session.receive(&credit).unwrap();
        assert_eq!(session.delegate.window_increased, vec![StreamId::new(1)]);

        assert_eq!(session.write(StreamId::new(1), b"hello").unwrap(), 5);
    }

    #[test]
    fn go_away_terminates_every_stream() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        session.open_stream().unwrap();
        let goaway = header_bytes(FrameType::GoAway, Flags::EMPTY, 0, 0);
        session.receive(&goaway).unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.streams.is_empty());
        assert_eq!(session.delegate.closed, vec![StreamId::new(1)]);
    }

    #[test]
    fn close_all_resets_a_stream_still_mid_handshake() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        session.open_stream().unwrap();
        assert_eq!(session.stream_state(StreamId::new(1)), Some(StreamState::SynSent));

        session.close_all_streams();

        // `SynSent` can't be FINed, so the quiesce falls back to RST; the
        // stream still reaches a terminal state and GoAway still fires.
        assert!(session.stream_state(StreamId::new(1)).is_none());
        let outbound = session.take_outbound();
        assert!(outbound.iter().any(|f| f.header.flags == Flags::RST));
        assert!(outbound
            .iter()
            .any(|f| f.header.frame_type == FrameType::GoAway));
    }

    #[test]
    fn write_close_and_reset_are_idempotent_once_a_stream_is_gone() {
        let mut session = Session::new(Role::Initiator, Config::default(), RecordingDelegate::default());
        session.open_stream().unwrap();
        let ack = header_bytes(FrameType::WindowUpdate, Flags::ACK, 1, 0);
        session.receive(&ack).unwrap();

        session.reset_stream(StreamId::new(1)).unwrap();
        assert!(session.stream_state(StreamId::new(1)).is_none());

        // The stream is gone from `streams` but still in the `errored_ids`
        // grace set: further calls must be no-ops / `StreamNotWritable`,
        // never `UnknownStream`.
        assert!(session.reset_stream(StreamId::new(1)).is_ok());
        assert!(session.close_stream(StreamId::new(1)).is_ok());
        assert!(matches!(
            session.write(StreamId::new(1), b"late"),
            Err(Error::StreamNotWritable)
        ));
    }

    #[test]
    fn rejecting_a_stream_sends_rst_and_remembers_the_id() {
        struct Rejecting;
        impl Delegate for Rejecting {
            fn accept_inbound_stream(&mut self, _id: StreamId) -> bool {
                false
            }
            fn on_data(&mut self, _id: StreamId, _payload: Bytes) {}
            fn on_stream_state_changed(&mut self, _id: StreamId, _state: StreamState) {}
            fn on_stream_closed(&mut self, _id: StreamId) {}
            fn on_session_error(&mut self, _error: Error) {}
            fn on_pong(&mut self) {}
            fn on_window_increased(&mut self, _id: StreamId) {}
        }
        let mut session = Session::new(Role::Initiator, Config::default(), Rejecting);
        let syn = header_bytes(FrameType::Data, Flags::SYN, 2, 0);
        session.receive(&syn).unwrap();
        let outbound = session.take_outbound();
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].header.flags, Flags::RST);
        assert!(session.stream_state(StreamId::new(2)).is_none());

        // A trailing control frame for the rejected ID is dropped, not fatal.
        let trailing = header_bytes(FrameType::WindowUpdate, Flags::EMPTY, 2, 0);
        assert!(session.receive(&trailing).is_ok());
    }
}
