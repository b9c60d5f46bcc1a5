// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The error taxonomy shared by the frame codec, state machines, and the
//! `yamux-transport`/`yamux` crates built on top of them.

use core::fmt;
use s2n_codec::DecoderError;

/// A session-level error code, carried in the `length` field of a `GoAway` frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum GoAwayCode {
    /// The session is closing normally.
    NoError = 0,
    /// A peer violated the protocol.
    ProtocolError = 1,
    /// The local endpoint hit an internal error.
    InternalError = 2,
}

impl GoAwayCode {
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

/// The kinds of failures that can occur while decoding, validating, or
/// driving the yamux protocol.
///
/// This is a kind taxonomy, not a single concrete type per failure: each
/// variant carries a `reason` for diagnostics but the dispatch logic that
/// turns an `Error` into wire-level recovery (GoAway code, RST, silent drop)
/// lives in the session executor, not in this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The frame header failed one of the validity rules in the codec.
    InvalidPacketFormat { reason: &'static str },
    /// A state machine or flow-control rule was broken by the peer.
    ProtocolViolation { reason: &'static str },
    /// The peer advertised a header version other than the one we support.
    UnsupportedVersion { version: u8 },
    /// A local or remote stream-open attempt was refused.
    ChannelSetupRejected { reason: &'static str },
    /// The peer sent more data than its credit allowed, or a window
    /// increment would have overflowed.
    FlowControlViolation { reason: &'static str },
    /// The caller wrote to a half-closed, closed, or reset stream.
    StreamNotWritable,
    /// The underlying transport ended.
    TransportShutdown,
    /// A frame referenced a stream ID we never allocated and the peer
    /// lacked the authority to create one (no SYN).
    UnknownStream { id: u32 },
}

impl Error {
    /// The [`GoAwayCode`] a session-fatal variant of this error maps to.
    ///
    /// Returns `None` for errors that are stream-local and do not fail the
    /// session (`ChannelSetupRejected`, `StreamNotWritable`, `UnknownStream`
    /// is folded into `ProtocolViolation` at the call site instead).
    pub const fn go_away_code(&self) -> Option<GoAwayCode> {
        match self {
            Error::InvalidPacketFormat { .. }
            | Error::ProtocolViolation { .. }
            | Error::UnsupportedVersion { .. }
            | Error::FlowControlViolation { .. } => Some(GoAwayCode::ProtocolError),
            Error::ChannelSetupRejected { .. }
            | Error::StreamNotWritable
            | Error::TransportShutdown
            | Error::UnknownStream { .. } => None,
        }
    }

    /// Returns true for errors that must fail the whole session, as opposed
    /// to errors scoped to a single stream.
    pub const fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidPacketFormat { .. }
                | Error::ProtocolViolation { .. }
                | Error::UnsupportedVersion { .. }
                | Error::FlowControlViolation { .. }
                | Error::TransportShutdown
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPacketFormat { reason } => {
                write!(f, "invalid packet format: {reason}")
            }
            Error::ProtocolViolation { reason } => {
                write!(f, "protocol violation: {reason}")
            }
            Error::UnsupportedVersion { version } => {
                write!(f, "unsupported header version {version}")
            }
            Error::ChannelSetupRejected { reason } => {
                write!(f, "stream open rejected: {reason}")
            }
            Error::FlowControlViolation { reason } => {
                write!(f, "flow control violation: {reason}")
            }
            Error::StreamNotWritable => f.write_str("stream is not writable"),
            Error::TransportShutdown => f.write_str("transport shut down"),
            Error::UnknownStream { id } => write!(f, "unknown stream id {id}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Implements conversion from a state-machine transition rejection.
///
/// A `NoOp` is collapsed into the same `ProtocolViolation` as an
/// `InvalidTransition`; callers for which a no-op is legal (idempotent
/// `close()`) must match on `state::Error` directly instead of going through
/// `?`.
impl<T: fmt::Debug> From<crate::state::Error<T>> for Error {
    fn from(err: crate::state::Error<T>) -> Self {
        match err {
            crate::state::Error::NoOp { .. } => Error::ProtocolViolation {
                reason: "redundant state transition",
            },
            crate::state::Error::InvalidTransition { .. } => Error::ProtocolViolation {
                reason: "invalid state transition",
            },
        }
    }
}

/// Implements conversion from decoder errors encountered while parsing a
/// frame header or payload.
impl From<DecoderError> for Error {
    fn from(decoder_error: DecoderError) -> Self {
        match decoder_error {
            DecoderError::UnexpectedEof(_) => Error::InvalidPacketFormat {
                reason: "buffer ended before the frame was fully decoded",
            },
            DecoderError::UnexpectedBytes(_) => Error::InvalidPacketFormat {
                reason: "trailing bytes after the frame",
            },
            DecoderError::LengthCapacityExceeded => Error::InvalidPacketFormat {
                reason: "frame length exceeds the platform's addressable range",
            },
            DecoderError::InvariantViolation(reason) => Error::InvalidPacketFormat { reason },
        }
    }
}

#[cfg(feature = "std")]
impl From<Error> for std::io::ErrorKind {
    fn from(error: Error) -> Self {
        match error {
            Error::InvalidPacketFormat { .. }
            | Error::ProtocolViolation { .. }
            | Error::UnsupportedVersion { .. }
            | Error::FlowControlViolation { .. } => std::io::ErrorKind::InvalidData,
            Error::ChannelSetupRejected { .. } => std::io::ErrorKind::ConnectionRefused,
            Error::StreamNotWritable => std::io::ErrorKind::NotConnected,
            Error::TransportShutdown => std::io::ErrorKind::BrokenPipe,
            Error::UnknownStream { .. } => std::io::ErrorKind::InvalidInput,
        }
    }
}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        std::io::Error::new(error.into(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_fatal_errors_map_to_protocol_error() {
        let err = Error::ProtocolViolation {
            reason: "bad transition",
        };
        assert!(err.is_session_fatal());
        assert_eq!(err.go_away_code(), Some(GoAwayCode::ProtocolError));
    }

    #[test]
    fn stream_local_errors_are_not_session_fatal() {
        let err = Error::ChannelSetupRejected {
            reason: "backlog full",
        };
        assert!(!err.is_session_fatal());
        assert_eq!(err.go_away_code(), None);
    }

    #[test]
    fn decoder_eof_maps_to_invalid_packet_format() {
        let err: Error = DecoderError::UnexpectedEof(12).into();
        assert!(matches!(err, Error::InvalidPacketFormat { .. }));
    }
}
