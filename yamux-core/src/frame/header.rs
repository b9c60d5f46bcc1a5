// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{error::Error, frame::flags::Flags};
use s2n_codec::{DecoderBuffer, DecoderBufferResult, DecoderValue, Encoder, EncoderValue};

/// The version byte yamux requires on every frame.
pub const VERSION: u8 = 0;

/// The fixed size, in bytes, of a yamux frame header.
pub const HEADER_LEN: usize = 12;

/// The type byte of a yamux frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameType {
    Data = 0,
    WindowUpdate = 1,
    Ping = 2,
    GoAway = 3,
}

impl FrameType {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FrameType::Data),
            1 => Some(FrameType::WindowUpdate),
            2 => Some(FrameType::Ping),
            3 => Some(FrameType::GoAway),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_session_level(self) -> bool {
        matches!(self, FrameType::Ping | FrameType::GoAway)
    }
}

/// The 12-byte fixed header shared by every yamux frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub frame_type: FrameType,
    pub flags: Flags,
    pub stream_id: u32,
    pub length: u32,
}

impl Header {
    #[inline]
    pub fn new(frame_type: FrameType, flags: Flags, stream_id: u32, length: u32) -> Self {
        Self {
            frame_type,
            flags,
            stream_id,
            length,
        }
    }

    /// Validates the header against the rules in the frame codec's decode path.
    ///
    /// This does not validate that a zero-length, flagless Data header is
    /// illegal; the codec checks that once the payload length is known.
    pub fn validate(&self) -> Result<(), Error> {
        match self.frame_type {
            FrameType::Ping | FrameType::GoAway if self.stream_id != 0 => {
                Err(Error::InvalidPacketFormat {
                    reason: "session-level frame must use stream id 0",
                })
            }
            FrameType::Data | FrameType::WindowUpdate if self.stream_id == 0 => {
                Err(Error::InvalidPacketFormat {
                    reason: "stream-level frame must not use stream id 0",
                })
            }
            _ => Ok(()),
        }
    }
}

impl<'a> DecoderValue<'a> for Header {
    fn decode(buffer: DecoderBuffer<'a>) -> DecoderBufferResult<'a, Self> {
        let (version, buffer) = buffer.decode::<u8>()?;
        if version != VERSION {
            return Err(s2n_codec::DecoderError::InvariantViolation(
                "unsupported yamux header version",
            ));
        }

        let (raw_type, buffer) = buffer.decode::<u8>()?;
        let frame_type = FrameType::from_u8(raw_type).ok_or(
            s2n_codec::DecoderError::InvariantViolation("unknown yamux frame type"),
        )?;

        let (flags, buffer) = buffer.decode::<Flags>()?;
        let (stream_id, buffer) = buffer.decode::<u32>()?;
        let (length, buffer) = buffer.decode::<u32>()?;

        let header = Header::new(frame_type, flags, stream_id, length);
        Ok((header, buffer))
    }
}

impl EncoderValue for Header {
    fn encode<E: Encoder>(&self, encoder: &mut E) {
        encoder.encode(&VERSION);
        encoder.encode(&self.frame_type.as_u8());
        encoder.encode(&self.flags);
        encoder.encode(&self.stream_id);
        encoder.encode(&self.length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s2n_codec::EncoderBuffer;

    #[test]
    fn round_trips_through_encode_decode() {
        let header = Header::new(FrameType::Data, Flags::SYN | Flags::FIN, 1, 12);

        let mut bytes = [0u8; HEADER_LEN];
        let mut encoder = EncoderBuffer::new(&mut bytes);
        encoder.encode(&header);
        assert_eq!(encoder.len(), HEADER_LEN);

        let (decoded, remaining) = Header::decode(DecoderBuffer::new(&bytes)).unwrap();
        assert!(remaining.is_empty());
        assert_eq!(decoded, header);
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0] = 7;
        assert!(Header::decode(DecoderBuffer::new(&bytes)).is_err());
    }

    #[test]
    fn rejects_session_frame_with_nonzero_stream_id() {
        let header = Header::new(FrameType::Ping, Flags::EMPTY, 3, 0);
        assert!(header.validate().is_err());
    }

    #[test]
    fn rejects_stream_frame_with_zero_stream_id() {
        let header = Header::new(FrameType::Data, Flags::EMPTY, 0, 0);
        assert!(header.validate().is_err());
    }
}
