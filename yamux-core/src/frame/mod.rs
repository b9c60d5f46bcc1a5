// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The yamux wire frame: a 12-byte header plus an optional `Data` payload.

mod flags;
mod header;
mod message;

pub use flags::Flags;
pub use header::{FrameType, Header, HEADER_LEN, VERSION};
pub use message::Message;

use crate::error::Error;
use s2n_codec::{DecoderBuffer, DecoderValue, EncoderBuffer, EncoderValue};

#[cfg(feature = "alloc")]
use bytes::Bytes;

/// A decoded frame: a header plus, for `Data` frames, its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame<P> {
    pub header: Header,
    pub payload: Option<P>,
}

impl<P> Frame<P> {
    #[inline]
    pub fn new(header: Header, payload: Option<P>) -> Self {
        Self { header, payload }
    }
}

#[cfg(feature = "alloc")]
pub type OwnedFrame = Frame<Bytes>;

/// Encodes a header-only frame (WindowUpdate, Ping, GoAway, or an empty
/// Data control frame) into `out`, returning the number of bytes written.
pub fn encode_header(header: &Header, out: &mut [u8; HEADER_LEN]) {
    let mut encoder = EncoderBuffer::new(out);
    encoder.encode(header);
}

/// Encodes a `Data` frame's header and payload into `out`.
///
/// `out` must have capacity for `HEADER_LEN + payload.len()` bytes.
#[cfg(feature = "alloc")]
pub fn encode_data(header: &Header, payload: &[u8], out: &mut [u8]) -> Result<(), Error> {
    if out.len() < HEADER_LEN + payload.len() {
        return Err(Error::InvalidPacketFormat {
            reason: "output buffer too small to hold the encoded frame",
        });
    }
    let mut encoder = EncoderBuffer::new(out);
    encoder.encode(header);
    encoder.write_slice(payload);
    Ok(())
}

/// The result of attempting to decode one frame from an accumulated buffer.
#[cfg(feature = "alloc")]
#[derive(Debug)]
pub enum Decoded {
    /// The buffer does not yet hold a complete frame; nothing was consumed.
    NeedMoreData,
    /// A complete frame was decoded, consuming `consumed` bytes from the front of the buffer.
    Frame { frame: OwnedFrame, consumed: usize },
}

/// Incremental frame decoder.
///
/// Call [`FrameDecoder::decode`] with the full buffer of bytes received so
/// far but not yet consumed. On [`Decoded::Frame`], the caller must drop the
/// first `consumed` bytes from its buffer before calling again.
#[cfg(feature = "alloc")]
#[derive(Default)]
pub struct FrameDecoder {
    pending_header: Option<Header>,
}

#[cfg(feature = "alloc")]
impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, input: &[u8]) -> Result<Decoded, Error> {
        let header = match self.pending_header {
            Some(header) => header,
            None => {
                if input.len() < HEADER_LEN {
                    return Ok(Decoded::NeedMoreData);
                }
                if input[0] != VERSION {
                    return Err(Error::UnsupportedVersion { version: input[0] });
                }
                let (header, _) = Header::decode(DecoderBuffer::new(&input[..HEADER_LEN]))?;
                header.validate()?;
                header
            }
        };

        let is_data = header.frame_type == FrameType::Data;
        let payload_len = if is_data { header.length as usize } else { 0 };

        if is_data && payload_len == 0 && header.flags.is_empty() {
            return Err(Error::InvalidPacketFormat {
                reason: "zero-length Data frame must carry a control flag",
            });
        }

        let total = HEADER_LEN + payload_len;
        if input.len() < total {
            self.pending_header = Some(header);
            return Ok(Decoded::NeedMoreData);
        }

        self.pending_header = None;

        let payload = is_data.then(|| Bytes::copy_from_slice(&input[HEADER_LEN..total]));

        Ok(Decoded::Frame {
            frame: Frame::new(header, payload),
            consumed: total,
        })
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> alloc::string::String {
        use core::fmt::Write;
        let mut s = alloc::string::String::new();
        for b in bytes {
            write!(s, "{b:02X} ").unwrap();
        }
        s
    }

    #[test]
    fn session_open_bytes_match_worked_example() {
        let header = Header::new(FrameType::Ping, Flags::SYN, 0, 0);
        let mut out = [0u8; HEADER_LEN];
        encode_header(&header, &mut out);
        assert_eq!(
            hex(&out).trim(),
            "00 02 00 01 00 00 00 00 00 00 00 00"
        );
    }

    #[test]
    fn ping_echo_bytes_match_worked_example() {
        let header = Header::new(FrameType::Ping, Flags::ACK, 0, 1234);
        let mut out = [0u8; HEADER_LEN];
        encode_header(&header, &mut out);
        assert_eq!(
            hex(&out).trim(),
            "00 02 00 02 00 00 00 00 00 00 04 D2"
        );
    }

    #[test]
    fn decode_needs_more_data_until_full_header_available() {
        let mut decoder = FrameDecoder::new();
        let partial = [0u8; HEADER_LEN - 1];
        assert!(matches!(
            decoder.decode(&partial).unwrap(),
            Decoded::NeedMoreData
        ));
    }

    #[test]
    fn decode_buffers_header_while_awaiting_payload() {
        let header = Header::new(FrameType::Data, Flags::SYN, 1, 12);
        let mut buf = [0u8; HEADER_LEN];
        encode_header(&header, &mut buf);

        let mut decoder = FrameDecoder::new();
        assert!(matches!(
            decoder.decode(&buf).unwrap(),
            Decoded::NeedMoreData
        ));
        assert!(decoder.pending_header.is_some());

        let mut full = alloc::vec::Vec::from(&buf[..]);
        full.extend_from_slice(b"Hello World!");
        match decoder.decode(&full).unwrap() {
            Decoded::Frame { frame, consumed } => {
                assert_eq!(consumed, HEADER_LEN + 12);
                assert_eq!(frame.payload.unwrap(), Bytes::from_static(b"Hello World!"));
            }
            Decoded::NeedMoreData => panic!("expected a complete frame"),
        }
    }

    #[test]
    fn decode_rejects_zero_length_flagless_data() {
        let header = Header::new(FrameType::Data, Flags::EMPTY, 1, 0);
        let mut buf = [0u8; HEADER_LEN];
        encode_header(&header, &mut buf);
        let mut decoder = FrameDecoder::new();
        assert!(decoder.decode(&buf).is_err());
    }

    #[test]
    fn decode_goaway_round_trips_the_worked_example() {
        let bytes = [0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut decoder = FrameDecoder::new();
        match decoder.decode(&bytes).unwrap() {
            Decoded::Frame { frame, consumed } => {
                assert_eq!(consumed, HEADER_LEN);
                assert_eq!(frame.header.frame_type, FrameType::GoAway);
                assert_eq!(frame.header.length, 0);
            }
            Decoded::NeedMoreData => panic!("goaway header is complete on its own"),
        }
    }
}
