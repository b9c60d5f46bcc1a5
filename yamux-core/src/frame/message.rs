// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The "messages" view derived from a single frame.
//!
//! A single wire frame can carry several logically distinct events at once
//! (for example `SYN|FIN|Data` both opens and half-closes a stream while
//! delivering a payload). [`Frame::messages`] destructures a frame's type
//! and flags into the canonical, deterministically ordered sequence of
//! [`Message`]s a consumer should process.

use crate::frame::{Frame, FrameType};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A single logical event carried by a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message<P> {
    SessionOpen,
    SessionOpenAck,
    Ping { value: u32 },
    GoAway { code: u32 },
    ChannelOpen { id: u32 },
    ChannelOpenAck { id: u32 },
    ChannelData { id: u32, payload: P },
    ChannelWindowAdjust { id: u32, increment: u32 },
    ChannelClose { id: u32 },
    ChannelReset { id: u32 },
}

impl<P> Message<P> {
    /// The canonical processing rank: SYN, ACK, Data, WindowUpdate, Ping, FIN, RST, GoAway.
    pub const fn rank(&self) -> u8 {
        match self {
            Message::SessionOpen | Message::ChannelOpen { .. } => 0,
            Message::SessionOpenAck | Message::ChannelOpenAck { .. } => 1,
            Message::ChannelData { .. } => 2,
            Message::ChannelWindowAdjust { .. } => 3,
            Message::Ping { .. } => 4,
            Message::ChannelClose { .. } => 5,
            Message::ChannelReset { .. } => 6,
            Message::GoAway { .. } => 7,
        }
    }
}

#[cfg(feature = "alloc")]
impl<P: Clone> Frame<P> {
    /// Produces the ordered list of [`Message`]s carried by this frame.
    ///
    /// The list is already in canonical rank order: callers can process it
    /// front-to-back without separately sorting.
    pub fn messages(&self) -> Vec<Message<P>> {
        let mut messages = Vec::with_capacity(3);
        let header = &self.header;
        let flags = header.flags;

        if header.stream_id == 0 {
            match header.frame_type {
                FrameType::Ping => {
                    if flags.contains(crate::frame::Flags::SYN) {
                        messages.push(Message::SessionOpen);
                    } else if flags.contains(crate::frame::Flags::ACK) {
                        messages.push(Message::SessionOpenAck);
                    } else {
                        messages.push(Message::Ping {
                            value: header.length,
                        });
                    }
                }
                FrameType::GoAway => {
                    messages.push(Message::GoAway {
                        code: header.length,
                    });
                }
                FrameType::Data | FrameType::WindowUpdate => unreachable!(
                    "session-level frames never carry a Data/WindowUpdate type"
                ),
            }
            return messages;
        }

        let id = header.stream_id;

        if flags.contains(crate::frame::Flags::SYN) {
            messages.push(Message::ChannelOpen { id });
        }
        if flags.contains(crate::frame::Flags::ACK) {
            messages.push(Message::ChannelOpenAck { id });
        }
        match header.frame_type {
            FrameType::Data => {
                if let Some(payload) = self.payload.clone() {
                    messages.push(Message::ChannelData { id, payload });
                }
            }
            FrameType::WindowUpdate => {
                messages.push(Message::ChannelWindowAdjust {
                    id,
                    increment: header.length,
                });
            }
            FrameType::Ping | FrameType::GoAway => {
                unreachable!("stream-level frames never carry a Ping/GoAway type")
            }
        }
        if flags.contains(crate::frame::Flags::FIN) {
            messages.push(Message::ChannelClose { id });
        }
        if flags.contains(crate::frame::Flags::RST) {
            messages.push(Message::ChannelReset { id });
        }

        messages
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::frame::{Flags, Header};

    #[test]
    fn data_syn_fin_orders_open_data_close() {
        let header = Header::new(FrameType::Data, Flags::SYN | Flags::FIN, 1, 12);
        let frame = Frame::new(header, Some(&b"Hello World!"[..]));
        let messages = frame.messages();
        assert_eq!(
            messages,
            vec![
                Message::ChannelOpen { id: 1 },
                Message::ChannelData {
                    id: 1,
                    payload: &b"Hello World!"[..]
                },
                Message::ChannelClose { id: 1 },
            ]
        );
    }

    #[test]
    fn session_open_is_ping_with_syn() {
        let header = Header::new(FrameType::Ping, Flags::SYN, 0, 0);
        let frame: Frame<()> = Frame::new(header, None);
        assert_eq!(frame.messages(), vec![Message::SessionOpen]);
    }

    #[test]
    fn ordinary_ping_echoes_its_length() {
        let header = Header::new(FrameType::Ping, Flags::EMPTY, 0, 1234);
        let frame: Frame<()> = Frame::new(header, None);
        assert_eq!(frame.messages(), vec![Message::Ping { value: 1234 }]);
    }

    #[test]
    fn ranks_are_in_canonical_order() {
        let open = Message::<()>::ChannelOpen { id: 1 };
        let ack = Message::<()>::ChannelOpenAck { id: 1 };
        let data = Message::ChannelData { id: 1, payload: () };
        let window = Message::<()>::ChannelWindowAdjust { id: 1, increment: 1 };
        let ping = Message::<()>::Ping { value: 0 };
        let close = Message::<()>::ChannelClose { id: 1 };
        let reset = Message::<()>::ChannelReset { id: 1 };
        let goaway = Message::<()>::GoAway { code: 0 };
        assert!(open.rank() < ack.rank());
        assert!(ack.rank() < data.rank());
        assert!(data.rank() < window.rank());
        assert!(window.rank() < ping.rank());
        assert!(ping.rank() < close.rank());
        assert!(close.rank() < reset.rank());
        assert!(reset.rank() < goaway.rank());
    }
}
