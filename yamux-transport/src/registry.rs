// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The live-stream table a [`crate::session::Session`] drives.

use yamux_core::flow::{InboundController, OutboundController};
use yamux_core::StreamState;

/// One registry entry: everything the session needs to drive a single stream.
pub struct StreamEntry {
    pub state: StreamState,
    pub outbound: OutboundController,
    pub inbound: InboundController,
    /// True if this endpoint sent the opening SYN.
    pub local_open: bool,
    /// Set when a pending local open is cancelled; an ACK arriving afterwards
    /// must be answered with an immediate RST instead of completing the open.
    pub cancelled: bool,
}

impl StreamEntry {
    pub fn new(initial_window: u32, local_open: bool) -> Self {
        Self {
            state: StreamState::default(),
            outbound: OutboundController::new(initial_window),
            inbound: InboundController::new(initial_window),
            local_open,
            cancelled: false,
        }
    }
}
