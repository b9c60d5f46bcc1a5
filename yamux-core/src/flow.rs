// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Per-stream flow control accounting.
//!
//! Outbound credit is granted by the peer via `WindowUpdate` frames and
//! spent as `Data` is sent; inbound credit is advertised to the peer as
//! bytes are consumed locally.

use crate::error::Error;

/// Tracks the outbound (send-side) flow control window for a single stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutboundController {
    free_window: u32,
    buffered_bytes: u64,
}

impl OutboundController {
    pub fn new(initial_window: u32) -> Self {
        Self {
            free_window: initial_window,
            buffered_bytes: 0,
        }
    }

    /// Remaining credit granted by the peer that has not yet been spent or buffered against.
    pub fn free_window(&self) -> u32 {
        self.free_window
    }

    pub fn buffered_bytes(&self) -> u64 {
        self.buffered_bytes
    }

    /// A stream is writable for backpressure-signaling purposes when there is
    /// more free window than bytes already buffered for send.
    pub fn is_writable(&self) -> bool {
        u64::from(self.free_window) > self.buffered_bytes
    }

    /// Records that `n` application bytes were queued for send.
    pub fn on_buffer(&mut self, n: u64) {
        self.buffered_bytes += n;
    }

    /// Records that `n` bytes were actually written out as `Data` payload.
    pub fn on_wrote(&mut self, n: u32) {
        self.buffered_bytes = self.buffered_bytes.saturating_sub(u64::from(n));
        self.free_window = self.free_window.saturating_sub(n);
    }

    /// Applies a peer `WindowUpdate` increment.
    pub fn on_window_increment(&mut self, delta: u32) -> Result<(), Error> {
        self.free_window =
            self.free_window
                .checked_add(delta)
                .ok_or(Error::FlowControlViolation {
                    reason: "window increment overflowed the outbound credit counter",
                })?;
        Ok(())
    }

    /// The maximum payload size for the next `Data` frame, bounded by both
    /// remaining credit and the session's configured frame size cap.
    pub fn max_frame_payload(&self, max_frame_payload_bytes: u32) -> u32 {
        self.free_window.min(max_frame_payload_bytes)
    }
}

/// Tracks the inbound (receive-side) flow control window for a single stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InboundController {
    advertised_window: u32,
    bytes_consumed_since_last_advertise: u32,
    threshold: u32,
}

impl InboundController {
    pub fn new(initial_window: u32) -> Self {
        Self {
            advertised_window: initial_window,
            bytes_consumed_since_last_advertise: 0,
            threshold: initial_window / 2,
        }
    }

    pub fn advertised_window(&self) -> u32 {
        self.advertised_window
    }

    /// Records that `n` bytes of `Data` payload were received and validates
    /// them against the currently advertised window.
    pub fn on_receive(&mut self, n: u32) -> Result<(), Error> {
        if n > self.advertised_window {
            return Err(Error::FlowControlViolation {
                reason: "peer sent more data than the advertised window allowed",
            });
        }
        self.advertised_window -= n;
        self.bytes_consumed_since_last_advertise = self
            .bytes_consumed_since_last_advertise
            .saturating_add(n);
        Ok(())
    }

    /// Returns the window increment to advertise via `WindowUpdate`, if the
    /// accumulated consumption has crossed the threshold, and resets the
    /// counter as a side effect.
    pub fn poll_increment(&mut self) -> Option<u32> {
        if self.bytes_consumed_since_last_advertise >= self.threshold && self.threshold > 0 {
            let delta = self.bytes_consumed_since_last_advertise;
            self.bytes_consumed_since_last_advertise = 0;
            self.advertised_window = self.advertised_window.saturating_add(delta);
            Some(delta)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_writable_until_window_exhausted() {
        let mut controller = OutboundController::new(10);
        assert!(controller.is_writable());
        controller.on_buffer(10);
        assert!(!controller.is_writable());
        controller.on_wrote(10);
        assert_eq!(controller.free_window(), 0);
        assert_eq!(controller.buffered_bytes(), 0);
    }

    #[test]
    fn outbound_window_increment_overflow_is_rejected() {
        let mut controller = OutboundController::new(u32::MAX - 10);
        assert!(controller.on_window_increment(20).is_err());
        assert!(controller.on_window_increment(5).is_ok());
    }

    #[test]
    fn max_frame_payload_is_bounded_by_both_limits() {
        let controller = OutboundController::new(1000);
        assert_eq!(controller.max_frame_payload(65536), 1000);
        let controller = OutboundController::new(1_000_000);
        assert_eq!(controller.max_frame_payload(65536), 65536);
    }

    #[test]
    fn inbound_rejects_overshoot_of_advertised_window() {
        let mut controller = InboundController::new(100);
        assert!(controller.on_receive(101).is_err());
        assert!(controller.on_receive(100).is_ok());
    }

    #[test]
    fn inbound_emits_increment_once_threshold_crossed() {
        let mut controller = InboundController::new(100);
        controller.on_receive(40).unwrap();
        assert_eq!(controller.poll_increment(), None);
        controller.on_receive(20).unwrap();
        assert_eq!(controller.poll_increment(), Some(60));
        assert_eq!(controller.poll_increment(), None);
    }
}
