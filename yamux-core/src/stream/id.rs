// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The yamux stream identifier: a plain `u32` with a parity invariant.

use crate::role::Role;

/// The ID of a stream.
///
/// Stream IDs are 32-bit integers, unique among the currently-live streams
/// of a session. ID `0` is reserved for session-level frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId(u32);

impl From<StreamId> for u32 {
    fn from(id: StreamId) -> Self {
        id.0
    }
}

impl StreamId {
    /// The reserved ID used by session-level frames (`Ping`, `GoAway`).
    pub const SESSION: StreamId = StreamId(0);

    /// Wraps a raw ID. Does not validate parity or reserved-ness; use
    /// [`StreamId::initial`]/[`StreamId::nth`] for allocation, or this
    /// constructor for IDs observed on the wire.
    #[inline]
    pub const fn new(id: u32) -> StreamId {
        StreamId(id)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the first stream ID a given role allocates: `1` for the
    /// initiator, `2` for the listener.
    #[inline]
    pub fn initial(role: Role) -> StreamId {
        match role {
            Role::Initiator => StreamId(1),
            Role::Listener => StreamId(2),
        }
    }

    /// Returns the n-th stream ID a given role allocates.
    ///
    /// The 0th ID is [`StreamId::initial`]; subsequent IDs are spaced apart
    /// by 2. Returns `None` if the resulting ID would overflow `u32`.
    #[inline]
    pub fn nth(role: Role, n: u32) -> Option<StreamId> {
        let initial = Self::initial(role);
        let id = n.checked_mul(2)?.checked_add(initial.0)?;
        Some(StreamId(id))
    }

    /// Returns the next ID of the same parity, or `None` on overflow (ID
    /// space exhaustion, a fatal session error per the spec).
    #[inline]
    pub fn next_of_role(self) -> Option<StreamId> {
        self.0.checked_add(2).map(StreamId)
    }

    /// Returns the role that would have allocated this ID, or `None` for
    /// the reserved session ID.
    #[inline]
    pub fn role(self) -> Option<Role> {
        if self.0 == 0 {
            None
        } else if self.0 % 2 == 1 {
            Some(Role::Initiator)
        } else {
            Some(Role::Listener)
        }
    }

    #[inline]
    pub const fn is_session(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_ids_match_role_parity() {
        assert_eq!(StreamId::initial(Role::Initiator).as_u32(), 1);
        assert_eq!(StreamId::initial(Role::Listener).as_u32(), 2);
    }

    #[test]
    fn nth_ids_are_spaced_by_two() {
        for role in [Role::Initiator, Role::Listener] {
            let first = StreamId::nth(role, 0).unwrap();
            assert_eq!(first, StreamId::initial(role));
            for n in 1..10 {
                let nth = StreamId::nth(role, n).unwrap();
                assert_eq!(nth.as_u32(), first.as_u32() + n * 2);
            }
        }
    }

    #[test]
    fn next_of_role_overflow_returns_none() {
        let max_odd = StreamId::new(u32::MAX);
        assert!(max_odd.next_of_role().is_none());
        let max_increasable = StreamId::new(u32::MAX - 2);
        assert!(max_increasable.next_of_role().is_some());
    }

    #[test]
    fn role_parity_round_trips() {
        assert_eq!(StreamId::new(1).role(), Some(Role::Initiator));
        assert_eq!(StreamId::new(2).role(), Some(Role::Listener));
        assert_eq!(StreamId::SESSION.role(), None);
        assert!(StreamId::SESSION.is_session());
    }
}
