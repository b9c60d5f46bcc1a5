// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use s2n_codec::{DecoderBuffer, DecoderBufferResult, DecoderValue, Encoder, EncoderValue};

/// The flag bitset carried by every yamux frame header.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u16);

impl Flags {
    pub const SYN: Flags = Flags(0x1);
    pub const ACK: Flags = Flags(0x2);
    pub const FIN: Flags = Flags(0x4);
    pub const RST: Flags = Flags(0x8);
    pub const EMPTY: Flags = Flags(0);

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Flags(bits)
    }

    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }
}

impl core::ops::BitOr for Flags {
    type Output = Flags;

    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        if self.contains(Flags::SYN) {
            list.entry(&"SYN");
        }
        if self.contains(Flags::ACK) {
            list.entry(&"ACK");
        }
        if self.contains(Flags::FIN) {
            list.entry(&"FIN");
        }
        if self.contains(Flags::RST) {
            list.entry(&"RST");
        }
        list.finish()
    }
}

impl<'a> DecoderValue<'a> for Flags {
    #[inline]
    fn decode(buffer: DecoderBuffer<'a>) -> DecoderBufferResult<'a, Self> {
        let (bits, buffer) = buffer.decode::<u16>()?;
        Ok((Flags(bits), buffer))
    }
}

impl EncoderValue for Flags {
    #[inline]
    fn encode<E: Encoder>(&self, encoder: &mut E) {
        self.0.encode(encoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_independent_of_order() {
        let a = Flags::SYN | Flags::FIN;
        let b = Flags::FIN | Flags::SYN;
        assert_eq!(a, b);
        assert!(a.contains(Flags::SYN));
        assert!(a.contains(Flags::FIN));
        assert!(!a.contains(Flags::ACK));
        assert!(!a.contains(Flags::RST));
    }

    #[test]
    fn empty_has_no_bits() {
        assert!(Flags::EMPTY.is_empty());
        assert!(!Flags::SYN.is_empty());
    }
}
