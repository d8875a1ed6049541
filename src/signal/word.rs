//! Fixed-width binary words.
//!
//! This module provides the two word sizes used by the lab CPU:
//! - `Nibble`: 4-bit word for PC, AC, MAR and the opcode/operand fields
//! - `Byte`: 8-bit word for memory cells and the instruction register
//!
//! Both types keep their value inside the declared width by masking on
//! construction. Nothing is ever rejected at this level.

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::signal::bits::{lsb_first_bits, lsb_first_value};

/// A 4-bit word.
///
/// Value range: 0 to 15
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8")]
pub struct Nibble(u8);

/// An 8-bit word.
///
/// Value range: 0 to 255
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8")]
pub struct Byte(u8);

// Shared word behaviour, generated per width.
macro_rules! impl_word {
    ($type:ident, $width:expr, $mask:expr) => {
        impl $type {
            /// Number of bits in the word.
            pub const WIDTH: usize = $width;

            /// Mask covering every bit of the word.
            pub const MASK: u8 = $mask;

            /// Largest representable value.
            pub const MAX: Self = Self($mask);

            /// The all-zero word.
            #[inline]
            pub const fn zero() -> Self {
                Self(0)
            }

            /// Create a word, masking `value` to the word width.
            #[inline]
            pub const fn new(value: u8) -> Self {
                Self(value & Self::MASK)
            }

            /// Create a word from a wider integer, masking to the word width.
            #[inline]
            pub const fn from_masked(value: u32) -> Self {
                Self((value & Self::MASK as u32) as u8)
            }

            /// Whether `value` fits without masking.
            #[inline]
            pub const fn fits(value: u32) -> bool {
                value <= Self::MASK as u32
            }

            /// The numeric value.
            #[inline]
            pub const fn value(self) -> u8 {
                self.0
            }

            /// Check if this word is zero.
            #[inline]
            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }

            /// Get a single bit by index (0 = LSB).
            #[inline]
            pub const fn bit(self, index: usize) -> bool {
                (self.0 >> index) & 1 == 1
            }

            /// All bits, least-significant first.
            #[inline]
            pub fn bits(self) -> [bool; $width] {
                lsb_first_bits::<$width>(self.0 as u32)
            }

            /// Build a word from bits listed least-significant first.
            pub fn from_bits(bits: [bool; $width]) -> Self {
                Self::from_masked(lsb_first_value(&bits))
            }

            /// Add with wrap-around, returning (result, carry_out).
            #[inline]
            pub const fn overflowing_add(self, other: Self) -> (Self, bool) {
                let sum = self.0 as u16 + other.0 as u16;
                (Self::new(sum as u8), sum > Self::MASK as u16)
            }

            /// Increment by one, wrapping at the word width.
            #[inline]
            pub const fn wrapping_inc(self) -> Self {
                Self::new(self.0.wrapping_add(1))
            }
        }

        impl fmt::Debug for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0b{:0w$b} = {})", stringify!($type), self.0, self.0, w = $width)
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:0w$b}", self.0, w = $width)
            }
        }

        impl fmt::UpperHex for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::UpperHex::fmt(&self.0, f)
            }
        }

        impl From<$type> for u8 {
            fn from(word: $type) -> Self {
                word.0
            }
        }

        impl From<$type> for usize {
            fn from(word: $type) -> Self {
                word.0 as usize
            }
        }
    };
}

impl_word!(Nibble, 4, 0x0F);
impl_word!(Byte, 8, 0xFF);

impl Nibble {
    /// Use the nibble as a memory index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Byte {
    /// Assemble a byte from a high and a low nibble.
    #[inline]
    pub const fn from_nibbles(high: Nibble, low: Nibble) -> Self {
        Self((high.0 << 4) | low.0)
    }

    /// High nibble (the opcode field of an instruction).
    #[inline]
    pub const fn high(self) -> Nibble {
        Nibble(self.0 >> 4)
    }

    /// Low nibble (the operand field of an instruction).
    #[inline]
    pub const fn low(self) -> Nibble {
        Nibble(self.0 & 0x0F)
    }
}

/// Masks to 4 bits. Also used when deserializing.
impl From<u8> for Nibble {
    fn from(value: u8) -> Self {
        Nibble::new(value)
    }
}

impl From<u8> for Byte {
    fn from(value: u8) -> Self {
        Byte(value)
    }
}

impl From<Nibble> for Byte {
    fn from(value: Nibble) -> Self {
        Byte(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nibble_masks() {
        assert_eq!(Nibble::new(0x1F).value(), 0x0F);
        assert_eq!(Nibble::new(16).value(), 0);
        assert_eq!(Nibble::from_masked(0x1234).value(), 0x4);
        assert!(Nibble::fits(15));
        assert!(!Nibble::fits(16));
    }

    #[test]
    fn test_deserialize_masks_to_width() {
        let nibble: Nibble = serde_json::from_str("200").unwrap();
        assert_eq!(nibble.value(), 200 & 0x0F);
        assert_eq!(serde_json::to_string(&Nibble::new(9)).unwrap(), "9");

        let byte: Byte = serde_json::from_str("255").unwrap();
        assert_eq!(byte.value(), 255);
        assert!(serde_json::from_str::<Byte>("256").is_err());
    }

    #[test]
    fn test_byte_fields() {
        let instr = Byte::new(0x2F);
        assert_eq!(instr.high(), Nibble::new(2));
        assert_eq!(instr.low(), Nibble::new(0xF));
        assert_eq!(Byte::from_nibbles(Nibble::new(2), Nibble::new(0xF)), instr);
        assert_eq!(Byte::from_masked(0x1FF).value(), 0xFF);
    }

    #[test]
    fn test_overflowing_add() {
        let (sum, carry) = Nibble::new(9).overflowing_add(Nibble::new(8));
        assert_eq!(sum.value(), 1);
        assert!(carry);

        let (sum, carry) = Nibble::new(7).overflowing_add(Nibble::new(8));
        assert_eq!(sum.value(), 15);
        assert!(!carry);
    }

    #[test]
    fn test_wrapping_inc() {
        assert_eq!(Nibble::new(15).wrapping_inc(), Nibble::zero());
        assert_eq!(Byte::new(255).wrapping_inc(), Byte::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Nibble::new(5)), "0101");
        assert_eq!(format!("{}", Byte::new(0x1E)), "00011110");
        assert_eq!(format!("{:X}", Nibble::new(14)), "E");
    }

    proptest! {
        #[test]
        fn prop_bits_roundtrip(value in 0u8..16) {
            let n = Nibble::new(value);
            prop_assert_eq!(Nibble::from_bits(n.bits()), n);
        }

        #[test]
        fn prop_masking_stays_in_width(value in any::<u32>()) {
            prop_assert!(Nibble::from_masked(value).value() <= Nibble::MASK);
            prop_assert_eq!(Byte::from_masked(value).value() as u32, value & 0xFF);
        }
    }
}
