//! Conversions between bit arrays and integers.
//!
//! Two orderings show up across the lab:
//! - select lines and decoder inputs are listed most-significant first
//! - adder, counter and register bits are stored least-significant first
//!   (index 0 = LSB)

/// Weighted binary value of `bits` listed most-significant first.
///
/// `[s1, s0]` gives `2*s1 + s0`.
#[inline]
pub fn msb_first_index(bits: &[bool]) -> usize {
    bits.iter().fold(0, |acc, &bit| (acc << 1) | bit as usize)
}

/// Split `value` into `N` bits, least-significant first.
/// Bits of `value` above position `N` are dropped.
#[inline]
pub fn lsb_first_bits<const N: usize>(value: u32) -> [bool; N] {
    let mut bits = [false; N];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (value >> i) & 1 == 1;
    }
    bits
}

/// Weighted binary value of `bits` listed least-significant first.
#[inline]
pub fn lsb_first_value(bits: &[bool]) -> u32 {
    bits.iter()
        .enumerate()
        .fold(0, |acc, (i, &bit)| acc | ((bit as u32) << i))
}

/// `'1'` or `'0'`.
#[inline]
pub const fn bit_char(bit: bool) -> char {
    if bit { '1' } else { '0' }
}

/// Render an LSB-first bit array the way it is read on paper (MSB on the left).
pub fn format_msb_first(bits: &[bool]) -> String {
    bits.iter().rev().map(|&b| bit_char(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_index() {
        assert_eq!(msb_first_index(&[false, false]), 0);
        assert_eq!(msb_first_index(&[false, true]), 1);
        assert_eq!(msb_first_index(&[true, false]), 2);
        assert_eq!(msb_first_index(&[true, true, false]), 6);
        assert_eq!(msb_first_index(&[]), 0);
    }

    #[test]
    fn test_lsb_first_bits() {
        assert_eq!(lsb_first_bits::<4>(0b0110), [false, true, true, false]);
        assert_eq!(lsb_first_bits::<4>(0b1_0001), [true, false, false, false]);
        assert_eq!(lsb_first_value(&[true, false, true, true]), 0b1101);
    }

    #[test]
    fn test_format_msb_first() {
        assert_eq!(format_msb_first(&[true, false, false, true]), "1001");
        assert_eq!(format_msb_first(&[true, true, false, false]), "0011");
    }
}
