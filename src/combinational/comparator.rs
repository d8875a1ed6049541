//! 4-bit magnitude comparator.

use std::cmp::Ordering;
use crate::signal::Nibble;

/// Compares two 4-bit numbers A and B.
///
/// Bits are scanned from the most significant (index 3) down to the least
/// significant (index 0); the first position where they differ decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Comparator4Bit {
    result: Option<Ordering>,
}

impl Comparator4Bit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `a` with `b` (index 3 = MSB) and latch the result.
    pub fn compare(&mut self, a: [bool; 4], b: [bool; 4]) -> Ordering {
        let ordering = (0..4)
            .rev()
            .find(|&i| a[i] != b[i])
            .map_or(Ordering::Equal, |i| if a[i] { Ordering::Greater } else { Ordering::Less });

        self.result = Some(ordering);
        ordering
    }

    /// Compare two nibbles.
    pub fn compare_words(&mut self, a: Nibble, b: Nibble) -> Ordering {
        self.compare(a.bits(), b.bits())
    }

    /// Result of the last comparison, if any.
    pub fn result(&self) -> Option<Ordering> {
        self.result
    }

    pub fn is_greater(&self) -> bool {
        self.result == Some(Ordering::Greater)
    }

    pub fn is_less(&self) -> bool {
        self.result == Some(Ordering::Less)
    }

    pub fn is_equal(&self) -> bool {
        self.result == Some(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_result_before_compare() {
        let cmp = Comparator4Bit::new();
        assert_eq!(cmp.result(), None);
        assert!(!cmp.is_greater());
        assert!(!cmp.is_less());
        assert!(!cmp.is_equal());
    }

    #[test]
    fn test_msb_decides() {
        let mut cmp = Comparator4Bit::new();
        // 1000 vs 0111: MSB wins regardless of lower bits
        assert_eq!(
            cmp.compare([false, false, false, true], [true, true, true, false]),
            Ordering::Greater
        );
        assert!(cmp.is_greater());
        assert!(!cmp.is_less());
    }

    #[test]
    fn test_equal() {
        let mut cmp = Comparator4Bit::new();
        assert_eq!(cmp.compare_words(Nibble::new(9), Nibble::new(9)), Ordering::Equal);
        assert!(cmp.is_equal());
    }

    #[test]
    fn test_result_replaced_on_each_compare() {
        let mut cmp = Comparator4Bit::new();
        cmp.compare_words(Nibble::new(3), Nibble::new(4));
        assert!(cmp.is_less());
        cmp.compare_words(Nibble::new(5), Nibble::new(4));
        assert_eq!(cmp.result(), Some(Ordering::Greater));
        assert!(cmp.is_greater());
        assert!(!cmp.is_less());
    }

    proptest! {
        #[test]
        fn prop_matches_integer_ordering(a in 0u8..16, b in 0u8..16) {
            let mut cmp = Comparator4Bit::new();
            prop_assert_eq!(cmp.compare_words(Nibble::new(a), Nibble::new(b)), a.cmp(&b));
        }
    }
}
