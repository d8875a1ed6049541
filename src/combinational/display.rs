//! BCD/hex to seven-segment decoder.
//!
//! ```text
//!    aaa
//!   f   b
//!    ggg
//!   e   c
//!    ddd
//! ```

use serde::{Serialize, Deserialize};

/// One segment of a seven-segment display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Segment {
    /// All segments in table order.
    pub const ALL: [Segment; 7] = [
        Segment::A, Segment::B, Segment::C, Segment::D,
        Segment::E, Segment::F, Segment::G,
    ];
}

/// On/off state of the seven segments, in `a..g` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Segments([bool; 7]);

impl Segments {
    /// All segments off.
    pub const BLANK: Segments = Segments([false; 7]);

    pub fn is_lit(&self, segment: Segment) -> bool {
        self.0[segment as usize]
    }

    pub fn as_array(&self) -> [bool; 7] {
        self.0
    }

    /// Number of lit segments.
    pub fn lit_count(&self) -> usize {
        self.0.iter().filter(|&&s| s).count()
    }
}

const T: bool = true;
const F: bool = false;

#[rustfmt::skip]
const SEGMENT_MAP: [[bool; 7]; 16] = [
    // a  b  c  d  e  f  g
    [T, T, T, T, T, T, F], // 0
    [F, T, T, F, F, F, F], // 1
    [T, T, F, T, T, F, T], // 2
    [T, T, T, T, F, F, T], // 3
    [F, T, T, F, F, T, T], // 4
    [T, F, T, T, F, T, T], // 5
    [T, F, T, T, T, T, T], // 6
    [T, T, T, F, F, F, F], // 7
    [T, T, T, T, T, T, T], // 8
    [T, T, T, T, F, T, T], // 9
    [T, T, T, F, T, T, T], // A
    [F, F, T, T, T, T, T], // b
    [T, F, F, T, T, T, F], // C
    [F, T, T, T, T, F, T], // d
    [T, F, F, T, T, T, T], // E
    [T, F, F, F, T, T, T], // F
];

/// Segments to light for `n` (0-15). Anything else blanks the display.
pub fn segments_for(n: usize) -> Segments {
    SEGMENT_MAP.get(n).copied().map_or(Segments::BLANK, Segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_lights_everything() {
        let eight = segments_for(8);
        assert_eq!(eight.lit_count(), 7);
        assert!(Segment::ALL.iter().all(|&s| eight.is_lit(s)));
    }

    #[test]
    fn test_array_follows_segment_order() {
        let seven = segments_for(7);
        let by_name: Vec<bool> = Segment::ALL.iter().map(|&s| seven.is_lit(s)).collect();
        assert_eq!(by_name, seven.as_array().to_vec());
    }

    #[test]
    fn test_one_uses_right_side() {
        let one = segments_for(1);
        assert!(one.is_lit(Segment::B));
        assert!(one.is_lit(Segment::C));
        assert_eq!(one.lit_count(), 2);
    }

    #[test]
    fn test_zero_has_no_middle_bar() {
        assert!(!segments_for(0).is_lit(Segment::G));
    }

    #[test]
    fn test_hex_digits() {
        assert!(!segments_for(0xB).is_lit(Segment::A));
        assert!(!segments_for(0xF).is_lit(Segment::D));
    }

    #[test]
    fn test_out_of_range_is_blank() {
        assert_eq!(segments_for(16), Segments::BLANK);
        assert_eq!(segments_for(usize::MAX).lit_count(), 0);
    }

    #[test]
    fn test_digits_are_distinct() {
        for a in 0..16 {
            for b in (a + 1)..16 {
                assert_ne!(segments_for(a), segments_for(b), "{} vs {}", a, b);
            }
        }
    }
}
