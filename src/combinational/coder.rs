//! Line decoder and encoder.
//!
//! The decoder turns a 3-bit code into one active output line; the encoder
//! maps an active line back to its 3-bit code. "No line active" is
//! represented as `None`.

use crate::signal::msb_first_index;

/// 3-to-8 line decoder with an enable input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder3To8;

impl Decoder3To8 {
    pub fn new() -> Self {
        Self
    }

    /// Index (0-7) of the active output, or `None` when disabled.
    ///
    /// `a2` is the most significant input.
    pub fn active_output(&self, enable: bool, a2: bool, a1: bool, a0: bool) -> Option<usize> {
        enable.then(|| msb_first_index(&[a2, a1, a0]))
    }

    /// All eight output lines; at most one is high.
    pub fn outputs(&self, enable: bool, a2: bool, a1: bool, a0: bool) -> [bool; 8] {
        let mut lines = [false; 8];
        if let Some(index) = self.active_output(enable, a2, a1, a0) {
            lines[index] = true;
        }
        lines
    }
}

/// 8-to-3 line encoder with an enable input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder8To3;

impl Encoder8To3 {
    pub fn new() -> Self {
        Self
    }

    /// Binary code `[A2, A1, A0]` of the active line.
    ///
    /// All outputs are low when disabled, when no line is active, or when the
    /// index is outside 0-7.
    pub fn output(&self, enable: bool, active: Option<usize>) -> [bool; 3] {
        match active {
            Some(index) if enable && index < 8 => [index & 4 != 0, index & 2 != 0, index & 1 != 0],
            _ => [false; 3],
        }
    }

    /// Highest-numbered asserted input line.
    pub fn active_line(&self, lines: &[bool; 8]) -> Option<usize> {
        lines.iter().rposition(|&line| line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_index() {
        let dec = Decoder3To8::new();
        assert_eq!(dec.active_output(true, false, false, false), Some(0));
        assert_eq!(dec.active_output(true, true, false, true), Some(5));
        assert_eq!(dec.active_output(true, true, true, true), Some(7));
    }

    #[test]
    fn test_decoder_disabled() {
        let dec = Decoder3To8::new();
        assert_eq!(dec.active_output(false, true, true, true), None);
        assert_eq!(dec.outputs(false, true, false, true), [false; 8]);
    }

    #[test]
    fn test_decoder_one_hot() {
        let lines = Decoder3To8::new().outputs(true, false, true, true);
        assert_eq!(lines.iter().filter(|&&l| l).count(), 1);
        assert!(lines[3]);
    }

    #[test]
    fn test_encoder_inverts_decoder() {
        let dec = Decoder3To8::new();
        let enc = Encoder8To3::new();
        for code in 0..8usize {
            let (a2, a1, a0) = (code & 4 != 0, code & 2 != 0, code & 1 != 0);
            let active = dec.active_output(true, a2, a1, a0);
            assert_eq!(enc.output(true, active), [a2, a1, a0]);
        }
    }

    #[test]
    fn test_encoder_fallbacks() {
        let enc = Encoder8To3::new();
        assert_eq!(enc.output(false, Some(5)), [false; 3]);
        assert_eq!(enc.output(true, None), [false; 3]);
        assert_eq!(enc.output(true, Some(8)), [false; 3]);
    }

    #[test]
    fn test_priority_line() {
        let enc = Encoder8To3::new();
        let mut lines = [false; 8];
        assert_eq!(enc.active_line(&lines), None);
        lines[2] = true;
        lines[6] = true;
        assert_eq!(enc.active_line(&lines), Some(6));
    }
}
