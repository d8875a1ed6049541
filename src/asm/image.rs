//! Program image file format.
//!
//! A plain text format with one memory word per line:
//! - 8 binary digits (`0001 1110`; a single space between nibbles is allowed)
//! - or hex with a `0x` prefix (`0x1E`)
//! - `;` starts a comment; blank lines are ignored
//!
//! Words are loaded from address 0 upward.

use crate::cpu::MEMORY_SIZE;
use crate::signal::Byte;
use std::path::Path;
use thiserror::Error;

/// Parse an image from text.
pub fn parse_image(text: &str) -> Result<Vec<Byte>, ImageError> {
    let mut words = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = match line.find(';') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let word = parse_word(trimmed).ok_or_else(|| ImageError::ParseError {
            line: line_num + 1,
            message: format!("expected 8 binary digits or 0x hex, found '{}'", trimmed),
        })?;

        if words.len() == MEMORY_SIZE {
            return Err(ImageError::TooLarge { line: line_num + 1 });
        }
        words.push(word);
    }

    Ok(words)
}

fn parse_word(text: &str) -> Option<Byte> {
    // from_str_radix takes a leading '+', so check the digits first.
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return u8::from_str_radix(hex, 16).ok().map(Byte::new);
    }

    let digits: String = match text.split_once(' ') {
        Some((high, low)) if high.len() == 4 && low.len() == 4 => format!("{}{}", high, low),
        Some(_) => return None,
        None => text.to_string(),
    };
    if digits.len() != Byte::WIDTH || !digits.chars().all(|c| c == '0' || c == '1') {
        return None;
    }
    u8::from_str_radix(&digits, 2).ok().map(Byte::new)
}

/// Render an image as text, one binary word per line with its address.
pub fn format_image(words: &[Byte]) -> String {
    let mut output = String::new();
    output.push_str("; Lab CPU program image\n");
    output.push_str(&format!("; {} words\n\n", words.len()));

    for (addr, word) in words.iter().enumerate() {
        output.push_str(&format!("{:04b} {:04b} ; {:X}\n",
            word.high().value(), word.low().value(), addr));
    }

    output
}

/// Load an image file from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<Byte>, ImageError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ImageError::IoError(e.to_string()))?;
    parse_image(&text)
}

/// Save an image file to disk.
pub fn save_image<P: AsRef<Path>>(path: P, words: &[Byte]) -> Result<(), ImageError> {
    std::fs::write(path.as_ref(), format_image(words))
        .map_err(|e| ImageError::IoError(e.to_string()))
}

/// Errors that can occur while reading or writing images.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("image has more than 16 words (line {line})")]
    TooLarge { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let text = "; demo\n00011110\n0010 1111 ; ADD F\n\n0x40\n0XF0\n";
        let words = parse_image(text).unwrap();
        let values: Vec<u8> = words.iter().map(|b| b.value()).collect();
        assert_eq!(values, vec![0x1E, 0x2F, 0x40, 0xF0]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_image("0001111"), Err(ImageError::ParseError { line: 1, .. })));
        assert!(matches!(parse_image("\n00021110"), Err(ImageError::ParseError { line: 2, .. })));
        assert!(matches!(parse_image("0x1FF"), Err(ImageError::ParseError { .. })));
        assert!(matches!(parse_image("0x+F"), Err(ImageError::ParseError { .. })));
        assert!(matches!(parse_image("+0000001"), Err(ImageError::ParseError { .. })));
        assert!(matches!(parse_image("+000 0001"), Err(ImageError::ParseError { .. })));
        assert_eq!(parse_image(&"0x00\n".repeat(17)), Err(ImageError::TooLarge { line: 17 }));
    }

    #[test]
    fn test_format_parses_back() {
        let words = vec![Byte::new(0x1E), Byte::new(0x00), Byte::new(0xF0)];
        let text = format_image(&words);
        assert!(text.contains("0001 1110 ; 0\n"));
        assert_eq!(parse_image(&text).unwrap(), words);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("logic-lab-image-{}.txt", std::process::id()));
        let words = vec![Byte::new(0x2F), Byte::new(0x40)];
        save_image(&path, &words).unwrap();
        assert_eq!(load_image(&path).unwrap(), words);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load_image(&path), Err(ImageError::IoError(_))));
    }
}
