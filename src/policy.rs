//! Input policies and write outcomes.
//!
//! Every site where the lab absorbs malformed input (an over-wide value, an
//! out-of-range address, a program that does not fit) reports what actually
//! happened through [`WriteOutcome`]. Whether the value is masked or refused
//! is decided by the [`InputPolicy`] in force.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How to treat input that does not fit its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Mask or truncate and carry on.
    #[default]
    Lenient,
    /// Refuse the write and leave state untouched.
    Strict,
}

impl InputPolicy {
    /// Check if this is the strict policy.
    pub fn is_strict(self) -> bool {
        self == InputPolicy::Strict
    }
}

impl fmt::Display for InputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputPolicy::Lenient => write!(f, "lenient"),
            InputPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for InputPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(InputPolicy::Lenient),
            "strict" => Ok(InputPolicy::Strict),
            _ => Err(PolicyParseError(s.to_string())),
        }
    }
}

/// Unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input policy '{0}' (expected 'strict' or 'lenient')")]
pub struct PolicyParseError(pub String);

/// Why a write was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// The address is outside memory.
    AddressOutOfRange,
    /// The value is wider than the cell and the policy is strict.
    ValueTooWide,
}

/// Result of a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOutcome {
    /// Stored exactly as given.
    Applied,
    /// Stored after masking to the destination width.
    Clamped {
        /// The value the caller asked for.
        requested: u32,
        /// The value that ended up in the cell.
        stored: u8,
    },
    /// Nothing was written.
    Rejected(Rejection),
}

impl WriteOutcome {
    /// Whether the destination changed.
    pub fn was_written(self) -> bool {
        !matches!(self, WriteOutcome::Rejected(_))
    }
}
