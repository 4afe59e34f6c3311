//! 64-bit content fingerprints.
//!
//! Fingerprints are computed with FNV-1 (64-bit). They are change-detection
//! signatures and deduplication keys, not a security boundary.

use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Byte written after every hashed field.
///
/// 0xFF never appears in valid UTF-8, so it cannot be confused with the
/// content of a string field.
pub const FIELD_SEPARATOR: u8 = 255;

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// A deterministic 64-bit digest of a value's semantic content.
///
/// Ordered numerically. Displayed as 16 zero-padded lowercase hex digits,
/// which is also the form embedded in generated route matchers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub const ZERO: Fingerprint = Fingerprint(0);

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        u64::from_str_radix(trimmed, 16)
            .map(Fingerprint)
            .map_err(|_| CoreError::InvalidFingerprint(trimmed.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FNV-1 hasher
// ---------------------------------------------------------------------------

/// Streaming 64-bit FNV-1 hasher.
#[derive(Debug, Clone)]
pub struct Fnv64 {
    state: u64,
}

impl Fnv64 {
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    /// Write `bytes` followed by [`FIELD_SEPARATOR`].
    pub fn write_field(&mut self, bytes: &[u8]) {
        self.write(bytes);
        self.write_u8(FIELD_SEPARATOR);
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(self.state)
    }
}

impl Default for Fnv64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv64 {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state = self.state.wrapping_mul(FNV_PRIME);
            self.state ^= u64::from(*byte);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Combine a set of fingerprints into one signature.
///
/// The input is sorted ascending before hashing, so the result does not
/// depend on the order in which the fingerprints were gathered. Each value is
/// folded in as 8 little-endian bytes followed by [`FIELD_SEPARATOR`].
pub fn aggregate_fingerprint(fingerprints: &[Fingerprint]) -> Fingerprint {
    let mut sorted = fingerprints.to_vec();
    sorted.sort_unstable();

    let mut hasher = Fnv64::new();
    for fp in &sorted {
        hasher.write_field(&fp.0.to_le_bytes());
    }
    hasher.fingerprint()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
