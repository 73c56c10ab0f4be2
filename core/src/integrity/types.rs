//! integrity/types.rs
//! Stable integrity identifiers and errors.
use std::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Checksum algorithm, stored as one byte in the file header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum IntegrityKind {
    None   = 0,
    Md5    = 1,
    Sha1   = 2,
    Sha256 = 3,
    Sha512 = 4,
}

impl IntegrityKind {
    #[inline]
    pub fn is_identity(self) -> bool {
        self == IntegrityKind::None
    }

    /// Raw digest length in bytes (hex output is twice this).
    pub fn digest_len(self) -> usize {
        match self {
            IntegrityKind::None   => 0,
            IntegrityKind::Md5    => 16,
            IntegrityKind::Sha1   => 20,
            IntegrityKind::Sha256 => 32,
            IntegrityKind::Sha512 => 64,
        }
    }
}

impl Default for IntegrityKind {
    fn default() -> Self {
        IntegrityKind::None
    }
}

impl fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegrityKind::None   => "none",
            IntegrityKind::Md5    => "md5",
            IntegrityKind::Sha1   => "sha1",
            IntegrityKind::Sha256 => "sha256",
            IntegrityKind::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("digest mismatch: expected {expected}, computed {actual}")]
    Mismatch { expected: String, actual: String },
}
