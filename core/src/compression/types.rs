//! compression/types.rs
//! Stable codec identifiers, levels, errors and the codec traits.
use std::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compression codec, stored as one byte in the file header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum CompressionKind {
    None   = 0,
    /// zlib-wrapped deflate.
    Zip    = 1,
    GZip   = 2,
    Brotli = 3,
}

impl CompressionKind {
    #[inline]
    pub fn is_identity(self) -> bool {
        self == CompressionKind::None
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionKind::None   => "none",
            CompressionKind::Zip    => "zip",
            CompressionKind::GZip   => "gzip",
            CompressionKind::Brotli => "brotli",
        }
    }
}

impl Default for CompressionKind {
    fn default() -> Self {
        CompressionKind::None
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Speed/ratio tradeoff handed to the codec unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompressionLevel {
    Fastest,
    #[default]
    Optimal,
    NoCompression,
}

impl CompressionLevel {
    /// flate2 level (0..=9).
    pub fn deflate_level(self) -> u32 {
        match self {
            CompressionLevel::Fastest       => 1,
            CompressionLevel::Optimal       => 6,
            CompressionLevel::NoCompression => 0,
        }
    }

    /// Brotli quality (0..=11).
    ///
    /// Brotli has no stored mode, so `NoCompression` maps to quality 0, the
    /// lightest setting, and the payload still goes through the encoder.
    pub fn brotli_quality(self) -> u32 {
        match self {
            CompressionLevel::Fastest       => 1,
            CompressionLevel::Optimal       => 4,
            CompressionLevel::NoCompression => 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: &'static str, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    /// The compressed stream could not be decoded.
    #[error("codec {codec} stream corrupt: {msg}")]
    Corrupt { codec: &'static str, msg: String },

    #[error("decompressed output exceeds recorded size {expected}")]
    SizeExceeded { expected: usize },

    #[error("decompressed size {actual} != recorded size {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("compression state error: {0}")]
    StateError(String),
}

impl CompressionError {
    /// Errors that mean "the payload is damaged" rather than "the codec broke".
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            CompressionError::Corrupt { .. }
                | CompressionError::SizeExceeded { .. }
                | CompressionError::SizeMismatch { .. }
        )
    }
}

/// Push-style encoder: every call may emit zero or more compressed bytes.
pub trait Compressor: Send {
    /// Compress a single chunk, appending any ready output to `out`.
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
    /// Flush pending state and close the stream. Calling twice is a state error.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

/// Pull-style decoder over the complete compressed payload.
pub trait Decompressor: Send {
    /// Fill `buf` with decompressed bytes; `Ok(0)` marks the end of the stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, CompressionError>;
}
