use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    codec::CodecError,
    compression::CompressionError,
    crypto::CryptoError,
    headers::HeaderError,
    integrity::IntegrityError,
    pipeline::config::ConfigError,
};

/// Unified store error covering I/O, configuration, header, stage and codec failures.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Callers of `write`/`read` only see it for requests rejected up front; once an
///   operation runs, failures are folded into a [`FileResult`] via [`StoreError::classify`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The decoded object's signature differs from the one in the header.
    #[error("signature mismatch: header {expected:?}, object {found:?}")]
    InvalidSignature { expected: String, found: String },

    /// A write or read is already running on this store.
    #[error("another operation is already in flight")]
    Busy,

    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    /// Map an internal failure onto the public result taxonomy.
    ///
    /// "Data is wrong" (checksum mismatch, corrupt compressed stream, bad padding)
    /// stays distinguishable from "something crashed".
    pub fn classify(&self) -> FileResult {
        match self {
            StoreError::Cancelled => FileResult::Cancelled,
            StoreError::NotFound(_) => FileResult::NotFound,
            StoreError::InvalidSignature { .. } => FileResult::InvalidSignature,
            StoreError::Crypto(CryptoError::DecryptionFailed(_)) => FileResult::DecryptionFailed,
            StoreError::Integrity(IntegrityError::Mismatch { .. }) => FileResult::IntegrityFailure,
            StoreError::Compression(e) if e.is_corruption() => FileResult::IntegrityFailure,
            _ => FileResult::ExceptionRaised,
        }
    }
}

/// Terminal state of one write or read.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileResult {
    Ok,
    /// Checksum mismatch or corrupt payload (read only).
    IntegrityFailure,
    /// The deserialized object's signature differs from the header's.
    InvalidSignature,
    Cancelled,
    /// Unexpected I/O, codec or stage failure.
    ExceptionRaised,
    /// The file to read does not exist.
    NotFound,
    /// Wrong password/seed or damaged ciphertext.
    DecryptionFailed,
}

impl FileResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, FileResult::Ok)
    }
}

impl fmt::Display for FileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileResult::Ok               => "ok",
            FileResult::IntegrityFailure => "integrity failure",
            FileResult::InvalidSignature => "invalid signature",
            FileResult::Cancelled        => "cancelled",
            FileResult::ExceptionRaised  => "exception raised",
            FileResult::NotFound         => "not found",
            FileResult::DecryptionFailed => "decryption failed",
        };
        f.write_str(name)
    }
}
