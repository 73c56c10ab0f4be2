//! headers/types.rs
//! FileHeader definition, validation and errors.
use thiserror::Error;

use crate::compression::CompressionKind;
use crate::constants::MAX_HEADER_STRING_LEN;
use crate::crypto::EncryptionKind;
use crate::integrity::IntegrityKind;
use crate::utils::enum_name_or_hex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: String,
    pub integrity: IntegrityKind,
    pub compression: CompressionKind,
    pub encryption: EncryptionKind,
    /// Uppercase hex digest of the serialized bytes, empty when integrity is off.
    pub hash: String,
    /// Serialized length before compression.
    pub uncompressed_size: i32,
    pub version: i32,
}

impl FileHeader {
    /// Bytes this header occupies on disk.
    pub fn encoded_len(&self) -> usize {
        varint_len(self.signature.len())
            + self.signature.len()
            + 3
            + varint_len(self.hash.len())
            + self.hash.len()
            + 4
            + 4
    }

    /// Check field consistency. Called by both encoder and decoder.
    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.signature.len() > MAX_HEADER_STRING_LEN {
            return Err(HeaderError::StringTooLong { len: self.signature.len(), max: MAX_HEADER_STRING_LEN });
        }
        if self.uncompressed_size < 0 {
            return Err(HeaderError::NegativeSize { have: self.uncompressed_size });
        }
        let want = self.integrity.digest_len() * 2;
        if self.hash.len() != want || !self.hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HeaderError::InvalidHash { kind: self.integrity, len: self.hash.len() });
        }
        Ok(())
    }
}

/// Length of the 7-bit prefix for `n`.
pub fn varint_len(mut n: usize) -> usize {
    let mut len = 1;
    while n >= 0x80 {
        n >>= 7;
        len += 1;
    }
    len
}

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("header buffer too short: have {have}, need {need}")]
    BufferTooShort { have: usize, need: usize },

    #[error("malformed 7-bit length prefix")]
    BadVarint,

    #[error("header string too long: {len} > {max}")]
    StringTooLong { len: usize, max: usize },

    #[error("header string is not valid UTF-8")]
    InvalidUtf8,

    #[error("unknown integrity kind: {}", enum_name_or_hex::<IntegrityKind>(*raw))]
    UnknownIntegrity { raw: u8 },

    #[error("unknown compression kind: {}", enum_name_or_hex::<CompressionKind>(*raw))]
    UnknownCompression { raw: u8 },

    #[error("unknown encryption kind: {}", enum_name_or_hex::<EncryptionKind>(*raw))]
    UnknownEncryption { raw: u8 },

    #[error("negative uncompressed size: {have}")]
    NegativeSize { have: i32 },

    #[error("payload of {have} bytes does not fit the header size field")]
    SizeOverflow { have: usize },

    #[error("hash of length {len} does not match integrity kind {kind}")]
    InvalidHash { kind: IntegrityKind, len: usize },
}
