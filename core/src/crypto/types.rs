use std::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cipher selection, stored as one byte in the file header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum EncryptionKind {
    None      = 0,
    /// AES-128-CBC.
    Aes       = 1,
    /// DES-CBC; the password must be exactly 8 characters.
    Des       = 2,
    /// 3DES-EDE3-CBC.
    TripleDes = 3,
    /// RC2-CBC with a 128-bit key.
    Rc2       = 4,
}

impl EncryptionKind {
    #[inline]
    pub fn is_identity(self) -> bool {
        self == EncryptionKind::None
    }

    /// Derived key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            EncryptionKind::None      => 0,
            EncryptionKind::Aes       => 16,
            EncryptionKind::Des       => 8,
            EncryptionKind::TripleDes => 24,
            EncryptionKind::Rc2       => 16,
        }
    }

    /// Cipher block length, which is also the IV length.
    pub fn block_len(self) -> usize {
        match self {
            EncryptionKind::None => 0,
            EncryptionKind::Aes  => 16,
            _                    => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncryptionKind::None      => "none",
            EncryptionKind::Aes       => "aes",
            EncryptionKind::Des       => "des",
            EncryptionKind::TripleDes => "3des",
            EncryptionKind::Rc2       => "rc2",
        }
    }
}

impl Default for EncryptionKind {
    fn default() -> Self {
        EncryptionKind::None
    }
}

impl fmt::Display for EncryptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key or IV length handed to the cipher.
    #[error("invalid key length for {cipher}: expected={expected}, actual={actual}")]
    InvalidKeyLen { cipher: &'static str, expected: usize, actual: usize },

    /// Password or seed unusable for key derivation.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Wrong password/seed, bad padding, or truncated ciphertext.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("cipher state error: {0}")]
    StateError(String),
}
