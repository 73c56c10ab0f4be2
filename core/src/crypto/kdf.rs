//! crypto/kdf.rs
//! PBKDF2 key schedule shared by every cipher variant.
//!
//! Design:
//! - PBKDF2-HMAC-SHA1(password, seed, 1000) stretched to key_len + block_len bytes.
//! - First key_len bytes are the key, the following block_len bytes the IV.
//! - Deterministic: the same password and seed always give the same key and IV,
//!   so nothing but the secrets is needed to decrypt.

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::Zeroizing;

use crate::constants::{DES_PASSWORD_LEN, MIN_SEED_LEN, PBKDF2_ITERATIONS};
use crate::crypto::secret::Secret;
use crate::crypto::types::{CryptoError, EncryptionKind};

/// Key and IV for one operation, wiped on drop.
pub struct KeyMaterial {
    pub key: Zeroizing<Vec<u8>>,
    pub iv: Zeroizing<Vec<u8>>,
}

impl KeyMaterial {
    /// Material for the identity cipher.
    pub fn empty() -> Self {
        Self {
            key: Zeroizing::new(Vec::new()),
            iv: Zeroizing::new(Vec::new()),
        }
    }
}

/// Summary: Derive key and IV for `kind` from `password` and `seed`.
/// - Identity kind skips derivation.
/// - Rejects an empty password, a seed shorter than 8 bytes, and a DES password
///   that is not exactly 8 characters.
pub fn derive_key_material(
    kind: EncryptionKind,
    password: &Secret,
    seed: &Secret,
) -> Result<KeyMaterial, CryptoError> {
    if kind.is_identity() {
        return Ok(KeyMaterial::empty());
    }
    if password.is_empty() {
        return Err(CryptoError::InvalidKeyMaterial("password is empty".into()));
    }
    if seed.len() < MIN_SEED_LEN {
        return Err(CryptoError::InvalidKeyMaterial(format!(
            "seed must be at least {} bytes",
            MIN_SEED_LEN
        )));
    }
    if kind == EncryptionKind::Des && password.char_count() != DES_PASSWORD_LEN {
        return Err(CryptoError::InvalidKeyMaterial(format!(
            "des password must be exactly {} characters",
            DES_PASSWORD_LEN
        )));
    }

    let key_len = kind.key_len();
    let iv_len = kind.block_len();
    let mut okm = Zeroizing::new(vec![0u8; key_len + iv_len]);
    pbkdf2_hmac::<Sha1>(password.as_bytes(), seed.as_bytes(), PBKDF2_ITERATIONS, &mut okm);

    Ok(KeyMaterial {
        key: Zeroizing::new(okm[..key_len].to_vec()),
        iv: Zeroizing::new(okm[key_len..].to_vec()),
    })
}
