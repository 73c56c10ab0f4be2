//! crypto/registry.rs
//! Maps an `EncryptionKind` plus derived key material to a cipher transform.

use cbc::cipher::KeyIvInit;

use crate::crypto::cipher::{CbcDecryptor, CbcEncryptor, CipherTransform, IdentityTransform};
use crate::crypto::kdf::KeyMaterial;
use crate::crypto::types::{CryptoError, EncryptionKind};

fn key_error(kind: EncryptionKind, material: &KeyMaterial) -> CryptoError {
    CryptoError::InvalidKeyLen {
        cipher: kind.name(),
        expected: kind.key_len(),
        actual: material.key.len(),
    }
}

pub fn create_encryptor(
    kind: EncryptionKind,
    material: &KeyMaterial,
) -> Result<Box<dyn CipherTransform + Send>, CryptoError> {
    let (key, iv) = (material.key.as_slice(), material.iv.as_slice());
    let err = |_| key_error(kind, material);
    Ok(match kind {
        EncryptionKind::None => Box::new(IdentityTransform),
        EncryptionKind::Aes => Box::new(CbcEncryptor::new(
            cbc::Encryptor::<aes::Aes128>::new_from_slices(key, iv).map_err(err)?,
        )),
        EncryptionKind::Des => Box::new(CbcEncryptor::new(
            cbc::Encryptor::<des::Des>::new_from_slices(key, iv).map_err(err)?,
        )),
        EncryptionKind::TripleDes => Box::new(CbcEncryptor::new(
            cbc::Encryptor::<des::TdesEde3>::new_from_slices(key, iv).map_err(err)?,
        )),
        EncryptionKind::Rc2 => Box::new(CbcEncryptor::new(
            cbc::Encryptor::<rc2::Rc2>::new_from_slices(key, iv).map_err(err)?,
        )),
    })
}

pub fn create_decryptor(
    kind: EncryptionKind,
    material: &KeyMaterial,
) -> Result<Box<dyn CipherTransform + Send>, CryptoError> {
    let (key, iv) = (material.key.as_slice(), material.iv.as_slice());
    let err = |_| key_error(kind, material);
    Ok(match kind {
        EncryptionKind::None => Box::new(IdentityTransform),
        EncryptionKind::Aes => Box::new(CbcDecryptor::new(
            cbc::Decryptor::<aes::Aes128>::new_from_slices(key, iv).map_err(err)?,
        )),
        EncryptionKind::Des => Box::new(CbcDecryptor::new(
            cbc::Decryptor::<des::Des>::new_from_slices(key, iv).map_err(err)?,
        )),
        EncryptionKind::TripleDes => Box::new(CbcDecryptor::new(
            cbc::Decryptor::<des::TdesEde3>::new_from_slices(key, iv).map_err(err)?,
        )),
        EncryptionKind::Rc2 => Box::new(CbcDecryptor::new(
            cbc::Decryptor::<rc2::Rc2>::new_from_slices(key, iv).map_err(err)?,
        )),
    })
}
