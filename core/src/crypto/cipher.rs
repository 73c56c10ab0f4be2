//! crypto/cipher.rs
//! Streaming CBC transforms with PKCS#7 padding.
//!
//! Encryption emits whole blocks as soon as they fill and pads in `finish`.
//! Decryption always holds back the last full block, because only the final
//! block carries padding.

use cbc::cipher::block_padding::{Pkcs7, RawPadding};
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, BlockSizeUser};
use zeroize::Zeroizing;

use crate::crypto::types::CryptoError;

/// Incremental cipher transform.
pub trait CipherTransform: Send {
    /// Feed input, appending every byte that is ready to `out`.
    fn update(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CryptoError>;
    /// Flush the final block. Must be called exactly once.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CryptoError>;
}

/// Pass-through used when encryption is disabled.
pub struct IdentityTransform;

impl CipherTransform for IdentityTransform {
    fn update(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CryptoError> {
        out.extend_from_slice(input);
        Ok(())
    }

    fn finish(&mut self, _out: &mut Vec<u8>) -> Result<(), CryptoError> {
        Ok(())
    }
}

pub struct CbcEncryptor<M> {
    mode: M,
    block: usize,
    pending: Zeroizing<Vec<u8>>,
    finished: bool,
}

impl<M: BlockEncryptMut + BlockSizeUser> CbcEncryptor<M> {
    pub fn new(mode: M) -> Self {
        let block = M::block_size();
        Self {
            mode,
            block,
            pending: Zeroizing::new(Vec::with_capacity(block)),
            finished: false,
        }
    }

    fn encrypt_in_place(&mut self, blocks: &mut [u8]) {
        for b in blocks.chunks_exact_mut(self.block) {
            self.mode.encrypt_block_mut(GenericArray::from_mut_slice(b));
        }
    }
}

impl<M: BlockEncryptMut + BlockSizeUser + Send> CipherTransform for CbcEncryptor<M> {
    fn update(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CryptoError> {
        if self.finished {
            return Err(CryptoError::StateError("encryptor already finished".into()));
        }
        self.pending.extend_from_slice(input);
        let full = self.pending.len() / self.block * self.block;
        if full == 0 {
            return Ok(());
        }

        let start = out.len();
        out.extend_from_slice(&self.pending[..full]);
        self.pending.drain(..full);
        self.encrypt_in_place(&mut out[start..]);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CryptoError> {
        if self.finished {
            return Err(CryptoError::StateError("encryptor already finished".into()));
        }
        self.finished = true;

        // Always pad; an aligned stream gets a full block of padding.
        let start = out.len();
        out.extend_from_slice(&self.pending);
        out.resize(start + self.block, 0);
        Pkcs7::raw_pad(&mut out[start..], self.pending.len());
        self.pending.clear();
        self.encrypt_in_place(&mut out[start..]);
        Ok(())
    }
}

pub struct CbcDecryptor<M> {
    mode: M,
    block: usize,
    pending: Zeroizing<Vec<u8>>,
    finished: bool,
}

impl<M: BlockDecryptMut + BlockSizeUser> CbcDecryptor<M> {
    pub fn new(mode: M) -> Self {
        let block = M::block_size();
        Self {
            mode,
            block,
            pending: Zeroizing::new(Vec::with_capacity(block * 2)),
            finished: false,
        }
    }

    fn decrypt_in_place(&mut self, blocks: &mut [u8]) {
        for b in blocks.chunks_exact_mut(self.block) {
            self.mode.decrypt_block_mut(GenericArray::from_mut_slice(b));
        }
    }
}

impl<M: BlockDecryptMut + BlockSizeUser + Send> CipherTransform for CbcDecryptor<M> {
    fn update(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CryptoError> {
        if self.finished {
            return Err(CryptoError::StateError("decryptor already finished".into()));
        }
        self.pending.extend_from_slice(input);
        if self.pending.len() <= self.block {
            return Ok(());
        }

        // Everything except the last (possibly partial) block.
        let ready = (self.pending.len() - 1) / self.block * self.block;
        let start = out.len();
        out.extend_from_slice(&self.pending[..ready]);
        self.pending.drain(..ready);
        self.decrypt_in_place(&mut out[start..]);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CryptoError> {
        if self.finished {
            return Err(CryptoError::StateError("decryptor already finished".into()));
        }
        self.finished = true;

        if self.pending.len() != self.block {
            return Err(CryptoError::DecryptionFailed(
                "ciphertext length is not a multiple of the block size".into(),
            ));
        }

        let mut last = Zeroizing::new(std::mem::take(&mut *self.pending));
        self.decrypt_in_place(&mut last);

        let plain = Pkcs7::raw_unpad(&last)
            .map_err(|_| CryptoError::DecryptionFailed("invalid padding".into()))?;
        out.extend_from_slice(plain);
        Ok(())
    }
}
