//! pipeline/config.rs
//! Immutable per-operation pipeline configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::{CompressionKind, CompressionLevel};
use crate::constants::{
    DEFAULT_BUFFER_SIZE_KB, DES_PASSWORD_LEN, MAX_BUFFER_SIZE_KB, MIN_BUFFER_SIZE_KB, MIN_SEED_LEN,
};
use crate::crypto::{EncryptionKind, Secret};
use crate::integrity::IntegrityKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("buffer size {have} KB outside {min}..={max} KB")]
    BufferSize { have: usize, min: usize, max: usize },

    #[error("encryption {kind} requires a password")]
    MissingPassword { kind: EncryptionKind },

    #[error("seed must be at least {min} bytes, got {have}")]
    SeedTooShort { have: usize, min: usize },

    #[error("des requires a password of exactly {need} characters, got {have}")]
    DesPasswordLength { have: usize, need: usize },

    #[error("invalid configuration json: {0}")]
    Json(String),
}

/// Algorithm selection and secrets for one write or read.
///
/// Passed by reference into each call and cloned into the operation, so
/// changing it afterwards never affects an operation in flight. Secrets are
/// accepted from JSON but never written back out.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub buffer_size_kb: usize,
    pub integrity: IntegrityKind,
    pub compression: CompressionKind,
    pub compression_level: CompressionLevel,
    pub encryption: EncryptionKind,
    #[serde(skip_serializing)]
    pub password: Secret,
    #[serde(skip_serializing)]
    pub seed: Secret,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_size_kb: DEFAULT_BUFFER_SIZE_KB,
            integrity: IntegrityKind::None,
            compression: CompressionKind::None,
            compression_level: CompressionLevel::Optimal,
            encryption: EncryptionKind::None,
            password: Secret::default(),
            seed: Secret::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer_size_kb(mut self, kb: usize) -> Self {
        self.buffer_size_kb = kb;
        self
    }

    pub fn with_integrity(mut self, kind: IntegrityKind) -> Self {
        self.integrity = kind;
        self
    }

    pub fn with_compression(mut self, kind: CompressionKind, level: CompressionLevel) -> Self {
        self.compression = kind;
        self.compression_level = level;
        self
    }

    pub fn with_encryption(
        mut self,
        kind: EncryptionKind,
        password: impl Into<Secret>,
        seed: impl Into<Secret>,
    ) -> Self {
        self.encryption = kind;
        self.password = password.into();
        self.seed = seed.into();
        self
    }

    /// Chunk size in bytes.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size_kb * 1024
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Summary: Reject unusable configurations before any async work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BUFFER_SIZE_KB..=MAX_BUFFER_SIZE_KB).contains(&self.buffer_size_kb) {
            return Err(ConfigError::BufferSize {
                have: self.buffer_size_kb,
                min: MIN_BUFFER_SIZE_KB,
                max: MAX_BUFFER_SIZE_KB,
            });
        }

        if self.encryption.is_identity() {
            return Ok(());
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword { kind: self.encryption });
        }
        if self.seed.len() < MIN_SEED_LEN {
            return Err(ConfigError::SeedTooShort { have: self.seed.len(), min: MIN_SEED_LEN });
        }
        if self.encryption == EncryptionKind::Des && self.password.char_count() != DES_PASSWORD_LEN {
            return Err(ConfigError::DesPasswordLength {
                have: self.password.char_count(),
                need: DES_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}
