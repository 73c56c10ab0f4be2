//! integrity/digest.rs
//! Incremental hashing over bounded chunks.
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha512};
use tracing::debug;

use crate::context::{ProgressFn, StageContext};
use crate::integrity::types::{IntegrityError, IntegrityKind};
use crate::types::StoreError;
use crate::utils::fraction;

/// Internal hashing state.
pub enum DigestState {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl DigestState {
    /// `None` for the identity kind, which never hashes.
    pub fn new(kind: IntegrityKind) -> Option<Self> {
        match kind {
            IntegrityKind::None   => None,
            IntegrityKind::Md5    => Some(DigestState::Md5(Md5::new())),
            IntegrityKind::Sha1   => Some(DigestState::Sha1(Sha1::new())),
            IntegrityKind::Sha256 => Some(DigestState::Sha256(Sha256::new())),
            IntegrityKind::Sha512 => Some(DigestState::Sha512(Sha512::new())),
        }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Md5(h)    => h.update(data),
            DigestState::Sha1(h)   => h.update(data),
            DigestState::Sha256(h) => h.update(data),
            DigestState::Sha512(h) => h.update(data),
        }
    }

    #[inline]
    pub fn finalize(self) -> Vec<u8> {
        match self {
            DigestState::Md5(h)    => h.finalize().to_vec(),
            DigestState::Sha1(h)   => h.finalize().to_vec(),
            DigestState::Sha256(h) => h.finalize().to_vec(),
            DigestState::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// Summary: Hash `data` chunk by chunk and return the uppercase hex digest.
/// - Identity kind returns an empty string.
/// - Suspends at every chunk boundary; fails with `Cancelled` once the token fires.
/// - Progress is bytes hashed / total, reaching 1.0 exactly once.
pub async fn compute_digest(
    kind: IntegrityKind,
    data: &[u8],
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<String, StoreError> {
    let Some(mut state) = DigestState::new(kind) else {
        progress(1.0);
        return Ok(String::new());
    };

    let total = data.len();
    let mut done = 0usize;
    for chunk in data.chunks(ctx.buffer_size) {
        ctx.checkpoint().await?;
        state.update(chunk);
        done += chunk.len();
        progress(fraction(done, total));
    }
    if total == 0 {
        progress(1.0);
    }

    let digest = hex::encode_upper(state.finalize());
    debug!(%kind, bytes = total, "digest computed");
    Ok(digest)
}

/// Summary: Recompute the digest of `data` and fail with `Mismatch` unless it equals `expected`.
/// - Identity kind always passes.
/// - Hex comparison ignores case.
pub async fn ensure_digest(
    kind: IntegrityKind,
    data: &[u8],
    expected: &str,
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<(), StoreError> {
    if kind.is_identity() {
        progress(1.0);
        return Ok(());
    }
    let actual = compute_digest(kind, data, ctx, progress).await?;
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(IntegrityError::Mismatch { expected: expected.to_string(), actual }.into())
    }
}

/// Boolean form of [`ensure_digest`].
pub async fn verify_digest(
    kind: IntegrityKind,
    data: &[u8],
    expected: &str,
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<bool, StoreError> {
    match ensure_digest(kind, data, expected, ctx, progress).await {
        Ok(()) => Ok(true),
        Err(StoreError::Integrity(IntegrityError::Mismatch { .. })) => Ok(false),
        Err(e) => Err(e),
    }
}
