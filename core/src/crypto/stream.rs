//! crypto/stream.rs
//! Chunked async drivers over a cipher transform.
use tracing::debug;

use crate::context::{ProgressFn, StageContext};
use crate::crypto::cipher::CipherTransform;
use crate::crypto::kdf::KeyMaterial;
use crate::crypto::registry::{create_decryptor, create_encryptor};
use crate::crypto::types::EncryptionKind;
use crate::types::StoreError;
use crate::utils::fraction;

async fn run_transform(
    mut transform: Box<dyn CipherTransform + Send>,
    data: &[u8],
    capacity: usize,
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::with_capacity(capacity);
    let total = data.len();
    let mut done = 0usize;
    for chunk in data.chunks(ctx.buffer_size) {
        ctx.checkpoint().await?;
        transform.update(chunk, &mut out)?;
        done += chunk.len();
        if done < total {
            progress(fraction(done, total));
        }
    }
    transform.finish(&mut out)?;
    progress(1.0);
    Ok(out)
}

/// Summary: Encrypt `data` chunk by chunk and flush the padded final block.
pub async fn encrypt(
    kind: EncryptionKind,
    material: &KeyMaterial,
    data: &[u8],
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<Vec<u8>, StoreError> {
    let transform = create_encryptor(kind, material)?;
    let out = run_transform(transform, data, data.len() + kind.block_len(), ctx, progress).await?;
    debug!(cipher = %kind, input = data.len(), output = out.len(), "encrypted");
    Ok(out)
}

/// Summary: Decrypt `data`; padding or length errors become `DecryptionFailed`.
pub async fn decrypt(
    kind: EncryptionKind,
    material: &KeyMaterial,
    data: &[u8],
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<Vec<u8>, StoreError> {
    let transform = create_decryptor(kind, material)?;
    let out = run_transform(transform, data, data.len(), ctx, progress).await?;
    debug!(cipher = %kind, input = data.len(), output = out.len(), "decrypted");
    Ok(out)
}
