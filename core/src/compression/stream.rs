//! compression/stream.rs
//! Chunked async drivers that respect the operation's buffer size.
use tracing::debug;

use crate::compression::registry::{create_compressor, create_decompressor};
use crate::compression::types::{CompressionError, CompressionKind, CompressionLevel};
use crate::constants::MAX_PREALLOC_BYTES;
use crate::context::{ProgressFn, StageContext};
use crate::types::StoreError;
use crate::utils::fraction;

/// Summary: Compress `data` in `ctx.buffer_size` chunks.
/// - Progress is input consumed / input length; 1.0 is reported once, after the
///   codec has been flushed.
pub async fn compress(
    kind: CompressionKind,
    level: CompressionLevel,
    data: &[u8],
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<Vec<u8>, StoreError> {
    let mut compressor = create_compressor(kind, level);
    let capacity = if kind.is_identity() { data.len() } else { data.len() / 2 + 64 };
    let mut out = Vec::with_capacity(capacity);

    let total = data.len();
    let mut done = 0usize;
    for chunk in data.chunks(ctx.buffer_size) {
        ctx.checkpoint().await?;
        compressor.compress_chunk(chunk, &mut out)?;
        done += chunk.len();
        if done < total {
            progress(fraction(done, total));
        }
    }
    compressor.finish(&mut out)?;
    progress(1.0);

    debug!(codec = %kind, level = ?level, input = total, output = out.len(), "compressed");
    Ok(out)
}

/// Summary: Decompress `data`, which must expand to exactly `expected_size` bytes.
/// - Output is preallocated from the recorded size (capped).
/// - Growing past `expected_size` is `SizeExceeded`; ending short is `SizeMismatch`.
/// - Progress is output produced / `expected_size`.
pub async fn decompress(
    kind: CompressionKind,
    data: &[u8],
    expected_size: usize,
    ctx: &StageContext,
    progress: &mut ProgressFn<'_>,
) -> Result<Vec<u8>, StoreError> {
    let mut decompressor = create_decompressor(kind, data, ctx.buffer_size);
    let mut out = Vec::with_capacity(expected_size.min(MAX_PREALLOC_BYTES));
    let mut buf = vec![0u8; ctx.buffer_size];

    loop {
        ctx.checkpoint().await?;
        let n = decompressor.read_chunk(&mut buf)?;
        if n == 0 {
            break;
        }
        if out.len() + n > expected_size {
            return Err(CompressionError::SizeExceeded { expected: expected_size }.into());
        }
        out.extend_from_slice(&buf[..n]);
        if out.len() < expected_size {
            progress(fraction(out.len(), expected_size));
        }
    }

    if out.len() != expected_size {
        return Err(CompressionError::SizeMismatch { expected: expected_size, actual: out.len() }.into());
    }
    progress(1.0);

    debug!(codec = %kind, input = data.len(), output = out.len(), "decompressed");
    Ok(out)
}
