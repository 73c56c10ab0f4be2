//! pipeline/read.rs
//! Read path: file -> header -> inverse stages -> object.
use std::io;
use std::path::Path;
use std::time::Instant;

use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::codec::{LocalData, ObjectCodec};
use crate::compression;
use crate::context::StageContext;
use crate::crypto;
use crate::headers::{decode_header, FileHeader};
use crate::integrity;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::progress::ProgressTracker;
use crate::telemetry::{Stage, TelemetryCounters, TelemetryTimer};
use crate::types::StoreError;
use crate::utils::fraction;

/// Stages counted for a file written with the kinds in `header`, plus the file read.
pub fn read_stage_count(header: &FileHeader) -> usize {
    1 + usize::from(!header.integrity.is_identity())
        + usize::from(!header.compression.is_identity())
        + usize::from(!header.encryption.is_identity())
}

/// Best guess before the header is known: assume the file matches `config`.
pub fn planned_read_stage_count(config: &PipelineConfig) -> usize {
    1 + usize::from(!config.integrity.is_identity())
        + usize::from(!config.compression.is_identity())
        + usize::from(!config.encryption.is_identity())
}

#[derive(Default)]
pub struct ReadState {
    pub version: Option<i32>,
    pub counters: TelemetryCounters,
}

/// Summary: Load `path` and rebuild the object it encodes.
/// - Stage kinds come from the header; password and seed from `config`.
/// - A missing file is `NotFound`, a digest mismatch `Integrity`, and a header
///   signature that differs from the object's `InvalidSignature`.
pub async fn read_pipeline<T: LocalData, C: ObjectCodec>(
    codec: &C,
    path: &Path,
    config: &PipelineConfig,
    ctx: &StageContext,
    tracker: &mut ProgressTracker<'_>,
    timer: &mut TelemetryTimer,
    state: &mut ReadState,
) -> Result<T, StoreError> {
    // Read the whole file; decompression needs the complete ciphertext.
    let t = Instant::now();
    let mut file = match fs::File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    let total = file.metadata().await?.len() as usize;
    let mut bytes = Vec::with_capacity(total);
    let mut buf = vec![0u8; ctx.buffer_size];
    loop {
        ctx.checkpoint().await?;
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..n]);
        tracker.update(true, fraction(bytes.len(), total.max(bytes.len())));
    }
    drop(file);
    timer.add_stage_time(Stage::Read, t.elapsed());
    tracker.stage_done(true);

    let (header, consumed) = decode_header(&bytes)?;
    state.version = Some(header.version);
    state.counters.bytes_header = consumed as u64;
    tracker.set_active_stages(read_stage_count(&header));
    let payload = &bytes[consumed..];
    state.counters.bytes_payload = payload.len() as u64;
    debug!(
        path = %path.display(),
        signature = %header.signature,
        integrity = %header.integrity,
        compression = %header.compression,
        encryption = %header.encryption,
        "header decoded"
    );

    // Decrypt
    let active = !header.encryption.is_identity();
    let t = Instant::now();
    let material = crypto::derive_key_material(header.encryption, &config.password, &config.seed)?;
    let compressed = crypto::decrypt(header.encryption, &material, payload, ctx, &mut |p: f32| {
        tracker.update(active, p)
    })
    .await?;
    drop(material);
    timer.add_stage_time(Stage::Decrypt, t.elapsed());
    tracker.stage_done(active);
    state.counters.bytes_compressed = compressed.len() as u64;

    // Decompress into a buffer sized from the header
    let active = !header.compression.is_identity();
    let t = Instant::now();
    let serialized = compression::decompress(
        header.compression,
        &compressed,
        header.uncompressed_size as usize,
        ctx,
        &mut |p: f32| tracker.update(active, p),
    )
    .await?;
    timer.add_stage_time(Stage::Decompress, t.elapsed());
    tracker.stage_done(active);
    state.counters.bytes_serialized = serialized.len() as u64;
    drop(compressed);

    // Verify the digest of the serialized bytes
    let active = !header.integrity.is_identity();
    let t = Instant::now();
    integrity::ensure_digest(header.integrity, &serialized, &header.hash, ctx, &mut |p: f32| {
        tracker.update(active, p)
    })
    .await?;
    timer.add_stage_time(Stage::Verify, t.elapsed());
    tracker.stage_done(active);

    // Deserialize and compare signatures
    ctx.checkpoint().await?;
    let t = Instant::now();
    let value: T = codec.decode(&serialized)?;
    timer.add_stage_time(Stage::Deserialize, t.elapsed());

    let found = value.signature();
    if found != header.signature {
        return Err(StoreError::InvalidSignature { expected: header.signature, found });
    }
    Ok(value)
}
