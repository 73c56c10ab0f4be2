//! pipeline/write.rs
//! Write path: object -> header + transformed payload -> file.
use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::codec::{LocalData, ObjectCodec};
use crate::compression;
use crate::context::StageContext;
use crate::crypto;
use crate::headers::{encode_header, FileHeader, HeaderError};
use crate::integrity;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::progress::ProgressTracker;
use crate::telemetry::{Stage, TelemetryCounters, TelemetryTimer};
use crate::types::StoreError;
use crate::utils::fraction;

/// Stages counted by the progress tracker: every non-identity stage plus the file write.
pub fn write_stage_count(config: &PipelineConfig) -> usize {
    1 + usize::from(!config.integrity.is_identity())
        + usize::from(!config.compression.is_identity())
        + usize::from(!config.encryption.is_identity())
}

/// Telemetry a write leaves behind, whatever its outcome.
#[derive(Default)]
pub struct WriteState {
    pub counters: TelemetryCounters,
}

/// Summary: Run every write stage in order and persist the file at `path`.
/// - Parent directories are created first.
/// - Header and payload go to a temp file next to `path`, which replaces the
///   target only after it was fully written and synced. On any failure or
///   cancellation the temp file is removed and an existing target is untouched.
/// - Fails with `Cancelled` at the first chunk boundary after the token fires.
pub async fn write_pipeline<T: LocalData, C: ObjectCodec>(
    codec: &C,
    value: &T,
    path: &Path,
    config: &PipelineConfig,
    ctx: &StageContext,
    tracker: &mut ProgressTracker<'_>,
    timer: &mut TelemetryTimer,
    state: &mut WriteState,
) -> Result<(), StoreError> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).await?;
    ctx.checkpoint().await?;

    // Serialize
    let t = Instant::now();
    let serialized = codec.encode(value)?;
    timer.add_stage_time(Stage::Serialize, t.elapsed());
    state.counters.bytes_serialized = serialized.len() as u64;
    let uncompressed_size = i32::try_from(serialized.len())
        .map_err(|_| HeaderError::SizeOverflow { have: serialized.len() })?;

    // Checksum over the serialized bytes
    let active = !config.integrity.is_identity();
    let t = Instant::now();
    let hash = integrity::compute_digest(config.integrity, &serialized, ctx, &mut |p: f32| {
        tracker.update(active, p)
    })
    .await?;
    timer.add_stage_time(Stage::Checksum, t.elapsed());
    tracker.stage_done(active);

    // Compress
    let active = !config.compression.is_identity();
    let t = Instant::now();
    let compressed = compression::compress(
        config.compression,
        config.compression_level,
        &serialized,
        ctx,
        &mut |p: f32| tracker.update(active, p),
    )
    .await?;
    timer.add_stage_time(Stage::Compress, t.elapsed());
    tracker.stage_done(active);
    state.counters.bytes_compressed = compressed.len() as u64;
    drop(serialized);

    // Encrypt; key derivation runs once for the whole operation
    let active = !config.encryption.is_identity();
    let t = Instant::now();
    let material = crypto::derive_key_material(config.encryption, &config.password, &config.seed)?;
    let payload = crypto::encrypt(config.encryption, &material, &compressed, ctx, &mut |p: f32| {
        tracker.update(active, p)
    })
    .await?;
    drop(material);
    timer.add_stage_time(Stage::Encrypt, t.elapsed());
    tracker.stage_done(active);
    state.counters.bytes_payload = payload.len() as u64;
    drop(compressed);

    let header = FileHeader {
        signature: value.signature(),
        integrity: config.integrity,
        compression: config.compression,
        encryption: config.encryption,
        hash,
        uncompressed_size,
        version: value.version(),
    };
    let header_bytes = encode_header(&header)?;
    state.counters.bytes_header = header_bytes.len() as u64;

    // Write header + payload into a sibling temp file; dropping `tmp_path`
    // before the rename deletes it.
    ctx.checkpoint().await?;
    let t = Instant::now();
    let (std_file, tmp_path) = tempfile::Builder::new()
        .prefix(".localdata-")
        .suffix(".tmp")
        .tempfile_in(&parent)?
        .into_parts();
    let mut file = fs::File::from_std(std_file);
    file.write_all(&header_bytes).await?;

    let total = header_bytes.len() + payload.len();
    let mut done = header_bytes.len();
    for chunk in payload.chunks(ctx.buffer_size) {
        ctx.checkpoint().await?;
        file.write_all(chunk).await?;
        done += chunk.len();
        tracker.update(true, fraction(done, total));
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    ctx.checkpoint().await?;
    tmp_path.persist(path).map_err(|e| e.error)?;
    timer.add_stage_time(Stage::Write, t.elapsed());
    tracker.stage_done(true);

    debug!(
        path = %path.display(),
        header = header_bytes.len(),
        payload = payload.len(),
        "file written"
    );
    Ok(())
}
