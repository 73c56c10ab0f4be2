//! pipeline/store.rs
//! Public store surface: one in-flight operation per instance.
use std::future::Future;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::codec::{BincodeCodec, LocalData, ObjectCodec};
use crate::constants::DEFAULT_LIST_PATTERN;
use crate::context::StageContext;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::outcome::{Callbacks, ReadOutcome, WriteOutcome};
use crate::pipeline::progress::ProgressTracker;
use crate::pipeline::read::{planned_read_stage_count, read_pipeline, ReadState};
use crate::pipeline::write::{write_pipeline, write_stage_count, WriteState};
use crate::storage::{self, DirectoryProvider, FileInfo, PathProvider};
use crate::telemetry::{TelemetrySnapshot, TelemetryTimer};
use crate::types::{FileResult, StoreError};

/// Releases the in-flight slot when the operation ends or its future is dropped.
struct InFlight<'a> {
    slot: &'a Mutex<Option<CancellationToken>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

/// Persists objects under the provider's root through the configured pipeline.
///
/// `write` and `read` validate their arguments and claim the store
/// synchronously, then return a future that performs the work. A second call
/// while one is in flight is rejected with `StoreError::Busy`.
pub struct LocalStore<P: PathProvider = DirectoryProvider, C: ObjectCodec = BincodeCodec> {
    provider: P,
    codec: C,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl LocalStore<DirectoryProvider, BincodeCodec> {
    /// Store rooted at `root` using the default binary codec.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_parts(DirectoryProvider::new(root), BincodeCodec)
    }
}

impl<P: PathProvider, C: ObjectCodec> LocalStore<P, C> {
    pub fn with_parts(provider: P, codec: C) -> Self {
        Self { provider, codec, in_flight: Mutex::new(None) }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Absolute path for a logical name.
    pub fn path(&self, name: &str) -> Result<PathBuf, StoreError> {
        self.provider.resolve(name)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Request cancellation of the operation in flight, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.in_flight.lock().as_ref() {
            info!("cancellation requested");
            token.cancel();
        }
    }

    fn claim(&self) -> Result<(InFlight<'_>, CancellationToken), StoreError> {
        let mut slot = self.in_flight.lock();
        if slot.is_some() {
            return Err(StoreError::Busy);
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        Ok((InFlight { slot: &self.in_flight }, token))
    }

    /// Summary: Serialize `value` and persist it as `name`.
    ///
    /// # Errors (synchronous)
    /// - `Config` for an invalid configuration, `InvalidArgument` for a bad name,
    ///   `Busy` while another operation runs. No callback fires in these cases.
    ///
    /// # Outcome
    /// - `Ok`, `Cancelled` or `ExceptionRaised`. Unless the result is `Ok`, an
    ///   existing file at `name` keeps its previous contents.
    pub fn write<'a, T: LocalData>(
        &'a self,
        value: &'a T,
        name: &str,
        config: &PipelineConfig,
        callbacks: Callbacks<'a, WriteOutcome>,
    ) -> Result<impl Future<Output = WriteOutcome> + 'a, StoreError> {
        config.validate()?;
        let path = self.provider.resolve(name)?;
        let (guard, token) = self.claim()?;
        let config = config.clone();

        Ok(async move {
            let Callbacks { on_progress, on_complete } = callbacks;
            let ctx = StageContext::new(config.buffer_size(), token);
            let mut tracker = ProgressTracker::new(write_stage_count(&config), on_progress);
            let mut timer = TelemetryTimer::new();
            let mut state = WriteState::default();
            tracker.start();

            let res = write_pipeline(
                &self.codec, value, &path, &config, &ctx, &mut tracker, &mut timer, &mut state,
            )
            .await;

            let result = match res {
                Ok(()) => FileResult::Ok,
                Err(e) => {
                    let result = e.classify();
                    if result == FileResult::Cancelled {
                        info!(path = %path.display(), "write cancelled");
                    } else {
                        error!(path = %path.display(), error = %e, "write failed");
                    }
                    result
                }
            };

            timer.finish();
            let telemetry = TelemetrySnapshot::from(&state.counters, &timer);
            log_outcome("write", &path, result, &telemetry);

            drop(guard);
            tracker.finish();
            let outcome = WriteOutcome { result, telemetry };
            if let Some(done) = on_complete {
                done(&outcome);
            }
            outcome
        })
    }

    /// Summary: Load `name` and rebuild a `T` from it.
    ///
    /// Stage kinds are taken from the file header; `config` supplies the
    /// buffer size and the secrets.
    ///
    /// # Outcome
    /// - `Ok` with the value, or `NotFound`, `IntegrityFailure`,
    ///   `DecryptionFailed`, `InvalidSignature`, `Cancelled`, `ExceptionRaised`
    ///   with no value.
    pub fn read<'a, T: LocalData + 'a>(
        &'a self,
        name: &str,
        config: &PipelineConfig,
        callbacks: Callbacks<'a, ReadOutcome<T>>,
    ) -> Result<impl Future<Output = ReadOutcome<T>> + 'a, StoreError> {
        config.validate()?;
        let path = self.provider.resolve(name)?;
        let (guard, token) = self.claim()?;
        let config = config.clone();

        Ok(async move {
            let Callbacks { on_progress, on_complete } = callbacks;
            let ctx = StageContext::new(config.buffer_size(), token);
            let mut tracker = ProgressTracker::new(planned_read_stage_count(&config), on_progress);
            let mut timer = TelemetryTimer::new();
            let mut state = ReadState::default();
            tracker.start();

            let res = read_pipeline::<T, C>(
                &self.codec, &path, &config, &ctx, &mut tracker, &mut timer, &mut state,
            )
            .await;

            let (result, value) = match res {
                Ok(value) => (FileResult::Ok, Some(value)),
                Err(e) => {
                    let result = e.classify();
                    match result {
                        FileResult::Cancelled => info!(path = %path.display(), "read cancelled"),
                        FileResult::NotFound => error!(path = %path.display(), "file not found"),
                        FileResult::IntegrityFailure
                        | FileResult::InvalidSignature
                        | FileResult::DecryptionFailed => {
                            warn!(path = %path.display(), error = %e, "rejected file contents")
                        }
                        _ => error!(path = %path.display(), error = %e, "read failed"),
                    }
                    (result, None)
                }
            };

            timer.finish();
            let telemetry = TelemetrySnapshot::from(&state.counters, &timer);
            log_outcome("read", &path, result, &telemetry);

            drop(guard);
            tracker.finish();
            let outcome = ReadOutcome { result, value, version: state.version, telemetry };
            if let Some(done) = on_complete {
                done(&outcome);
            }
            outcome
        })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.provider.exists(name)
    }

    /// Remove `name`. Returns whether a file was deleted.
    pub fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let deleted = self.provider.delete(name)?;
        if deleted {
            info!(file = name, "deleted");
        }
        Ok(deleted)
    }

    /// Files under the root matching `pattern` (`*.*` for all).
    pub fn list_files(&self, pattern: &str, recursive: bool) -> Result<Vec<FileInfo>, StoreError> {
        storage::list_files(self.provider.root(), pattern, recursive)
    }

    /// Every file directly under the root.
    pub fn list_all(&self) -> Result<Vec<FileInfo>, StoreError> {
        self.list_files(DEFAULT_LIST_PATTERN, false)
    }

    pub fn file_info(&self, name: &str) -> Result<Option<FileInfo>, StoreError> {
        storage::file_info(&self.provider, name)
    }

    /// First unused `stem000.ext` .. `stem999.ext` variant of `name`.
    pub fn next_available_name(&self, name: &str) -> Result<String, StoreError> {
        storage::next_available_name(&self.provider, name)
    }
}

fn log_outcome(op: &str, path: &Path, result: FileResult, telemetry: &TelemetrySnapshot) {
    info!(op, path = %path.display(), %result, elapsed_ms = telemetry.elapsed.as_millis() as u64, "operation finished");
    tracing::debug!(
        op,
        serialized = telemetry.bytes_serialized,
        compressed = telemetry.bytes_compressed,
        payload = telemetry.bytes_payload,
        file = telemetry.bytes_file,
        ratio = telemetry.compression_ratio,
        "telemetry"
    );
}
