//! telemetry/snapshot.rs
//! Immutable summary handed back with every outcome.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub bytes_serialized: u64,
    pub bytes_compressed: u64,
    pub bytes_payload: u64,
    pub bytes_file: u64,
    /// `bytes_compressed / bytes_serialized`, 0 when nothing was serialized.
    pub compression_ratio: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let compression_ratio = if counters.bytes_serialized > 0 {
            counters.bytes_compressed as f64 / counters.bytes_serialized as f64
        } else {
            0.0
        };

        Self {
            bytes_serialized: counters.bytes_serialized,
            bytes_compressed: counters.bytes_compressed,
            bytes_payload: counters.bytes_payload,
            bytes_file: counters.bytes_file(),
            compression_ratio,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Stage times never exceed wall-clock time.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
    }
}
