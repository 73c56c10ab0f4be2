//! telemetry/counters.rs
//! Byte counters collected while one operation runs.
//!
//! Summary: every stage records its output size here; converted into an
//! immutable `TelemetrySnapshot` when the operation ends.
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    /// Serialized object size (pre-compression).
    pub bytes_serialized: u64,
    /// Size after compression.
    pub bytes_compressed: u64,
    /// Payload size after encryption, as stored after the header.
    pub bytes_payload: u64,
    /// Header length.
    pub bytes_header: u64,
}

impl TelemetryCounters {
    /// Header plus payload.
    pub fn bytes_file(&self) -> u64 {
        self.bytes_header + self.bytes_payload
    }
}
