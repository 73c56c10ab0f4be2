//! localdata-core
//!
//! Persist application objects to local files through a configurable pipeline:
//! serialize -> checksum -> compress -> encrypt -> write, and the inverse on read.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod context;

// Stages
pub mod integrity;
pub mod compression;
pub mod crypto;

// Framing, objects and storage
pub mod codec;
pub mod headers;
pub mod storage;
pub mod telemetry;

// Orchestrator
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{BincodeCodec, JsonCodec, LocalData, ObjectCodec};
    pub use crate::compression::{CompressionKind, CompressionLevel};
    pub use crate::crypto::{EncryptionKind, Secret};
    pub use crate::integrity::IntegrityKind;
    pub use crate::pipeline::{Callbacks, LocalStore, PipelineConfig, ReadOutcome, WriteOutcome};
    pub use crate::storage::{DirectoryProvider, FileInfo, PathProvider};
    pub use crate::types::{FileResult, StoreError};
}
