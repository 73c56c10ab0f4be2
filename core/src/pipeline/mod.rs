//! pipeline/mod.rs
//! File pipeline orchestrator.
//!
//! Write: serialize -> checksum -> compress -> encrypt -> header + payload -> file.
//! Read:  file -> header -> decrypt -> decompress -> verify -> deserialize -> signature check.
//!
//! Stages run strictly in sequence; each suspends at every chunk boundary so a
//! cancel request is observed mid-stream.

pub mod config;
pub mod progress;
pub mod outcome;
pub mod write;
pub mod read;
pub mod store;

pub use config::*;
pub use progress::*;
pub use outcome::*;
pub use store::*;
