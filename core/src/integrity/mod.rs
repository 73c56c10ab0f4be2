//! integrity/mod.rs
//! Checksum stage: chunked digest computation and verification.
//!
//! The digest always covers the serialized, pre-compression bytes, so it does not
//! depend on which compressor or cipher the file was written with.

pub mod types;
pub mod digest;

pub use types::*;
pub use digest::*;
