//! compression/mod.rs
//! Reversible size-reducing stage over a byte stream.
//!
//! Notes:
//! - One continuous codec stream per payload (no per-chunk framing); the header
//!   records the uncompressed size so the reader can preallocate and bound output.
//! - The identity codec is a real pass-through so the orchestrator never branches
//!   on "is compression enabled".
//! - Registry maps a `CompressionKind` to a boxed codec once per operation.

pub mod types;
pub mod registry;
pub mod codecs;
pub mod stream;

pub use types::*;
pub use registry::*;
pub use stream::*;
