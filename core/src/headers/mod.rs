//! headers/mod.rs
//! Self-describing file header written in front of every payload.
//!
//! Layout (little-endian):
//! ```text
//! signature          7-bit length prefix + UTF-8
//! integrity          u8
//! compression        u8
//! encryption         u8
//! hash               7-bit length prefix + UTF-8 (uppercase hex, empty if none)
//! uncompressed_size  i32
//! version            i32
//! payload            remainder of the file
//! ```

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
