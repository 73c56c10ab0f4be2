//! constants.rs
//! Stable limits and defaults shared by every pipeline stage.

/// Default streaming chunk size, in KiB.
pub const DEFAULT_BUFFER_SIZE_KB: usize = 32;
/// Smallest accepted chunk size, in KiB.
pub const MIN_BUFFER_SIZE_KB: usize = 4;
/// Largest accepted chunk size, in KiB.
pub const MAX_BUFFER_SIZE_KB: usize = 256;

/// PBKDF2-HMAC-SHA1 iteration count used for every cipher variant.
pub const PBKDF2_ITERATIONS: u32 = 1000;
/// PBKDF2 salts shorter than this are rejected.
pub const MIN_SEED_LEN: usize = 8;
/// DES keys are taken from an exactly 8-character password.
pub const DES_PASSWORD_LEN: usize = 8;

/// Upper bound for any length-prefixed string in the file header.
pub const MAX_HEADER_STRING_LEN: usize = 64 * 1024;
/// A 7-bit encoded `i32` length never needs more than 5 bytes.
pub const MAX_VARINT_LEN: usize = 5;

/// Brotli sliding window (log2).
pub const BROTLI_LGWIN: u32 = 22;

/// `next_available_name` gives up after this many candidates.
pub const MAX_NAME_INDEX: usize = 1000;

/// Wildcard used when listing every file in the store root.
pub const DEFAULT_LIST_PATTERN: &str = "*.*";

/// Ceiling for buffers preallocated from sizes recorded in a file header.
pub const MAX_PREALLOC_BYTES: usize = 64 * 1024 * 1024;
