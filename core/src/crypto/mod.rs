//! crypto/mod.rs
//! Reversible confidentiality stage.
//!
//! Notes:
//! - Every cipher variant derives key and IV with PBKDF2-HMAC-SHA1 from the
//!   configured password and seed, once per operation.
//! - Block ciphers run in CBC mode with PKCS#7 padding; the final block is
//!   flushed explicitly at end of stream.
//! - Wrong secrets or damaged ciphertext surface as `CryptoError::DecryptionFailed`.

pub mod types;
pub mod secret;
pub mod kdf;
pub mod cipher;
pub mod registry;
pub mod stream;

pub use types::*;
pub use secret::*;
pub use kdf::*;
pub use cipher::*;
pub use registry::*;
pub use stream::*;
