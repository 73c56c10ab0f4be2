//! compression/codecs/mod.rs
//! Concrete codecs plus the shared pull-style decoder adapter.
use std::io::{ErrorKind, Read};

use crate::compression::types::{CompressionError, Decompressor};

pub mod identity;
pub mod zip;
pub mod gzip;
pub mod brotli;

/// Adapts any `Read` decoder (flate2, brotli, or a raw slice) to [`Decompressor`].
pub struct ReadDecompressor<R> {
    codec: &'static str,
    inner: R,
}

impl<R: Read + Send> ReadDecompressor<R> {
    pub fn new(codec: &'static str, inner: R) -> Self {
        Self { codec, inner }
    }
}

impl<R: Read + Send> Decompressor for ReadDecompressor<R> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, CompressionError> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(CompressionError::Corrupt {
                        codec: self.codec,
                        msg: e.to_string(),
                    })
                }
            }
        }
    }
}
