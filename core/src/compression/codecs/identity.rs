//! Pass-through codec used when compression is disabled.

use crate::compression::codecs::ReadDecompressor;
use crate::compression::types::{CompressionError, Compressor, Decompressor};

pub struct IdentityCompressor {
    finished: bool,
}

impl IdentityCompressor {
    pub fn new() -> Box<dyn Compressor + Send> {
        Box::new(Self { finished: false })
    }
}

impl Compressor for IdentityCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        if self.finished {
            return Err(CompressionError::StateError("identity stream already finished".into()));
        }
        out.extend_from_slice(input);
        Ok(())
    }

    fn finish(&mut self, _out: &mut Vec<u8>) -> Result<(), CompressionError> {
        if self.finished {
            return Err(CompressionError::StateError("identity stream already finished".into()));
        }
        self.finished = true;
        Ok(())
    }
}

pub fn identity_decompressor<'a>(input: &'a [u8]) -> Box<dyn Decompressor + Send + 'a> {
    Box::new(ReadDecompressor::new("none", input))
}
