//! Brotli via the `brotli` crate.
//!
//! The encoder buffers internally and hands its output over when the stream closes.

use std::io::Write;

use crate::compression::codecs::ReadDecompressor;
use crate::compression::types::{CompressionError, CompressionLevel, Compressor, Decompressor};
use crate::constants::BROTLI_LGWIN;

const CODEC: &str = "brotli";
const ENCODER_BUFFER: usize = 4096;

pub struct BrotliCompressor {
    enc: Option<::brotli::CompressorWriter<Vec<u8>>>,
}

impl BrotliCompressor {
    pub fn new(level: CompressionLevel) -> Box<dyn Compressor + Send> {
        let enc = ::brotli::CompressorWriter::new(
            Vec::new(),
            ENCODER_BUFFER,
            level.brotli_quality(),
            BROTLI_LGWIN,
        );
        Box::new(Self { enc: Some(enc) })
    }
}

impl Compressor for BrotliCompressor {
    fn compress_chunk(&mut self, input: &[u8], _out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self
            .enc
            .as_mut()
            .ok_or_else(|| CompressionError::StateError("brotli stream already finished".into()))?;
        enc.write_all(input)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self
            .enc
            .take()
            .ok_or_else(|| CompressionError::StateError("brotli stream already finished".into()))?;
        // into_inner closes the stream before returning the sink.
        let mut bytes = enc.into_inner();
        out.append(&mut bytes);
        Ok(())
    }
}

pub fn brotli_decompressor<'a>(input: &'a [u8], buffer_size: usize) -> Box<dyn Decompressor + Send + 'a> {
    Box::new(ReadDecompressor::new(CODEC, ::brotli::Decompressor::new(input, buffer_size)))
}
