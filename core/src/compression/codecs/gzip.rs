//! GZip via flate2.

use std::io::Write;

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::compression::codecs::ReadDecompressor;
use crate::compression::types::{CompressionError, CompressionLevel, Compressor, Decompressor};

const CODEC: &str = "gzip";

pub struct GzipCompressor {
    enc: Option<GzEncoder<Vec<u8>>>,
}

impl GzipCompressor {
    pub fn new(level: CompressionLevel) -> Box<dyn Compressor + Send> {
        let enc = GzEncoder::new(Vec::new(), Compression::new(level.deflate_level()));
        Box::new(Self { enc: Some(enc) })
    }
}

impl Compressor for GzipCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self
            .enc
            .as_mut()
            .ok_or_else(|| CompressionError::StateError("gzip stream already finished".into()))?;
        enc.write_all(input)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        out.append(enc.get_mut());
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self
            .enc
            .take()
            .ok_or_else(|| CompressionError::StateError("gzip stream already finished".into()))?;
        let mut tail = enc
            .finish()
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        out.append(&mut tail);
        Ok(())
    }
}

pub fn gzip_decompressor<'a>(input: &'a [u8]) -> Box<dyn Decompressor + Send + 'a> {
    Box::new(ReadDecompressor::new(CODEC, GzDecoder::new(input)))
}
