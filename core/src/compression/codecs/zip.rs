//! Zip (zlib-wrapped deflate) via flate2, one continuous stream per payload.

use std::io::Write;

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use crate::compression::codecs::ReadDecompressor;
use crate::compression::types::{CompressionError, CompressionLevel, Compressor, Decompressor};

const CODEC: &str = "zip";

pub struct ZipCompressor {
    enc: Option<ZlibEncoder<Vec<u8>>>,
}

impl ZipCompressor {
    pub fn new(level: CompressionLevel) -> Box<dyn Compressor + Send> {
        let enc = ZlibEncoder::new(Vec::new(), Compression::new(level.deflate_level()));
        Box::new(Self { enc: Some(enc) })
    }
}

impl Compressor for ZipCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self
            .enc
            .as_mut()
            .ok_or_else(|| CompressionError::StateError("zip stream already finished".into()))?;
        enc.write_all(input)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        // Drain whatever the encoder has emitted so far.
        out.append(enc.get_mut());
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self
            .enc
            .take()
            .ok_or_else(|| CompressionError::StateError("zip stream already finished".into()))?;
        let mut tail = enc
            .finish()
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;
        out.append(&mut tail);
        Ok(())
    }
}

pub fn zip_decompressor<'a>(input: &'a [u8]) -> Box<dyn Decompressor + Send + 'a> {
    Box::new(ReadDecompressor::new(CODEC, ZlibDecoder::new(input)))
}
