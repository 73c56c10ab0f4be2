//! compression/registry.rs
//! Codec registry and factory functions.

use crate::compression::codecs::{brotli, gzip, identity, zip};
use crate::compression::types::{CompressionKind, CompressionLevel, Compressor, Decompressor};

/// Summary: Build the encoder for `kind`, configured once for the whole operation.
pub fn create_compressor(kind: CompressionKind, level: CompressionLevel) -> Box<dyn Compressor + Send> {
    match kind {
        CompressionKind::None   => identity::IdentityCompressor::new(),
        CompressionKind::Zip    => zip::ZipCompressor::new(level),
        CompressionKind::GZip   => gzip::GzipCompressor::new(level),
        CompressionKind::Brotli => brotli::BrotliCompressor::new(level),
    }
}

/// Summary: Build a decoder reading from the complete compressed payload.
/// - `buffer_size` sizes the brotli ring buffer; flate2 manages its own.
pub fn create_decompressor<'a>(
    kind: CompressionKind,
    input: &'a [u8],
    buffer_size: usize,
) -> Box<dyn Decompressor + Send + 'a> {
    match kind {
        CompressionKind::None   => identity::identity_decompressor(input),
        CompressionKind::Zip    => zip::zip_decompressor(input),
        CompressionKind::GZip   => gzip::gzip_decompressor(input),
        CompressionKind::Brotli => brotli::brotli_decompressor(input, buffer_size),
    }
}
