//! headers/encode.rs
//!
//! Field order must match `decode.rs` exactly.

use crate::headers::types::{FileHeader, HeaderError};

/// Serialize a `FileHeader` in on-disk order.
///
/// # Returns
/// - `Ok(Vec<u8>)` of exactly `h.encoded_len()` bytes.
/// - `Err(HeaderError)` if the header fails validation.
pub fn encode_header(h: &FileHeader) -> Result<Vec<u8>, HeaderError> {
    h.validate()?;

    let mut out = Vec::with_capacity(h.encoded_len());

    fn put_u8(out: &mut Vec<u8>, v: u8) {
        out.push(v);
    }
    fn put_i32(out: &mut Vec<u8>, v: i32) {
        out.extend_from_slice(&v.to_le_bytes());
    }
    fn put_string(out: &mut Vec<u8>, s: &str) {
        put_varint(out, s.len() as u32);
        out.extend_from_slice(s.as_bytes());
    }

    put_string(&mut out, &h.signature);        // signature
    put_u8(&mut out, h.integrity as u8);       // integrity kind
    put_u8(&mut out, h.compression as u8);     // compression kind
    put_u8(&mut out, h.encryption as u8);      // encryption kind
    put_string(&mut out, &h.hash);             // hex digest
    put_i32(&mut out, h.uncompressed_size);    // serialized length
    put_i32(&mut out, h.version);              // schema version

    debug_assert_eq!(out.len(), h.encoded_len(), "encoding wrote incorrect length");
    Ok(out)
}

/// 7-bit groups, least significant first, high bit set on all but the last byte.
pub fn put_varint(out: &mut Vec<u8>, mut v: u32) {
    while v >= 0x80 {
        out.push((v as u8) | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
}
