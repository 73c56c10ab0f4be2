//! headers/decode.rs
//!
//! Header decoding with bounds checks on every field.
//! The header is authoritative for which stages the reader must undo.

use byteorder::{ByteOrder, LittleEndian};
use num_enum::TryFromPrimitive;

use crate::compression::CompressionKind;
use crate::constants::{MAX_HEADER_STRING_LEN, MAX_VARINT_LEN};
use crate::crypto::EncryptionKind;
use crate::headers::types::{FileHeader, HeaderError};
use crate::integrity::IntegrityKind;

/// Parse a header from the front of `buf`.
///
/// # Returns
/// - `Ok((header, consumed))`; the payload starts at `buf[consumed..]`.
/// - `Err(HeaderError)` on truncation, unknown enum bytes, oversized strings,
///   or a header that fails validation.
pub fn decode_header(buf: &[u8]) -> Result<(FileHeader, usize), HeaderError> {
    let mut i = 0usize;

    fn take<'a>(buf: &'a [u8], i: &mut usize, n: usize) -> Result<&'a [u8], HeaderError> {
        let end = i.checked_add(n).ok_or(HeaderError::BufferTooShort { have: buf.len(), need: usize::MAX })?;
        if end > buf.len() {
            return Err(HeaderError::BufferTooShort { have: buf.len(), need: end });
        }
        let s = &buf[*i..end];
        *i = end;
        Ok(s)
    }
    fn get_u8(buf: &[u8], i: &mut usize) -> Result<u8, HeaderError> {
        Ok(take(buf, i, 1)?[0])
    }
    fn get_i32(buf: &[u8], i: &mut usize) -> Result<i32, HeaderError> {
        Ok(LittleEndian::read_i32(take(buf, i, 4)?))
    }
    fn get_string(buf: &[u8], i: &mut usize) -> Result<String, HeaderError> {
        let len = get_varint(buf, i)? as usize;
        if len > MAX_HEADER_STRING_LEN {
            return Err(HeaderError::StringTooLong { len, max: MAX_HEADER_STRING_LEN });
        }
        let bytes = take(buf, i, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| HeaderError::InvalidUtf8)
    }

    let signature = get_string(buf, &mut i)?;

    let raw = get_u8(buf, &mut i)?;
    let integrity = IntegrityKind::try_from_primitive(raw).map_err(|_| HeaderError::UnknownIntegrity { raw })?;
    let raw = get_u8(buf, &mut i)?;
    let compression = CompressionKind::try_from_primitive(raw).map_err(|_| HeaderError::UnknownCompression { raw })?;
    let raw = get_u8(buf, &mut i)?;
    let encryption = EncryptionKind::try_from_primitive(raw).map_err(|_| HeaderError::UnknownEncryption { raw })?;

    let hash = get_string(buf, &mut i)?;
    let uncompressed_size = get_i32(buf, &mut i)?;
    let version = get_i32(buf, &mut i)?;

    let h = FileHeader { signature, integrity, compression, encryption, hash, uncompressed_size, version };
    h.validate()?;
    Ok((h, i))
}

/// Read a 7-bit encoded `u32` (at most 5 bytes).
pub fn get_varint(buf: &[u8], i: &mut usize) -> Result<u32, HeaderError> {
    let mut value: u32 = 0;
    for n in 0..MAX_VARINT_LEN {
        let b = *buf
            .get(*i)
            .ok_or(HeaderError::BufferTooShort { have: buf.len(), need: *i + 1 })?;
        *i += 1;
        // The fifth byte may only carry the top 4 bits.
        if n == MAX_VARINT_LEN - 1 && b > 0x0F {
            return Err(HeaderError::BadVarint);
        }
        value |= ((b & 0x7F) as u32) << (7 * n);
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(HeaderError::BadVarint)
}
