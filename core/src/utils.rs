use std::fmt;

use num_enum::TryFromPrimitive;
use regex::Regex;

/// Render a raw wire value as its enum variant name, or hex when unknown.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Fraction `done / total` clamped to [0, 1]; an empty total counts as complete.
#[inline]
pub fn fraction(done: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (done as f64 / total as f64).clamp(0.0, 1.0) as f32
}

/// Compile a file-name wildcard (`*`, `?`) into an anchored regex.
///
/// `*.*` follows the usual directory-listing convention and matches every name,
/// including names without an extension.
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    if pattern == "*.*" || pattern.is_empty() {
        return Regex::new("^.*$");
    }

    let mut re = String::with_capacity(pattern.len() * 2 + 2);
    re.push('^');
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re)
}
