//! Fixed-width field packing.
//!
//! Textual fields occupy a declared width on the wire: the value is written
//! as-is and the remainder is zero-padded. A stored value must be strictly
//! shorter than its width so at least one NUL terminator survives, which is
//! what the peer keys on when reading the field back.

use crate::error::{WireError, WireResult};

/// Appends `value` to `buf`, zero-padded to exactly `width` bytes.
pub fn put_padded(
    buf: &mut Vec<u8>,
    field: &'static str,
    value: &[u8],
    width: usize,
) -> WireResult<()> {
    if value.len() >= width {
        return Err(WireError::FieldTooLong {
            field,
            len: value.len(),
            max: width,
        });
    }
    buf.extend_from_slice(value);
    buf.resize(buf.len() + (width - value.len()), 0);
    Ok(())
}

/// Appends a field whose value must fill its width exactly.
pub fn put_exact(
    buf: &mut Vec<u8>,
    field: &'static str,
    value: &[u8],
    width: usize,
) -> WireResult<()> {
    if value.len() != width {
        return Err(WireError::FieldLength {
            field,
            expected: width,
            len: value.len(),
        });
    }
    buf.extend_from_slice(value);
    Ok(())
}

/// Reads a zero-padded text field back: bytes up to the first NUL,
/// validated as UTF-8.
pub fn read_padded_text(field: &'static str, raw: &[u8]) -> WireResult<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    std::str::from_utf8(&raw[..end])
        .map(str::to_owned)
        .map_err(|_| WireError::InvalidText { field })
}
