//! Bit-packed codec primitives shared by the BSON serializer (`spec.md` §4.3).
//!
//! Every encoder here is a pure function of its input buffers: no shared
//! state, no allocation beyond the returned `Vec<u8>`. This lets the
//! per-section serializers in `crate::serialize` be called from any worker
//! thread without coordination.

pub mod bitfield;
pub mod palette;
pub mod voxel;

use crate::error::{Error, Result};

/// Writes a length-prefixed UTF-8 string: `u16 byte_length` then the raw
/// UTF-8 bytes, no null terminator (`spec.md` §4.3).
pub fn write_utf(out: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    debug_assert!(bytes.len() <= u16::MAX as usize, "utf payload too long");
    out.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
    out.extend_from_slice(bytes);
}

/// Reads a `u16` at `cursor`, advancing past it. A region file too short to
/// hold the field is corruption, not a crash.
pub fn read_u16(data: &[u8], cursor: &mut usize) -> Result<u16> {
    let bytes = data
        .get(*cursor..*cursor + 2)
        .ok_or_else(|| Error::Corruption(format!("truncated u16 field at offset {}", *cursor)))?;
    *cursor += 2;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Reads back a `write_utf` payload, advancing `cursor` past it. Returns
/// `Error::Corruption` on a truncated buffer or non-UTF-8 payload rather
/// than panicking, so a bit-flipped region file surfaces as a documented
/// error instead of crashing the export/import process.
pub fn read_utf(data: &[u8], cursor: &mut usize) -> Result<String> {
    let len = read_u16(data, cursor)? as usize;
    let bytes = data
        .get(*cursor..*cursor + len)
        .ok_or_else(|| Error::Corruption(format!("truncated utf payload at offset {}", *cursor)))?;
    let s = String::from_utf8(bytes.to_vec()).map_err(|e| Error::Corruption(format!("utf payload is not valid UTF-8: {e}")))?;
    *cursor += len;
    Ok(s)
}
