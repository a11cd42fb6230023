//! Region file header + blob index parsing (`spec.md` §4.5).

use std::io::{Read, Write};

use crate::error::{Error, Result};

pub const MAGIC: &[u8; 20] = b"HytaleIndexedStorage";
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub blob_count: u32,
    pub segment_size: u32,
}

impl Header {
    pub fn write(&self, out: &mut impl Write) -> Result<()> {
        out.write_all(MAGIC).map_err(|e| Error::Internal(format!("header write failed: {e}")))?;
        out.write_all(&VERSION.to_be_bytes()).map_err(|e| Error::Internal(e.to_string()))?;
        out.write_all(&self.blob_count.to_be_bytes()).map_err(|e| Error::Internal(e.to_string()))?;
        out.write_all(&self.segment_size.to_be_bytes()).map_err(|e| Error::Internal(e.to_string()))?;
        Ok(())
    }

    pub fn read(data: &mut impl Read) -> Result<Self> {
        let mut buf = [0u8; HEADER_LEN];
        data.read_exact(&mut buf).map_err(|e| Error::Format(format!("truncated region header: {e}")))?;
        if &buf[0..20] != MAGIC {
            return Err(Error::Format("bad region file magic".to_string()));
        }
        let version = u32::from_be_bytes(buf[20..24].try_into().unwrap());
        if version != VERSION {
            return Err(Error::Format(format!("unsupported region file version {version}")));
        }
        let blob_count = u32::from_be_bytes(buf[24..28].try_into().unwrap());
        let segment_size = u32::from_be_bytes(buf[28..32].try_into().unwrap());
        Ok(Header { blob_count, segment_size })
    }
}

/// Reads `blob_count` big-endian `u32` entries immediately following the header.
pub fn read_blob_index(data: &mut impl Read, blob_count: u32) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(blob_count as usize);
    for _ in 0..blob_count {
        let mut buf = [0u8; 4];
        data.read_exact(&mut buf).map_err(|e| Error::Format(format!("truncated blob index: {e}")))?;
        out.push(u32::from_be_bytes(buf));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = Header { blob_count: 1024, segment_size: 4096 };
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_LEN);
        let parsed = Header::read(&mut std::io::Cursor::new(buf)).unwrap();
        assert_eq!(parsed.blob_count, 1024);
        assert_eq!(parsed.segment_size, 4096);
    }

    #[test]
    fn bad_magic_is_format_error() {
        let mut buf = vec![0u8; HEADER_LEN];
        buf[0] = b'X';
        assert!(matches!(Header::read(&mut std::io::Cursor::new(buf)), Err(Error::Format(_))));
    }
}
