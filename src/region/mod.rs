//! Indexed, segment-allocated region file (`spec.md` §4.5).
//!
//! A region file is single-writer: callers must not hand the same
//! `IndexedStorageFile` to more than one thread (`spec.md` §5).

mod header;

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chunk::Chunk;
use crate::config::LightingMode;
use crate::error::{Error, Result};
use crate::serialize;

pub use header::{HEADER_LEN, MAGIC, VERSION};

/// One allocated run of segments, `[start, start+len)`, 1-indexed.
#[derive(Debug, Clone, Copy)]
struct Allocation {
    start: u32,
    len: u32,
}

/// A region file backing up to `blob_count` chunks in a fixed `segment_size`-byte
/// segment store (`spec.md` §4.5).
pub struct IndexedStorageFile {
    path: PathBuf,
    file: File,
    blob_count: u32,
    segment_size: u32,
    /// Segment index (1-indexed) that currently holds each blob slot, or `None`.
    blob_index: Vec<Option<Allocation>>,
    /// `true` at position `k-1` while segment `k` is in use.
    used_segments: Vec<bool>,
}

fn io_err(path: &Path, source: std::io::Error) -> Error {
    Error::io(path, source)
}

impl IndexedStorageFile {
    fn segment_count_for(&self, compressed_len: u32) -> u32 {
        (8 + compressed_len).div_ceil(self.segment_size)
    }

    fn segment_offset(&self, segment: u32) -> u64 {
        HEADER_LEN as u64 + self.blob_count as u64 * 4 + (segment as u64 - 1) * self.segment_size as u64
    }

    /// Writes header and an all-zero blob index, truncating any existing file.
    pub fn create(path: impl AsRef<Path>, blob_count: u32, segment_size: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;

        let header = header::Header { blob_count, segment_size };
        header.write(&mut file)?;
        let zero_index = vec![0u8; blob_count as usize * 4];
        file.write_all(&zero_index).map_err(|e| io_err(&path, e))?;
        file.flush().map_err(|e| io_err(&path, e))?;

        debug!(path = %path.display(), blob_count, segment_size, "created region file");

        Ok(IndexedStorageFile {
            path,
            file,
            blob_count,
            segment_size,
            blob_index: vec![None; blob_count as usize],
            used_segments: Vec::new(),
        })
    }

    /// Parses the header, loads the blob index, and reconstructs the
    /// used-segment bitset by scanning each present blob's length.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).write(true).open(&path).map_err(|e| io_err(&path, e))?;

        let header = header::Header::read(&mut file)?;
        let raw_index = header::read_blob_index(&mut file, header.blob_count)?;

        let mut blob_index = vec![None; header.blob_count as usize];
        let mut used_segments = Vec::new();

        for (slot, &segment) in raw_index.iter().enumerate() {
            if segment == 0 {
                continue;
            }
            let offset = HEADER_LEN as u64 + header.blob_count as u64 * 4 + (segment as u64 - 1) * header.segment_size as u64;
            file.seek(SeekFrom::Start(offset)).map_err(|e| io_err(&path, e))?;
            let mut len_buf = [0u8; 8];
            file.read_exact(&mut len_buf).map_err(|e| io_err(&path, e))?;
            let compressed_len = u32::from_be_bytes(len_buf[4..8].try_into().unwrap());
            let len = (8 + compressed_len).div_ceil(header.segment_size);

            let required = (segment as usize + len as usize - 1).max(used_segments.len());
            if used_segments.len() < required {
                used_segments.resize(required, false);
            }
            for s in segment..segment + len {
                used_segments[s as usize - 1] = true;
            }

            blob_index[slot] = Some(Allocation { start: segment, len });
        }

        debug!(path = %path.display(), blob_count = header.blob_count, "opened region file");

        Ok(IndexedStorageFile {
            path,
            file,
            blob_count: header.blob_count,
            segment_size: header.segment_size,
            blob_index,
            used_segments,
        })
    }

    fn find_free_run(&self, needed: u32) -> u32 {
        let mut run_start: Option<u32> = None;
        let mut run_len = 0u32;
        for (i, &used) in self.used_segments.iter().enumerate() {
            let segment = i as u32 + 1;
            if used {
                run_start = None;
                run_len = 0;
                continue;
            }
            if run_start.is_none() {
                run_start = Some(segment);
            }
            run_len += 1;
            if run_len == needed {
                return run_start.unwrap();
            }
        }
        let _ = run_len;
        run_start.unwrap_or(self.used_segments.len() as u32 + 1)
    }

    fn mark(&mut self, alloc: Allocation, used: bool) {
        let required = (alloc.start + alloc.len - 1) as usize;
        if self.used_segments.len() < required {
            self.used_segments.resize(required, false);
        }
        for s in alloc.start..alloc.start + alloc.len {
            self.used_segments[s as usize - 1] = used;
        }
    }

    fn blob_slot(&self, lx: u32, lz: u32) -> Result<usize> {
        let slot = (lz * 32 + lx) as usize;
        if slot >= self.blob_count as usize {
            return Err(Error::OutOfRange(format!("chunk-local ({lx}, {lz}) has no region slot")));
        }
        Ok(slot)
    }

    /// Serializes, compresses, and writes a chunk at local coordinates
    /// `(lx, lz) ∈ [0, 32)²` (`spec.md` §4.5 step by step).
    pub fn write_chunk(&mut self, lx: u32, lz: u32, chunk: &Chunk, zstd_level: i32, lighting: LightingMode) -> Result<()> {
        let slot = self.blob_slot(lx, lz)?;

        let raw = serialize::to_bytes(chunk, lighting)?;
        let compressed = zstd::encode_all(raw.as_slice(), zstd_level).map_err(|e| io_err(&self.path, e))?;

        let mut blob = Vec::with_capacity(8 + compressed.len());
        blob.extend_from_slice(&(raw.len() as u32).to_be_bytes());
        blob.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
        blob.extend_from_slice(&compressed);

        if let Some(old) = self.blob_index[slot].take() {
            self.mark(old, false);
        }

        let needed = self.segment_count_for(compressed.len() as u32);
        let start = self.find_free_run(needed);
        let alloc = Allocation { start, len: needed };

        let offset = self.segment_offset(start);
        self.file.seek(SeekFrom::Start(offset)).map_err(|e| io_err(&self.path, e))?;
        self.file.write_all(&blob).map_err(|e| io_err(&self.path, e))?;

        let index_offset = HEADER_LEN as u64 + slot as u64 * 4;
        self.file.seek(SeekFrom::Start(index_offset)).map_err(|e| io_err(&self.path, e))?;
        self.file.write_all(&start.to_be_bytes()).map_err(|e| io_err(&self.path, e))?;

        self.blob_index[slot] = Some(alloc);
        self.mark(alloc, true);

        Ok(())
    }

    /// Reverses [`IndexedStorageFile::write_chunk`]; returns `None` if the
    /// slot is empty.
    pub fn read_chunk(&mut self, lx: u32, lz: u32, cx: i32, cz: i32, min_y: i32, max_y: i32) -> Result<Option<Chunk>> {
        let slot = self.blob_slot(lx, lz)?;
        let Some(alloc) = self.blob_index[slot] else {
            return Ok(None);
        };

        let offset = self.segment_offset(alloc.start);
        self.file.seek(SeekFrom::Start(offset)).map_err(|e| io_err(&self.path, e))?;
        let mut len_buf = [0u8; 8];
        self.file.read_exact(&mut len_buf).map_err(|e| io_err(&self.path, e))?;
        let src_len = u32::from_be_bytes(len_buf[0..4].try_into().unwrap());
        let compressed_len = u32::from_be_bytes(len_buf[4..8].try_into().unwrap());

        let max_payload = alloc.len as u64 * self.segment_size as u64 - 8;
        if compressed_len as u64 > max_payload {
            return Err(Error::Corruption(format!(
                "blob at slot ({lx}, {lz}) claims {compressed_len} bytes but only {max_payload} fit its {} segments",
                alloc.len
            )));
        }

        let mut compressed = vec![0u8; compressed_len as usize];
        self.file.read_exact(&mut compressed).map_err(|e| io_err(&self.path, e))?;

        let raw = zstd::decode_all(compressed.as_slice()).map_err(|e| io_err(&self.path, e))?;
        if raw.len() as u32 != src_len {
            return Err(Error::Corruption(format!(
                "blob at slot ({lx}, {lz}) decompressed to {} bytes, header says {src_len}",
                raw.len()
            )));
        }

        let doc = serialize::from_bytes(&raw)?;
        let chunk = serialize::from_document(&doc, cx, cz, min_y, max_y)?;
        Ok(Some(chunk))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush().map_err(|e| io_err(&self.path, e))?;
        self.file.sync_data().map_err(|e| io_err(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0.0.region.bin");
        std::mem::forget(dir);
        path
    }

    #[test]
    fn create_then_open_round_trips_header() {
        let path = tmp_path();
        {
            let mut region = IndexedStorageFile::create(&path, 1024, 4096).unwrap();
            region.flush().unwrap();
        }
        let region = IndexedStorageFile::open(&path).unwrap();
        assert_eq!(region.blob_count, 1024);
        assert_eq!(region.segment_size, 4096);
    }

    #[test]
    fn missing_chunk_reads_as_none() {
        let path = tmp_path();
        let mut region = IndexedStorageFile::create(&path, 1024, 4096).unwrap();
        assert!(region.read_chunk(0, 0, 0, 0, 0, 320).unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips_chunk() {
        let path = tmp_path();
        let mut region = IndexedStorageFile::create(&path, 1024, 4096).unwrap();

        let mut chunk = Chunk::new(3, 4, 0, 320);
        chunk.set_height(0, 0, 64).unwrap();
        chunk.set_block(0, 10, 0, "Rock_Stone").unwrap();

        region.write_chunk(3, 4, &chunk, 3, LightingMode::FullyLit).unwrap();
        let restored = region.read_chunk(3, 4, 3, 4, 0, 320).unwrap().unwrap();

        assert_eq!(restored.height(0, 0).unwrap(), 64);
        assert_eq!(restored.sections()[0].block_id(0, 10, 0), "Rock_Stone");
    }

    #[test]
    fn overwrite_frees_old_segments_before_reallocating() {
        let path = tmp_path();
        let mut region = IndexedStorageFile::create(&path, 1024, 4096).unwrap();

        for lz in 0..32u32 {
            for lx in 0..32u32 {
                let chunk = Chunk::new(lx as i32, lz as i32, 0, 320);
                region.write_chunk(lx, lz, &chunk, 3, LightingMode::FullyLit).unwrap();
            }
        }

        let mut big = Chunk::new(0, 0, 0, 320);
        for z in 0..32 {
            for x in 0..32 {
                for (i, y) in (0..320).step_by(32).enumerate() {
                    big.set_block(x, y, z, if (i + x as usize + z as usize) % 2 == 0 { "Rock_Stone" } else { "Soil_Grass" }).unwrap();
                }
            }
        }
        region.write_chunk(0, 0, &big, 3, LightingMode::FullyLit).unwrap();

        let restored = region.read_chunk(0, 0, 0, 0, 0, 320).unwrap().unwrap();
        assert_eq!(restored.sections()[0].block_id(0, 0, 0), "Rock_Stone");
    }

    #[test]
    fn reopened_file_still_reads_written_chunk() {
        let path = tmp_path();
        {
            let mut region = IndexedStorageFile::create(&path, 1024, 4096).unwrap();
            let mut chunk = Chunk::new(1, 1, 0, 320);
            chunk.set_height(5, 5, 70).unwrap();
            region.write_chunk(1, 1, &chunk, 3, LightingMode::FullyLit).unwrap();
            region.flush().unwrap();
        }
        let mut region = IndexedStorageFile::open(&path).unwrap();
        let restored = region.read_chunk(1, 1, 1, 1, 0, 320).unwrap().unwrap();
        assert_eq!(restored.height(5, 5).unwrap(), 70);
    }
}
