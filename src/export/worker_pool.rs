//! Fixed-size region worker pool and the throughput probe that sizes it
//! (`spec.md` §5).

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::error::{Error, Result};

const GIB: u64 = 1024 * 1024 * 1024;
const PROBE_BYTES: usize = 8 * 1024 * 1024;

/// `max(1, ⌊heap_max / 1.5 GiB⌋)`.
pub fn memory_cap(heap_max_bytes: u64) -> usize {
    let per_worker = GIB + GIB / 2;
    (heap_max_bytes / per_worker).max(1) as usize
}

/// Writes `PROBE_BYTES` into a throwaway file under `dir` and derives a
/// worker cap from the observed throughput: ≥300 MB/s → 4, ≥150 MB/s → 3,
/// else → 2 (`spec.md` §5).
pub fn probe_worker_cap(dir: &Path) -> Result<usize> {
    let path = dir.join(".throughput-probe.tmp");
    let buf = vec![0u8; PROBE_BYTES];

    let start = Instant::now();
    {
        let mut file = std::fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
        file.write_all(&buf).map_err(|e| Error::io(&path, e))?;
        file.sync_data().map_err(|e| Error::io(&path, e))?;
    }
    let elapsed = start.elapsed();
    let _ = std::fs::remove_file(&path);

    let mb_per_s = (PROBE_BYTES as f64 / (1024.0 * 1024.0)) / elapsed.as_secs_f64().max(1e-6);
    Ok(if mb_per_s >= 300.0 {
        4
    } else if mb_per_s >= 150.0 {
        3
    } else {
        2
    })
}

/// Derives the final worker cap for a run: the configured cap (or a freshly
/// probed one), bounded by the memory cap and by the region count, and
/// forced to 1 whenever any custom-object layer is present
/// (`spec.md` §5).
pub fn resolve_cap(
    configured_cap: Option<usize>,
    heap_max_bytes: u64,
    region_count: usize,
    has_custom_object_layers: bool,
    probe_dir: &Path,
) -> Result<usize> {
    if has_custom_object_layers {
        return Ok(1);
    }
    let throughput_cap = match configured_cap {
        Some(cap) => cap,
        None => probe_worker_cap(probe_dir)?,
    };
    Ok(throughput_cap.min(memory_cap(heap_max_bytes)).min(region_count.max(1)))
}

/// Builds a rayon thread pool sized to `cap`, used as the counting semaphore
/// that bounds concurrent in-flight regions (`spec.md` §5).
pub fn build_pool(cap: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(cap.max(1))
        .build()
        .map_err(|e| Error::Internal(format!("failed to build worker pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_cap_is_at_least_one() {
        assert_eq!(memory_cap(0), 1);
        assert_eq!(memory_cap(6 * GIB), 4);
    }

    #[test]
    fn custom_object_layers_force_single_worker() {
        let dir = tempfile::tempdir().unwrap();
        let cap = resolve_cap(Some(4), 8 * GIB, 10, true, dir.path()).unwrap();
        assert_eq!(cap, 1);
    }

    #[test]
    fn configured_cap_bounded_by_region_count() {
        let dir = tempfile::tempdir().unwrap();
        let cap = resolve_cap(Some(4), 8 * GIB, 2, false, dir.path()).unwrap();
        assert_eq!(cap, 2);
    }
}
