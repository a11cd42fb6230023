//! Export-wide configuration, set once before worker start (see `spec.md` §5).

/// How per-section light octrees are computed (`spec.md` §4.6, §9 Open
/// Questions). `FullyLit` matches the observed behavior of the source tool;
/// `HeightmapAware` is the guarded stricter mode that derives per-section
/// light from the heightmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingMode {
    #[default]
    FullyLit,
    HeightmapAware,
}

/// Tunables for an export run. Values mirror the defaults named in the spec.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Hard cap on concurrent region workers. `None` lets the driver probe
    /// write throughput and derive a cap itself (see `export::worker_pool`).
    pub worker_cap: Option<usize>,
    /// Zstd compression level used for chunk blobs.
    pub zstd_level: i32,
    /// Bytes per region-file segment.
    pub segment_size: u32,
    /// Chunks per region file (32 × 32).
    pub blob_count: u32,
    /// Ceiling-dimension height, if the editor world exposes one.
    pub ceiling_height: Option<i32>,
    /// Section light-octree strategy (`spec.md` §4.6).
    pub lighting: LightingMode,
    /// Ceiling used by `worker_pool::memory_cap` when `worker_cap` is `None`
    /// (`spec.md` §5: `memory_cap = max(1, ⌊heap_max / 1.5 GiB⌋)`). No crate
    /// in this stack introspects process memory, so this is a configured
    /// value rather than a measured one; see `DESIGN.md`.
    pub heap_max_bytes: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            worker_cap: None,
            zstd_level: 3,
            segment_size: 4096,
            blob_count: 1024,
            ceiling_height: None,
            lighting: LightingMode::default(),
            heap_max_bytes: 4 * 1024 * 1024 * 1024,
        }
    }
}
