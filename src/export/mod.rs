//! Export driver (`spec.md` §4.6, §5): ties region selection, per-column
//! population, region I/O, and the world descriptor together.

pub mod coordinate;
pub mod descriptor;
pub mod population;
pub mod worker_pool;

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chunk::{Chunk, Entity};
use crate::config::ExportConfig;
use crate::editor::{ChunkWorld, Dimension, DimensionAnchor, Tile, World};
use crate::error::{Error, Result};
use crate::geometry::{RegionIndex, Vec2};
use crate::region::IndexedStorageFile;

use coordinate::{block_offset, owning_tile, regions_for_tiles, CHUNK_SIZE, REGION_CHUNKS};
use population::{emit_spawn_if_present, populate_chunk, ChunkContext};

/// Snapshot of the monotonic counters an export run accumulates (`spec.md` §5).
#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub chunks_written: u64,
    pub regions_written: u64,
    pub surface_area: u64,
}

/// Mutex-guarded monotonic counters, added to from any worker (`spec.md` §5
/// "Stats accumulator: accessed under a mutex; only monotonic counters are added").
#[derive(Default)]
struct StatsAccumulator {
    chunks_written: AtomicU64,
    regions_written: AtomicU64,
    surface_area: AtomicU64,
}

impl StatsAccumulator {
    fn snapshot(&self) -> Stats {
        Stats {
            chunks_written: self.chunks_written.load(Ordering::Relaxed),
            regions_written: self.regions_written.load(Ordering::Relaxed),
            surface_area: self.surface_area.load(Ordering::Relaxed),
        }
    }
}

/// Cooperative cancellation, checked at region boundaries and every 32nd
/// chunk within a region (`spec.md` §5).
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives a full world export for one [`World`] implementation (`spec.md` §4.6).
pub struct ExportDriver<'a, W: World> {
    world: &'a W,
    config: ExportConfig,
    cancel: CancellationToken,
}

impl<'a, W> ExportDriver<'a, W>
where
    W: World + Sync,
    W::Dimension: Sync,
    <W::Dimension as Dimension>::Tile: Sync,
{
    pub fn new(world: &'a W, config: ExportConfig) -> Self {
        Self { world, config, cancel: CancellationToken::new() }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Exports every dimension the world exposes into `world_dir`, then
    /// writes the world descriptor (`spec.md` §4.6 "World descriptor").
    pub fn run(&self, world_dir: &Path) -> Result<Stats> {
        let chunks_dir = world_dir.join("chunks");
        std::fs::create_dir_all(&chunks_dir).map_err(|e| Error::io(&chunks_dir, e))?;

        let stats = StatsAccumulator::default();
        let abort: Arc<Mutex<Option<Error>>> = Arc::new(Mutex::new(None));

        let mut surface_offset = Vec2(0, 0);
        let mut seed = 0i64;

        if let Some(dim) = self.world.dimension(DimensionAnchor::Surface) {
            seed = dim.minecraft_seed();
            surface_offset = self.export_dimension(dim, None, &chunks_dir, &stats, &abort)?;
        }
        if let Some(dim) = self.world.dimension(DimensionAnchor::Ceiling) {
            let ceiling_height = dim.ceiling_height().or(self.config.ceiling_height);
            self.export_dimension(dim, ceiling_height, &chunks_dir, &stats, &abort)?;
        }

        if let Some(err) = abort.lock().unwrap().take() {
            return Err(err);
        }

        let spawn_point = match self.world.spawn_point() {
            Some((sx, sz)) => {
                let tx = sx + surface_offset.0;
                let tz = sz + surface_offset.1;
                let h = self.spawn_height(tx, tz);
                (tx, h + 1, tz)
            }
            None => (0, 64, 0),
        };

        let descriptor = descriptor::WorldDescriptor {
            uuid: self
                .world
                .attribute("uuid")
                .and_then(|raw| Uuid::parse_str(&raw).ok())
                .unwrap_or_else(Uuid::new_v4),
            seed,
            game_type: self.world.game_type(),
            spawn_point,
        };
        descriptor::write_config_json(world_dir, &descriptor)?;
        descriptor::write_resource_files(world_dir)?;

        let snapshot = stats.snapshot();
        info!(chunks = snapshot.chunks_written, regions = snapshot.regions_written, "export finished");
        Ok(snapshot)
    }

    /// Best-effort height lookup for the spawn column, used only to place the
    /// descriptor's `SpawnPoint.y` (`spec.md` §4.6 scenario 5).
    fn spawn_height(&self, world_x: i32, world_z: i32) -> i32 {
        let Some(dim) = self.world.dimension(DimensionAnchor::Surface) else { return 63 };
        let offset = block_offset(dim.tile_coords());
        let hcx = world_x.div_euclid(CHUNK_SIZE);
        let hcz = world_z.div_euclid(CHUNK_SIZE);
        let ((tx, tz), (local_x, local_z)) = owning_tile(hcx, hcz, offset);
        let col_x = world_x - hcx * CHUNK_SIZE;
        let col_z = world_z - hcz * CHUNK_SIZE;
        dim.get_tile(tx, tz).map(|tile| tile.get_height(local_x + col_x, local_z + col_z)).unwrap_or(63)
    }

    /// Exports one dimension's tiles, returning the `block_offset` used to
    /// center it (`spec.md` §4.6 "Coordinate mapping").
    fn export_dimension(
        &self,
        dim: &W::Dimension,
        ceiling_height: Option<i32>,
        chunks_dir: &Path,
        stats: &StatsAccumulator,
        abort: &Arc<Mutex<Option<Error>>>,
    ) -> Result<Vec2> {
        let tiles = dim.tile_coords();
        if tiles.is_empty() {
            return Ok(Vec2(0, 0));
        }
        let offset = block_offset(tiles.iter().copied());
        let regions: Vec<RegionIndex> = regions_for_tiles(tiles.iter().copied(), offset).into_iter().collect();
        if regions.is_empty() {
            return Ok(offset);
        }

        let has_custom_objects = dim.custom_object_layer_count() > 0;
        let cap = worker_pool::resolve_cap(self.config.worker_cap, self.config.heap_max_bytes, regions.len(), has_custom_objects, chunks_dir)?;
        let pool = worker_pool::build_pool(cap)?;

        pool.install(|| {
            regions.par_iter().for_each(|&region| {
                if self.cancel.is_cancelled() || abort.lock().unwrap().is_some() {
                    return;
                }
                if let Err(err) = self.export_region(dim, region, offset, ceiling_height, chunks_dir, stats) {
                    let mut guard = abort.lock().unwrap();
                    if guard.is_none() {
                        *guard = Some(err);
                    }
                }
            });
        });

        Ok(offset)
    }

    fn export_region(
        &self,
        dim: &W::Dimension,
        region: RegionIndex,
        offset: Vec2,
        ceiling_height: Option<i32>,
        chunks_dir: &Path,
        stats: &StatsAccumulator,
    ) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let path = chunks_dir.join(format!("{}.{}.region.bin", region.0, region.1));
        let mut file = IndexedStorageFile::create(&path, self.config.blob_count, self.config.segment_size)?;
        let min_y = dim.min_height();
        let max_y = dim.max_height();

        let custom_layers = dim.custom_object_layers();
        let mut populated_any = false;
        let mut checked = 0u32;

        if custom_layers.is_empty() {
            // No collaborator needs the whole-region view, so chunks are
            // written to the region file as soon as each is populated
            // instead of buffered (`spec.md` §5: bounds memory).
            for lz in 0..REGION_CHUNKS {
                for lx in 0..REGION_CHUNKS {
                    checked += 1;
                    if checked % 32 == 0 && self.cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }

                    let hcx = region.0 * REGION_CHUNKS + lx;
                    let hcz = region.1 * REGION_CHUNKS + lz;
                    let ((tx, tz), (local_x, local_z)) = owning_tile(hcx, hcz, offset);
                    let Some(tile) = dim.get_tile(tx, tz) else { continue };

                    let chunk = self.populate_one_chunk(dim, tile, hcx, hcz, local_x, local_z, offset, ceiling_height, min_y, max_y)?;

                    file.write_chunk(lx as u32, lz as u32, &chunk, self.config.zstd_level, self.config.lighting)?;
                    stats.chunks_written.fetch_add(1, Ordering::Relaxed);
                    stats.surface_area.fetch_add(1024, Ordering::Relaxed);
                    populated_any = true;
                }
            }
        } else {
            let mut chunks: HashMap<(i32, i32), Chunk> = HashMap::new();

            for lz in 0..REGION_CHUNKS {
                for lx in 0..REGION_CHUNKS {
                    checked += 1;
                    if checked % 32 == 0 && self.cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }

                    let hcx = region.0 * REGION_CHUNKS + lx;
                    let hcz = region.1 * REGION_CHUNKS + lz;
                    let ((tx, tz), (local_x, local_z)) = owning_tile(hcx, hcz, offset);
                    let Some(tile) = dim.get_tile(tx, tz) else { continue };

                    let chunk = self.populate_one_chunk(dim, tile, hcx, hcz, local_x, local_z, offset, ceiling_height, min_y, max_y)?;

                    populated_any = true;
                    chunks.insert((hcx, hcz), chunk);
                }
            }

            if !populated_any {
                return Ok(());
            }

            self.run_custom_object_layers(dim, region, &custom_layers, &mut chunks);

            for lz in 0..REGION_CHUNKS {
                for lx in 0..REGION_CHUNKS {
                    let hcx = region.0 * REGION_CHUNKS + lx;
                    let hcz = region.1 * REGION_CHUNKS + lz;
                    if let Some(chunk) = chunks.remove(&(hcx, hcz)) {
                        file.write_chunk(lx as u32, lz as u32, &chunk, self.config.zstd_level, self.config.lighting)?;
                        stats.chunks_written.fetch_add(1, Ordering::Relaxed);
                        stats.surface_area.fetch_add(1024, Ordering::Relaxed);
                    }
                }
            }
        }

        if !populated_any {
            return Ok(());
        }

        file.flush()?;
        stats.regions_written.fetch_add(1, Ordering::Relaxed);
        debug!(rx = region.0, rz = region.1, "region export complete");
        Ok(())
    }

    /// Populates one chunk: base terrain (`population::populate_chunk`),
    /// optional ceiling pass, and spawn marker emission.
    #[allow(clippy::too_many_arguments)]
    fn populate_one_chunk(
        &self,
        dim: &W::Dimension,
        tile: &<W::Dimension as Dimension>::Tile,
        hcx: i32,
        hcz: i32,
        local_x: i32,
        local_z: i32,
        offset: Vec2,
        ceiling_height: Option<i32>,
        min_y: i32,
        max_y: i32,
    ) -> Result<Chunk> {
        let mut chunk = Chunk::new(hcx, hcz, min_y, max_y);
        let world_origin = (hcx * CHUNK_SIZE, hcz * CHUNK_SIZE);
        let ctx = ChunkContext {
            tile,
            tile_local_origin: (local_x, local_z),
            seed: dim.minecraft_seed(),
            world_origin,
            min_y,
            max_y,
        };
        populate_chunk(&mut chunk, &ctx)?;

        if let Some(ceiling) = ceiling_height {
            populate_ceiling_pass(&mut chunk, tile, (local_x, local_z), ceiling, min_y)?;
        }

        if let Some((sx, sz)) = self.world.spawn_point() {
            let translated = (sx + offset.0, sz + offset.1);
            emit_spawn_if_present(&mut chunk, Some(translated), world_origin)?;
        }

        Ok(chunk)
    }

    /// Invokes every custom-object layer over this region's rectangle,
    /// discarding out-of-region fixups with a log note (`spec.md` §6, §9).
    fn run_custom_object_layers(
        &self,
        dim: &W::Dimension,
        region: RegionIndex,
        layers: &[&dyn crate::editor::PrefabEditor],
        chunks: &mut HashMap<(i32, i32), Chunk>,
    ) {
        let bounds = crate::geometry::Rect {
            min: crate::geometry::Column(region.0 * REGION_CHUNKS, region.1 * REGION_CHUNKS),
            max: crate::geometry::Column((region.0 + 1) * REGION_CHUNKS - 1, (region.1 + 1) * REGION_CHUNKS - 1),
        };
        let area = bounds;
        let (min_y, max_y) = (dim.min_height(), dim.max_height());

        for layer in layers {
            let mut view = RegionChunkWorld { chunks: &mut *chunks, min_y, max_y };
            let fixups = layer.add_features(area, bounds, &mut view);
            for fixup in fixups {
                let hcx = fixup.x.div_euclid(CHUNK_SIZE);
                let hcz = fixup.z.div_euclid(CHUNK_SIZE);
                if hcx < bounds.min.0 || hcx > bounds.max.0 || hcz < bounds.min.1 || hcz > bounds.max.1 {
                    warn!(note = %fixup.note, x = fixup.x, y = fixup.y, z = fixup.z, "discarding out-of-region fixup");
                }
            }
        }
    }
}

/// Hangs blocks downward from `ceiling_height - 1` for the ceiling tile's
/// painted depth at every column of the chunk, leaving the interior gap as
/// `Empty` (`spec.md` §4.6 "Ceiling dimension").
fn populate_ceiling_pass<T: Tile>(chunk: &mut Chunk, tile: &T, tile_local_origin: (i32, i32), ceiling_height: i32, min_y: i32) -> Result<()> {
    for z in 0..32i32 {
        for x in 0..32i32 {
            let (tlx, tlz) = (tile_local_origin.0 + x, tile_local_origin.1 + z);
            let depth = tile.get_height(tlx, tlz).max(0);
            chunk.set_block(x, ceiling_height - 1, z, "Bedrock")?;
            for i in 1..=depth {
                let y = ceiling_height - 1 - i;
                if y < min_y {
                    break;
                }
                chunk.set_block(x, y, z, "Rock_Stone")?;
            }
        }
    }
    Ok(())
}

/// Absolute-coordinate view over a region's in-memory chunk map, handed to
/// [`crate::editor::PrefabEditor::add_features`] (`spec.md` §9 "Custom-object
/// placement").
struct RegionChunkWorld<'a> {
    chunks: &'a mut HashMap<(i32, i32), Chunk>,
    min_y: i32,
    max_y: i32,
}

impl RegionChunkWorld<'_> {
    fn locate(x: i32, z: i32) -> ((i32, i32), (i32, i32)) {
        let cx = x.div_euclid(CHUNK_SIZE);
        let cz = z.div_euclid(CHUNK_SIZE);
        ((cx, cz), (x.rem_euclid(CHUNK_SIZE), z.rem_euclid(CHUNK_SIZE)))
    }
}

impl ChunkWorld for RegionChunkWorld<'_> {
    fn read_block(&self, x: i32, y: i32, z: i32) -> &'static str {
        let (coord, local) = Self::locate(x, z);
        self.chunks.get(&coord).and_then(|c| c.block_id(local.0, y, local.1).ok()).unwrap_or("Empty")
    }

    fn write_block(&mut self, x: i32, y: i32, z: i32, block_id: &str) {
        if !(self.min_y..self.max_y).contains(&y) {
            return;
        }
        let (coord, local) = Self::locate(x, z);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            let _ = chunk.set_block(local.0, y, local.1, block_id);
        }
    }

    fn add_entity(&mut self, x: i32, y: i32, z: i32, type_id: &str) {
        let Some(def) = crate::registry::entity_type::by_id(type_id) else {
            warn!(type_id, "custom-object layer referenced unknown entity type");
            return;
        };
        let (coord, _) = Self::locate(x, z);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.add_entity(Entity {
                uuid: Uuid::new_v4(),
                type_id: def.id,
                position: (x as f64 + 0.5, y as f64, z as f64 + 0.5),
                rotation: (0.0, 0.0, 0.0),
                spawn_marker: None,
            });
        }
    }
}
