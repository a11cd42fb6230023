//! `Chunk` — a 32×32 horizontal slab spanning the full configured Y range
//! (`spec.md` §3, §4.2).

pub mod entity;
pub mod section;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::registry::{biome, environment};

pub use entity::{BlockHealthEntry, Entity, PrefabMarker, SpawnMarker};
pub use section::Section;

const COLUMNS: usize = 1024;

fn column_index(x: i32, z: i32) -> Result<usize> {
    if !(0..32).contains(&x) || !(0..32).contains(&z) {
        return Err(Error::OutOfRange(format!("column ({x}, {z}) outside [0, 32)²")));
    }
    Ok((z * 32 + x) as usize)
}

/// A 32×32 Hytale chunk: dense per-column metadata plus a stack of
/// [`Section`]s covering `[min_y, max_y)`.
pub struct Chunk {
    pub cx: i32,
    pub cz: i32,
    pub min_y: i32,
    pub max_y: i32,
    sections: Vec<Section>,
    heightmap: [u16; COLUMNS],
    tint: [u32; COLUMNS],
    environment: Vec<String>,
    biome_name: Vec<String>,
    water_tint_override: Vec<Option<String>>,
    spawn_density_override: Vec<Option<f32>>,
    spawn_tag: Vec<Option<String>>,
    block_health: HashMap<(i32, i32, i32), BlockHealthEntry>,
    entities: Vec<Entity>,
    prefab_markers: Vec<PrefabMarker>,
}

impl Chunk {
    /// A freshly allocated chunk: all `Empty`, heightmap 0, tint 0,
    /// environment/biome at their registry defaults (`spec.md` §3 Lifecycle).
    pub fn new(cx: i32, cz: i32, min_y: i32, max_y: i32) -> Self {
        debug_assert_eq!((max_y - min_y) % 32, 0, "chunk height must be a multiple of 32");
        let section_count = ((max_y - min_y) / 32) as usize;
        Chunk {
            cx,
            cz,
            min_y,
            max_y,
            sections: (0..section_count).map(|_| Section::new()).collect(),
            heightmap: [0; COLUMNS],
            tint: [0; COLUMNS],
            environment: vec![environment::DEFAULT.to_string(); COLUMNS],
            biome_name: vec![biome::FALLBACK.to_string(); COLUMNS],
            water_tint_override: vec![None; COLUMNS],
            spawn_density_override: vec![None; COLUMNS],
            spawn_tag: vec![None; COLUMNS],
            block_health: HashMap::new(),
            entities: Vec::new(),
            prefab_markers: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Swaps in a freshly decoded section stack (`spec.md` §4.5 `read_chunk`).
    /// Caller must supply exactly as many sections as `sections().len()`.
    pub(crate) fn replace_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }

    fn section_for_y(&self, y: i32) -> Result<(usize, i32)> {
        if !(self.min_y..self.max_y).contains(&y) {
            return Err(Error::OutOfRange(format!(
                "y {y} outside [{}, {})",
                self.min_y, self.max_y
            )));
        }
        let offset = y - self.min_y;
        Ok((offset.div_euclid(32) as usize, offset.rem_euclid(32)))
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block_id: &str) -> Result<()> {
        column_index(x, z)?;
        let (section, local_y) = self.section_for_y(y)?;
        self.sections[section].set_block(x, local_y, z, block_id)
    }

    /// Absolute-coordinate block read, the counterpart to [`Chunk::set_block`]
    /// used by [`crate::editor::ChunkWorld`] views over a buffered region.
    pub fn block_id(&self, x: i32, y: i32, z: i32) -> Result<&'static str> {
        column_index(x, z)?;
        let (section, local_y) = self.section_for_y(y)?;
        Ok(self.sections[section].block_id(x, local_y, z))
    }

    pub fn set_fluid(&mut self, x: i32, y: i32, z: i32, fluid_id: &str, level: u8) -> Result<()> {
        column_index(x, z)?;
        let (section, local_y) = self.section_for_y(y)?;
        self.sections[section].set_fluid(x, local_y, z, fluid_id, level)
    }

    pub fn clear_fluid(&mut self, x: i32, y: i32, z: i32) -> Result<()> {
        column_index(x, z)?;
        let (section, local_y) = self.section_for_y(y)?;
        self.sections[section].clear_fluid(x, local_y, z)
    }

    pub fn set_rotation(&mut self, x: i32, y: i32, z: i32, rotation: u8) -> Result<()> {
        column_index(x, z)?;
        let (section, local_y) = self.section_for_y(y)?;
        self.sections[section].set_rotation(x, local_y, z, rotation)
    }

    /// `heightmap[i]` must lie within `[min_y, max_y)` or be the sentinel `0`
    /// (`spec.md` §3 Invariants).
    pub fn set_height(&mut self, x: i32, z: i32, h: i32) -> Result<()> {
        let i = column_index(x, z)?;
        if h != 0 && !(self.min_y..self.max_y).contains(&h) {
            return Err(Error::OutOfRange(format!("heightmap value {h} outside [{}, {})", self.min_y, self.max_y)));
        }
        self.heightmap[i] = h as u16;
        Ok(())
    }

    pub fn height(&self, x: i32, z: i32) -> Result<i32> {
        Ok(self.heightmap[column_index(x, z)?] as i32)
    }

    pub fn set_tint(&mut self, x: i32, z: i32, argb: u32) -> Result<()> {
        let i = column_index(x, z)?;
        self.tint[i] = argb;
        Ok(())
    }

    pub fn tint(&self, x: i32, z: i32) -> Result<u32> {
        Ok(self.tint[column_index(x, z)?])
    }

    pub fn set_environment(&mut self, x: i32, z: i32, name: impl Into<String>) -> Result<()> {
        let i = column_index(x, z)?;
        self.environment[i] = name.into();
        Ok(())
    }

    pub fn environment(&self, x: i32, z: i32) -> Result<&str> {
        Ok(&self.environment[column_index(x, z)?])
    }

    pub fn set_biome_name(&mut self, x: i32, z: i32, name: impl Into<String>) -> Result<()> {
        let i = column_index(x, z)?;
        self.biome_name[i] = name.into();
        Ok(())
    }

    pub fn biome_name(&self, x: i32, z: i32) -> Result<&str> {
        Ok(&self.biome_name[column_index(x, z)?])
    }

    pub fn set_water_tint_override(&mut self, x: i32, z: i32, hex: Option<String>) -> Result<()> {
        let i = column_index(x, z)?;
        self.water_tint_override[i] = hex;
        Ok(())
    }

    pub fn water_tint_override(&self, x: i32, z: i32) -> Result<Option<&str>> {
        Ok(self.water_tint_override[column_index(x, z)?].as_deref())
    }

    pub fn set_spawn_density_override(&mut self, x: i32, z: i32, density: Option<f32>) -> Result<()> {
        let i = column_index(x, z)?;
        self.spawn_density_override[i] = density;
        Ok(())
    }

    pub fn spawn_density_override(&self, x: i32, z: i32) -> Result<Option<f32>> {
        Ok(self.spawn_density_override[column_index(x, z)?])
    }

    pub fn set_spawn_tag(&mut self, x: i32, z: i32, tag: Option<String>) -> Result<()> {
        let i = column_index(x, z)?;
        self.spawn_tag[i] = tag;
        Ok(())
    }

    pub fn spawn_tag(&self, x: i32, z: i32) -> Result<Option<&str>> {
        Ok(self.spawn_tag[column_index(x, z)?].as_deref())
    }

    pub fn upsert_block_health(&mut self, x: i32, y: i32, z: i32, health: f32, last_damage_time: i64) {
        self.block_health.insert((x, y, z), BlockHealthEntry { health, last_damage_time });
    }

    pub fn block_health(&self) -> impl Iterator<Item = (&(i32, i32, i32), &BlockHealthEntry)> {
        self.block_health.iter()
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn add_prefab_marker(&mut self, marker: PrefabMarker) {
        self.prefab_markers.push(marker);
    }

    pub fn prefab_markers(&self) -> &[PrefabMarker] {
        &self.prefab_markers
    }

    /// Whether this chunk carries anything beyond the base block/fluid/biome
    /// layout: non-default water tints, spawn overrides, or prefab markers
    /// (`spec.md` §4.4 `WorldPainterMetadata`, emitted "only if any custom
    /// data exists").
    pub fn has_painter_metadata(&self) -> bool {
        self.water_tint_override.iter().any(Option::is_some)
            || self.spawn_density_override.iter().any(Option::is_some)
            || self.spawn_tag.iter().any(Option::is_some)
            || !self.prefab_markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_chunk_has_default_metadata() {
        let chunk = Chunk::new(0, 0, 0, 320);
        assert_eq!(chunk.height(0, 0).unwrap(), 0);
        assert_eq!(chunk.tint(0, 0).unwrap(), 0);
        assert_eq!(chunk.environment(0, 0).unwrap(), environment::DEFAULT);
        assert_eq!(chunk.sections().len(), 10);
    }

    #[test]
    fn set_block_routes_to_correct_section() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.set_block(5, 40, 5, "Rock_Stone").unwrap();
        assert_eq!(chunk.sections()[1].block_id(5, 8, 5), "Rock_Stone");
    }

    #[test]
    fn height_out_of_range_errors() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        assert!(chunk.set_height(0, 0, 500).is_err());
        assert!(chunk.set_height(0, 0, 0).is_ok());
    }

    #[test]
    fn painter_metadata_absent_by_default() {
        let chunk = Chunk::new(0, 0, 0, 320);
        assert!(!chunk.has_painter_metadata());
    }

    #[test]
    fn painter_metadata_present_after_prefab_marker() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.add_prefab_marker(PrefabMarker {
            x: 1,
            y: 65,
            z: 1,
            category: "Decoration".to_string(),
            path: "prefabs/tree.hpfb".to_string(),
        });
        assert!(chunk.has_painter_metadata());
    }
}
