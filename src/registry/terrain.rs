//! Terrain table (`spec.md` §4.1, §4.6).
//!
//! The original tool carries two divergent terrain record shapes: a compact
//! single-block form, and a larger mixed/blob/layered form (`Row[]` + `Mode`).
//! Which one is canonical for persisted documents is left ambiguous by the
//! spec (§9 Open Questions). This crate settles on the compact form — see
//! `DESIGN.md` for the migration note — and does not attempt to also parse
//! the layered form.

use crate::rand::terrain_sample;
use crate::registry::block;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainDef {
    pub name: &'static str,
    /// Block placed at the surface (depth 0).
    pub surface_block: &'static str,
    /// Block placed a few layers below the surface.
    pub subsurface_block: &'static str,
    /// Block placed deeper still.
    pub deep_block: &'static str,
    /// Explicit biome for this terrain, or `None` to defer to `biome::AUTOMATIC`.
    pub biome_id: Option<u8>,
    /// Editor-facing display colour (RGB), unrelated to in-game tint.
    pub colour: Option<u32>,
}

pub static TERRAINS: &[TerrainDef] = &[
    TerrainDef {
        name: "Grass",
        surface_block: "Soil_Grass",
        subsurface_block: "Soil_Dirt",
        deep_block: "Rock_Stone",
        biome_id: None,
        colour: Some(0x5B9E28),
    },
    TerrainDef {
        name: "Desert Sand",
        surface_block: "Soil_Sand",
        subsurface_block: "Soil_Sand",
        deep_block: "Rock_Stone",
        biome_id: Some(2),
        colour: Some(0xD8C27A),
    },
    TerrainDef {
        name: "Mountain Rock",
        surface_block: "Rock_Granite",
        subsurface_block: "Rock_Stone",
        deep_block: "Rock_Basalt",
        biome_id: Some(3),
        colour: Some(0x8C8C8C),
    },
    TerrainDef {
        name: "Gravel Bank",
        surface_block: "Soil_Gravel",
        subsurface_block: "Soil_Gravel",
        deep_block: "Rock_Stone",
        biome_id: None,
        colour: Some(0x9A9A8F),
    },
    TerrainDef {
        name: "Bare Dirt",
        surface_block: "Soil_Dirt",
        subsurface_block: "Soil_Dirt",
        deep_block: "Rock_Stone",
        biome_id: None,
        colour: Some(0x6B4A2C),
    },
];

pub fn by_index(index: usize) -> Option<&'static TerrainDef> {
    TERRAINS.get(index)
}

pub fn by_name(name: &str) -> Option<&'static TerrainDef> {
    TERRAINS.iter().find(|t| t.name == name)
}

/// Resolves the block for one column voxel (`spec.md` §4.6 step 4):
/// "ask the resolved terrain for the block at `(seed, world_x, world_z, depth)`".
///
/// `depth` is `h - y`: 0 at the surface, increasing downward. A thin
/// transition band near the surface occasionally substitutes the subsurface
/// block, giving columns an irregular soil/rock boundary instead of a flat one.
pub fn block_at(terrain: &TerrainDef, seed: i64, world_x: i32, world_z: i32, depth: i32) -> &'static str {
    if depth <= 0 {
        terrain.surface_block
    } else if depth <= 3 {
        if terrain_sample(seed, world_x, depth, world_z, 4) == 0 {
            terrain.deep_block
        } else {
            terrain.subsurface_block
        }
    } else {
        terrain.deep_block
    }
}

/// Whether `block_at` would return a fluid id for this depth (§4.6 step 4).
pub fn is_fluid_at(terrain: &TerrainDef, seed: i64, world_x: i32, world_z: i32, depth: i32) -> bool {
    block::is_fluid_id(block_at(terrain, seed, world_x, world_z, depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_depth_zero() {
        let grass = by_name("Grass").unwrap();
        assert_eq!(block_at(grass, 0, 0, 0, 0), "Soil_Grass");
    }

    #[test]
    fn deep_voxels_use_deep_block() {
        let grass = by_name("Grass").unwrap();
        assert_eq!(block_at(grass, 0, 0, 0, 50), "Rock_Stone");
    }

    #[test]
    fn index_lookup_matches_name_lookup() {
        assert_eq!(by_index(0).unwrap().name, "Grass");
    }
}
