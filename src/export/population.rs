//! Per-column chunk population (`spec.md` §4.6).

use crate::chunk::{Chunk, Entity};
use crate::editor::{Layer, Tile};
use crate::error::Result;
use crate::registry::{biome, environment, terrain};

/// Inputs shared by every column of one chunk, resolved once per chunk
/// rather than re-derived per voxel.
pub struct ChunkContext<'a, T: Tile> {
    pub tile: &'a T,
    /// Chunk's block-local origin within the owning tile, `[0, 128)`.
    pub tile_local_origin: (i32, i32),
    pub seed: i64,
    pub world_origin: (i32, i32),
    pub min_y: i32,
    pub max_y: i32,
}

/// Populates every column of `chunk` per `spec.md` §4.6 steps 1-10.
pub fn populate_chunk<T: Tile>(chunk: &mut Chunk, ctx: &ChunkContext<T>) -> Result<()> {
    for z in 0..32i32 {
        for x in 0..32i32 {
            populate_column(chunk, x, z, ctx)?;
        }
    }
    Ok(())
}

fn populate_column<T: Tile>(chunk: &mut Chunk, x: i32, z: i32, ctx: &ChunkContext<T>) -> Result<()> {
    let (tlx, tlz) = (ctx.tile_local_origin.0 + x, ctx.tile_local_origin.1 + z);
    let world_x = ctx.world_origin.0 + x;
    let world_z = ctx.world_origin.1 + z;

    // 1. Read painted layers.
    let h = ctx.tile.get_height(tlx, tlz);
    let wl = ctx.tile.get_water_level(tlx, tlz);
    let terrain_index = ctx.tile.get_terrain(tlx, tlz);
    let painted_biome = ctx.tile.get_layer_value(Layer::Biome, tlx, tlz) as u8;
    let painted_fluid = ctx.tile.get_layer_value(Layer::Fluid, tlx, tlz);
    let painted_env = ctx.tile.get_layer_value(Layer::Environment, tlx, tlz);
    let painted_entity = ctx.tile.get_layer_value(Layer::Entity, tlx, tlz);
    let painted_prefab = ctx.tile.get_layer_value(Layer::Prefab, tlx, tlz);
    let flood_with_lava = ctx.tile.get_bit_layer(Layer::FloodWithLava, tlx, tlz);

    let terrain_def = terrain::by_index(terrain_index).unwrap_or(&terrain::TERRAINS[0]);

    // 2. Resolve biome; store biome name, environment id, and tint.
    let biome_def = if painted_biome != biome::AUTOMATIC {
        biome::by_id(painted_biome).unwrap_or_else(|| biome::from_terrain_name(terrain_def.name))
    } else {
        terrain_def
            .biome_id
            .and_then(biome::by_id)
            .unwrap_or_else(|| biome::from_terrain_name(terrain_def.name))
    };
    chunk.set_biome_name(x, z, biome_def.name)?;
    let mut env_name = environment::by_id(biome_def.environment_id).map(|e| e.name).unwrap_or(environment::DEFAULT);
    chunk.set_environment(x, z, env_name)?;
    chunk.set_tint(x, z, biome_def.tint_argb)?;

    // 3. Bedrock at the chunk's lowest block.
    chunk.set_block(x, ctx.min_y, z, "Bedrock")?;

    // 4. Terrain fill from 1..=h. `Chunk::set_block` routes fluid ids to
    // `set_fluid` at their default level on its own.
    for y in (ctx.min_y + 1)..=h {
        let depth = h - y;
        let block_id = terrain::block_at(terrain_def, ctx.seed, world_x, world_z, depth);
        chunk.set_block(x, y, z, block_id)?;
    }

    // 5. Fluid-layer override determines lava vs. water for the flood pass.
    let mut water_tint_override: Option<String> = None;
    let is_lava = if painted_fluid != 0 {
        if let Some(hex) = environment::by_id(biome_def.environment_id).and_then(|e| e.water_tint_hex) {
            water_tint_override = Some(hex.to_string());
        }
        // Open question: `spec.md` only says the fluid layer "overrides still vs.
        // flowing," not what its paint values mean. `0` = unpainted is the only
        // value the spec grounds; `2` = lava is this crate's own resolution,
        // chosen so the layer can still express lava without a second bit layer.
        painted_fluid == 2
    } else {
        flood_with_lava
    };

    // 6. Flood from (h, wl].
    if wl > h {
        let fluid_id = if is_lava { "Lava_Source" } else { "Water_Source" };
        for y in (h + 1)..=wl {
            chunk.set_fluid(x, y, z, fluid_id, 1)?;
        }
    }

    // 7. Painted environment override.
    if painted_env != 0 {
        if let Some(env) = environment::by_id(painted_env as u32) {
            env_name = env.name;
            chunk.set_environment(x, z, env_name)?;
            if water_tint_override.is_none() {
                water_tint_override = env.water_tint_hex.map(str::to_string);
            }
        }
    }
    chunk.set_water_tint_override(x, z, water_tint_override)?;

    // 8. Painted entity spawn density/tag. Open question: the spec describes
    // this layer only as "entity spawn control," with no wire encoding. This
    // crate resolves the paint value as a percent (0-100 -> 0.0-1.0 density)
    // and derives the spawn tag name from it; there is no original_source/ or
    // spec.md text establishing either convention.
    if painted_entity > 0 {
        chunk.set_spawn_density_override(x, z, Some(painted_entity as f32 / 100.0))?;
        chunk.set_spawn_tag(x, z, Some(format!("spawn_zone_{painted_entity}")))?;
    }

    // 9. Painted prefab marker.
    if painted_prefab > 0 {
        chunk.add_prefab_marker(crate::chunk::PrefabMarker {
            x,
            y: h + 1,
            z,
            category: "Decoration".to_string(),
            path: format!("prefabs/{painted_prefab}.hpfb"),
        });
    }

    // 10. Heightmap.
    chunk.set_height(x, z, h)?;

    Ok(())
}

/// Appends a `PlayerSpawn` marker if `spawn` (in world/centered coordinates)
/// falls inside this chunk (`spec.md` §4.6 "Entity emission").
pub fn emit_spawn_if_present(chunk: &mut Chunk, spawn: Option<(i32, i32)>, world_origin: (i32, i32)) -> Result<()> {
    let Some((sx, sz)) = spawn else { return Ok(()) };
    let local_x = sx - world_origin.0;
    let local_z = sz - world_origin.1;
    if !(0..32).contains(&local_x) || !(0..32).contains(&local_z) {
        return Ok(());
    }
    let h = chunk.height(local_x, local_z)?;
    chunk.add_entity(Entity::player_spawn(sx, h, sz));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatTile {
        height: i32,
    }

    impl Tile for FlatTile {
        fn get_height(&self, _x: i32, _z: i32) -> i32 {
            self.height
        }
        fn get_water_level(&self, _x: i32, _z: i32) -> i32 {
            0
        }
        fn get_terrain(&self, _x: i32, _z: i32) -> usize {
            0
        }
        fn get_layer_value(&self, _layer: Layer, _x: i32, _z: i32) -> i32 {
            0
        }
        fn get_bit_layer(&self, _layer: Layer, _x: i32, _z: i32) -> bool {
            false
        }
    }

    #[test]
    fn scenario_2_uniform_grass_tile() {
        let tile = FlatTile { height: 64 };
        let ctx = ChunkContext { tile: &tile, tile_local_origin: (0, 0), seed: 0, world_origin: (0, 0), min_y: 0, max_y: 320 };
        let mut chunk = Chunk::new(0, 0, 0, 320);
        populate_chunk(&mut chunk, &ctx).unwrap();

        assert_eq!(chunk.height(0, 0).unwrap(), 64);
        assert_eq!(chunk.biome_name(0, 0).unwrap(), "Zone1_Plains");
        assert_eq!(chunk.environment(0, 0).unwrap(), "Env_Zone1_Plains");
        assert_eq!(chunk.tint(0, 0).unwrap(), 0xFF5B9E28);
        assert_eq!(chunk.sections()[0].block_id(0, 0, 0), "Bedrock");
        assert_eq!(chunk.sections()[0].block_id(0, 1, 0), "Soil_Grass");
    }

    struct WaterPoolTile;

    impl Tile for WaterPoolTile {
        fn get_height(&self, _x: i32, _z: i32) -> i32 {
            60
        }
        fn get_water_level(&self, _x: i32, _z: i32) -> i32 {
            63
        }
        fn get_terrain(&self, _x: i32, _z: i32) -> usize {
            0
        }
        fn get_layer_value(&self, _layer: Layer, _x: i32, _z: i32) -> i32 {
            0
        }
        fn get_bit_layer(&self, _layer: Layer, _x: i32, _z: i32) -> bool {
            false
        }
    }

    #[test]
    fn scenario_3_water_pool() {
        let tile = WaterPoolTile;
        let ctx = ChunkContext { tile: &tile, tile_local_origin: (0, 0), seed: 0, world_origin: (0, 0), min_y: 0, max_y: 320 };
        let mut chunk = Chunk::new(0, 0, 0, 320);
        populate_chunk(&mut chunk, &ctx).unwrap();

        assert_eq!(chunk.sections()[0].block_id(0, 60, 0), "Soil_Grass");
        assert_eq!(chunk.sections()[0].fluid_id(0, 61, 0), Some("Water_Source"));
        assert_eq!(chunk.sections()[0].fluid_level(0, 61, 0), 1);
        assert_eq!(chunk.sections()[0].block_id(0, 61, 0), "Empty");
    }

    #[test]
    fn spawn_marker_added_only_inside_owning_chunk() {
        let tile = FlatTile { height: 64 };
        let ctx = ChunkContext { tile: &tile, tile_local_origin: (0, 0), seed: 0, world_origin: (0, 0), min_y: 0, max_y: 320 };
        let mut chunk = Chunk::new(0, 0, 0, 320);
        populate_chunk(&mut chunk, &ctx).unwrap();
        emit_spawn_if_present(&mut chunk, Some((10, 10)), (0, 0)).unwrap();
        assert_eq!(chunk.entities().len(), 1);
        assert_eq!(chunk.entities()[0].position, (10.5, 65.0, 10.5));

        let mut far_chunk = Chunk::new(5, 5, 0, 320);
        populate_chunk(&mut far_chunk, &ctx).unwrap();
        emit_spawn_if_present(&mut far_chunk, Some((10, 10)), (160, 160)).unwrap();
        assert!(far_chunk.entities().is_empty());
    }
}
