//! Consumed editor interfaces (`spec.md` §6) — design-level contracts the
//! export driver reads from, not code the driver owns. An adapter living
//! outside this crate implements these traits over whatever in-memory or
//! on-disk project format the editor uses.

/// A painted annotation layer, read with [`Tile::get_layer_value`] or
/// [`Tile::get_bit_layer`] (`spec.md` §4.6 step 1, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Painted biome id, or [`crate::registry::biome::AUTOMATIC`].
    Biome,
    /// Painted fluid type: `0` = none, otherwise an editor-defined fluid id.
    Fluid,
    /// Painted environment override, or `0` for "inherit from terrain".
    Environment,
    /// Painted spawn/entity tag value.
    Entity,
    /// Painted prefab reference value.
    Prefab,
    /// Legacy single-bit "flood with lava" flag, read via [`Tile::get_bit_layer`].
    FloodWithLava,
}

/// One 128×128-block editor tile (`spec.md` §4.6).
pub trait Tile {
    fn get_height(&self, x: i32, z: i32) -> i32;
    fn get_water_level(&self, x: i32, z: i32) -> i32;
    fn get_terrain(&self, x: i32, z: i32) -> usize;
    fn get_layer_value(&self, layer: Layer, x: i32, z: i32) -> i32;
    fn get_bit_layer(&self, layer: Layer, x: i32, z: i32) -> bool;
}

/// One editor dimension: a sparse grid of [`Tile`]s sharing a seed and Y range.
pub trait Dimension {
    type Tile: Tile;

    fn tile_coords(&self) -> Vec<(i32, i32)>;
    fn get_tile(&self, tx: i32, tz: i32) -> Option<&Self::Tile>;
    fn minecraft_seed(&self) -> i64;
    fn min_height(&self) -> i32;
    fn max_height(&self) -> i32;
    /// The Y at which a ceiling dimension's bedrock lid hangs, if any
    /// (`spec.md` §4.6 "Ceiling dimension").
    fn ceiling_height(&self) -> Option<i32> {
        None
    }
    /// Custom-object layers to run through [`PrefabEditor::add_features`]
    /// after the region's base terrain is populated. Empty for dimensions
    /// with no custom-object exporters.
    fn custom_object_layer_count(&self) -> usize {
        0
    }

    /// The actual layer exporters backing [`Dimension::custom_object_layer_count`]
    /// (`spec.md` §4.6 "Custom objects"). Default empty, matching the default count.
    fn custom_object_layers(&self) -> Vec<&dyn PrefabEditor> {
        Vec::new()
    }
}

/// Which dimension a [`World`] should be read from (`spec.md` §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionAnchor {
    Surface,
    Ceiling,
}

/// Whether the editor's project is Creative or Adventure
/// (`spec.md` §6 `config.json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    Adventure,
    Creative,
}

/// The top-level editor project being exported.
pub trait World {
    type Dimension: Dimension;

    /// World-space spawn column, if the project defines one.
    fn spawn_point(&self) -> Option<(i32, i32)>;
    fn game_type(&self) -> GameType;
    /// Free-form project attributes (used for things like world UUID).
    fn attribute(&self, key: &str) -> Option<String>;
    fn dimension(&self, anchor: DimensionAnchor) -> Option<&Self::Dimension>;
}

/// A fixup a [`PrefabEditor`] wants applied after placement; returned across
/// a region boundary is discarded with a log note (`spec.md` §6, §9: custom
/// objects are single-region scope).
#[derive(Debug, Clone)]
pub struct Fixup {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub note: String,
}

/// Absolute-coordinate view over the in-memory chunk map of one region, as
/// handed to a [`PrefabEditor`] (`spec.md` §9 "Custom-object placement").
pub trait ChunkWorld {
    fn read_block(&self, x: i32, y: i32, z: i32) -> &'static str;
    fn write_block(&mut self, x: i32, y: i32, z: i32, block_id: &str);
    fn add_entity(&mut self, x: i32, y: i32, z: i32, type_id: &str);
}

/// A custom-object layer exporter (`spec.md` §6, §4.6 "Custom objects").
pub trait PrefabEditor {
    /// `area` is the editor-tile rectangle the layer covers; `bounds` is the
    /// Hytale-chunk rectangle of the region being populated.
    fn add_features(&self, area: crate::geometry::Rect, bounds: crate::geometry::Rect, chunk_world: &mut dyn ChunkWorld) -> Vec<Fixup>;
}
