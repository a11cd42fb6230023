//! CLI entry point: wires an [`ExportConfig`] to an [`ExportDriver`] over a
//! small flat demo world (`spec.md` §4.6 scenario 2), the same way
//! `mc-gen`'s `src/bin/test.rs` drives its own `World` directly rather than
//! parsing a project file (project load/save is out of scope, `spec.md` §1).

use std::path::PathBuf;

use anyhow::Context;
use hytale_world_export::config::ExportConfig;
use hytale_world_export::editor::{Dimension, DimensionAnchor, GameType, Layer, Tile, World};
use hytale_world_export::export::ExportDriver;

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

struct FlatDimension {
    tiles: std::collections::HashMap<(i32, i32), FlatTile>,
}

impl Dimension for FlatDimension {
    type Tile = FlatTile;

    fn tile_coords(&self) -> Vec<(i32, i32)> {
        self.tiles.keys().copied().collect()
    }
    fn get_tile(&self, tx: i32, tz: i32) -> Option<&FlatTile> {
        self.tiles.get(&(tx, tz))
    }
    fn minecraft_seed(&self) -> i64 {
        0
    }
    fn min_height(&self) -> i32 {
        0
    }
    fn max_height(&self) -> i32 {
        320
    }
}

struct DemoWorld {
    surface: FlatDimension,
}

impl World for DemoWorld {
    type Dimension = FlatDimension;

    fn spawn_point(&self) -> Option<(i32, i32)> {
        Some((0, 0))
    }
    fn game_type(&self) -> GameType {
        GameType::Adventure
    }
    fn attribute(&self, _key: &str) -> Option<String> {
        None
    }
    fn dimension(&self, anchor: DimensionAnchor) -> Option<&FlatDimension> {
        matches!(anchor, DimensionAnchor::Surface).then_some(&self.surface)
    }
}

fn demo_world() -> DemoWorld {
    let mut tiles = std::collections::HashMap::new();
    tiles.insert((0, 0), FlatTile { height: 64 });
    DemoWorld { surface: FlatDimension { tiles } }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let out_dir: PathBuf = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("export-out"));

    let world = demo_world();
    let driver = ExportDriver::new(&world, ExportConfig::default());
    let stats = driver.run(&out_dir).with_context(|| format!("export into {} failed", out_dir.display()))?;

    tracing::info!(
        chunks = stats.chunks_written,
        regions = stats.regions_written,
        surface_area = stats.surface_area,
        "export complete"
    );
    Ok(())
}
