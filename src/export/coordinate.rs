//! Editor-tile ↔ Hytale chunk/region coordinate mapping (`spec.md` §4.6).

use std::collections::BTreeSet;

use crate::geometry::{Rect, RegionIndex, Vec2};

pub const TILE_SIZE: i32 = 128;
pub const CHUNK_SIZE: i32 = 32;
pub const REGION_CHUNKS: i32 = 32;

/// `block_offset = -(center(T)·128)`, centering the exported content on
/// world origin (`spec.md` §4.6, §8).
pub fn block_offset(tiles: impl IntoIterator<Item = (i32, i32)>) -> Vec2 {
    match Rect::bounding(tiles) {
        Some(rect) => {
            let center = rect.center();
            Vec2(-center.0 * TILE_SIZE, -center.1 * TILE_SIZE)
        }
        None => Vec2(0, 0),
    }
}

fn region_for_block(block: i32) -> i32 {
    block.div_euclid(CHUNK_SIZE).div_euclid(REGION_CHUNKS)
}

/// Every Hytale region a single editor tile spans once translated by
/// `offset`, inclusive of the far-edge chunk (`spec.md` §4.6).
pub fn regions_for_tile(tx: i32, tz: i32, offset: Vec2) -> Vec<RegionIndex> {
    let x0 = tx * TILE_SIZE + offset.0;
    let z0 = tz * TILE_SIZE + offset.1;
    let x1 = x0 + TILE_SIZE - 1;
    let z1 = z0 + TILE_SIZE - 1;

    let rx0 = region_for_block(x0);
    let rx1 = region_for_block(x1);
    let rz0 = region_for_block(z0);
    let rz1 = region_for_block(z1);

    let mut out = Vec::new();
    for rx in rx0..=rx1 {
        for rz in rz0..=rz1 {
            out.push(RegionIndex(rx, rz));
        }
    }
    out
}

/// Union of [`regions_for_tile`] over every selected tile.
pub fn regions_for_tiles(tiles: impl IntoIterator<Item = (i32, i32)>, offset: Vec2) -> BTreeSet<RegionIndex> {
    let mut out = BTreeSet::new();
    for (tx, tz) in tiles {
        out.extend(regions_for_tile(tx, tz, offset));
    }
    out
}

/// For a world (centered) Hytale chunk, the owning editor tile coordinate
/// and the chunk's block-local offset within that tile (`spec.md` §4.6:
/// "the inverse-translated editor coordinates, and the owning editor tile").
pub fn owning_tile(hcx: i32, hcz: i32, offset: Vec2) -> ((i32, i32), (i32, i32)) {
    let world_x0 = hcx * CHUNK_SIZE;
    let world_z0 = hcz * CHUNK_SIZE;
    let editor_x0 = world_x0 - offset.0;
    let editor_z0 = world_z0 - offset.1;
    let tx = editor_x0.div_euclid(TILE_SIZE);
    let tz = editor_z0.div_euclid(TILE_SIZE);
    let local_x0 = editor_x0.rem_euclid(TILE_SIZE);
    let local_z0 = editor_z0.rem_euclid(TILE_SIZE);
    ((tx, tz), (local_x0, local_z0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_aligned_tile_maps_to_one_region() {
        let offset = Vec2(0, 0);
        let regions = regions_for_tile(0, 0, offset);
        assert_eq!(regions, vec![RegionIndex(0, 0)]);
    }

    #[test]
    fn block_offset_centers_single_tile_at_origin() {
        let offset = block_offset([(0, 0)]);
        assert_eq!(offset, Vec2(0, 0));
    }

    #[test]
    fn block_offset_centers_multi_tile_bounding_box() {
        // tiles (0,0) and (1,0): center = floor((0+1)/2) = 0, offset = 0.
        let offset = block_offset([(0, 0), (1, 0)]);
        assert_eq!(offset, Vec2(0, 0));
        // tiles (2,0) and (3,0): center = floor((2+3)/2) = 2, offset = -256.
        let offset = block_offset([(2, 0), (3, 0)]);
        assert_eq!(offset, Vec2(-256, 0));
    }

    #[test]
    fn owning_tile_inverts_offset() {
        let offset = Vec2(-256, 0);
        // world chunk 8 -> world block 256 -> editor block 256-(-256)=512 -> tile 4.
        let (tile, local) = owning_tile(8, 0, offset);
        assert_eq!(tile, (4, 0));
        assert_eq!(local, (0, 0));
    }
}
