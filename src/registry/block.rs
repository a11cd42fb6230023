//! Static block catalog (`spec.md` §4.1).
//!
//! Index 0 is always the `Empty` sentinel; every other entry is looked up
//! both by id and by table index so the BSON serializer can cheaply refer to
//! a voxel's block without carrying its string around.

/// One row of the block catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDef {
    pub id: &'static str,
    pub is_fluid: bool,
    /// Default rotation carried by the registry row itself, distinct from
    /// the per-voxel rotation stored in a `Section` (`spec.md` §3).
    pub rotation: u8,
}

impl BlockDef {
    pub const fn is_empty(&self) -> bool {
        // str::eq isn't const-stable across all compilers we target, so compare bytes.
        matches!(self.id.as_bytes(), b"Empty")
    }
}

macro_rules! block {
    ($id:literal) => {
        BlockDef {
            id: $id,
            is_fluid: false,
            rotation: 0,
        }
    };
    ($id:literal, fluid) => {
        BlockDef {
            id: $id,
            is_fluid: true,
            rotation: 0,
        }
    };
}

/// Declared order doubles as the stable registry index order.
pub static BLOCKS: &[BlockDef] = &[
    block!("Empty"),
    block!("Bedrock"),
    block!("Rock_Stone"),
    block!("Soil_Dirt"),
    block!("Soil_Grass"),
    block!("Soil_Sand"),
    block!("Soil_Gravel"),
    block!("Rock_Granite"),
    block!("Rock_Basalt"),
    block!("Wood_Log_Oak"),
    block!("Wood_Planks_Oak"),
    block!("Leaves_Oak"),
    block!("Ore_Coal"),
    block!("Ore_Iron"),
    block!("Water_Source", fluid),
    block!("Water_Flowing", fluid),
    block!("Lava_Source", fluid),
    block!("Lava_Flowing", fluid),
];

pub fn by_id(id: &str) -> Option<(u16, &'static BlockDef)> {
    BLOCKS
        .iter()
        .enumerate()
        .find(|(_, b)| b.id == id)
        .map(|(i, b)| (i as u16, b))
}

pub fn by_index(index: u16) -> Option<&'static BlockDef> {
    BLOCKS.get(index as usize)
}

/// Index of the `Empty` sentinel. Always 0 by construction.
pub const EMPTY_INDEX: u16 = 0;

/// A fluid is identified by id suffix or explicit registry flag
/// (`spec.md` §3: "id ends in `_Source` or is a known fluid").
pub fn is_fluid_id(id: &str) -> bool {
    id.ends_with("_Source")
        || id.ends_with("_Flowing")
        || by_id(id).is_some_and(|(_, b)| b.is_fluid)
}

/// Default fill level for a fluid voxel whose stored level is 0
/// (`spec.md` §4.4): source blocks default to 1, flowing blocks to 8.
pub fn default_level(fluid_id: &str) -> u8 {
    if fluid_id.ends_with("_Source") {
        1
    } else {
        8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_index_zero() {
        let (idx, def) = by_id("Empty").unwrap();
        assert_eq!(idx, EMPTY_INDEX);
        assert!(def.is_empty());
    }

    #[test]
    fn water_source_is_fluid_with_default_level_one() {
        assert!(is_fluid_id("Water_Source"));
        assert_eq!(default_level("Water_Source"), 1);
    }

    #[test]
    fn flowing_fluid_defaults_to_eight() {
        assert!(is_fluid_id("Lava_Flowing"));
        assert_eq!(default_level("Lava_Flowing"), 8);
    }

    #[test]
    fn unknown_id_round_trips_to_none() {
        assert!(by_id("Not_A_Real_Block").is_none());
    }
}
