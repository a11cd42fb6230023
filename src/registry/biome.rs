//! Static biome catalog (`spec.md` §4.1).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiomeCategory {
    Plains,
    Forest,
    Desert,
    Mountain,
    Ocean,
    Swamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeDef {
    pub id: u8,
    pub name: &'static str,
    pub display_name: &'static str,
    pub environment_id: u32,
    pub tint_argb: u32,
    pub display_color_rgb: u32,
    pub category: BiomeCategory,
}

/// Sentinel meaning "derive from terrain at export time" (`spec.md` §3, §4.1).
pub const AUTOMATIC: u8 = 255;

pub static BIOMES: &[BiomeDef] = &[
    BiomeDef {
        id: 0,
        name: "Zone1_Plains",
        display_name: "Plains",
        environment_id: 1,
        tint_argb: 0xFF5B9E28,
        display_color_rgb: 0x5B9E28,
        category: BiomeCategory::Plains,
    },
    BiomeDef {
        id: 1,
        name: "Zone1_Forest",
        display_name: "Forest",
        environment_id: 2,
        tint_argb: 0xFF3E7A1E,
        display_color_rgb: 0x3E7A1E,
        category: BiomeCategory::Forest,
    },
    BiomeDef {
        id: 2,
        name: "Zone2_Desert",
        display_name: "Desert",
        environment_id: 3,
        tint_argb: 0xFFD8C27A,
        display_color_rgb: 0xD8C27A,
        category: BiomeCategory::Desert,
    },
    BiomeDef {
        id: 3,
        name: "Zone3_Mountain",
        display_name: "Mountain",
        environment_id: 4,
        tint_argb: 0xFF8C8C8C,
        display_color_rgb: 0x8C8C8C,
        category: BiomeCategory::Mountain,
    },
    BiomeDef {
        id: 4,
        name: "Zone1_Ocean",
        display_name: "Ocean",
        environment_id: 5,
        tint_argb: 0xFF1E4E8C,
        display_color_rgb: 0x1E4E8C,
        category: BiomeCategory::Ocean,
    },
    BiomeDef {
        id: 5,
        name: "Zone2_Swamp",
        display_name: "Swamp",
        environment_id: 6,
        tint_argb: 0xFF4E5E2E,
        display_color_rgb: 0x4E5E2E,
        category: BiomeCategory::Swamp,
    },
];

pub fn by_id(id: u8) -> Option<&'static BiomeDef> {
    BIOMES.iter().find(|b| b.id == id)
}

pub fn by_name(name: &str) -> Option<&'static BiomeDef> {
    BIOMES.iter().find(|b| b.name == name)
}

/// Fallback biome when automatic derivation can't match anything (`spec.md` §4.1).
pub const FALLBACK: &str = "Zone1_Plains";

/// Keyword table driving the automatic-biome policy. First match wins.
static TERRAIN_KEYWORDS: &[(&str, &str)] = &[
    ("desert", "Zone2_Desert"),
    ("sand", "Zone2_Desert"),
    ("mountain", "Zone3_Mountain"),
    ("rock", "Zone3_Mountain"),
    ("ocean", "Zone1_Ocean"),
    ("water", "Zone1_Ocean"),
    ("swamp", "Zone2_Swamp"),
    ("forest", "Zone1_Forest"),
    ("tree", "Zone1_Forest"),
    ("grass", "Zone1_Plains"),
    ("plains", "Zone1_Plains"),
];

/// Derives a biome from a terrain name by keyword match, falling back to
/// [`FALLBACK`] (`spec.md` §4.1, automatic-biome policy).
pub fn from_terrain_name(terrain_name: &str) -> &'static BiomeDef {
    let lower = terrain_name.to_ascii_lowercase();
    TERRAIN_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .and_then(|(_, biome)| by_name(biome))
        .or_else(|| by_name(FALLBACK))
        .expect("fallback biome must exist in the static table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automatic_sentinel_is_255() {
        assert_eq!(AUTOMATIC, 255);
        assert!(by_id(AUTOMATIC).is_none());
    }

    #[test]
    fn grass_terrain_maps_to_plains() {
        assert_eq!(from_terrain_name("Grass").name, "Zone1_Plains");
    }

    #[test]
    fn unknown_terrain_falls_back_to_plains() {
        assert_eq!(from_terrain_name("Xyzzy").name, FALLBACK);
    }

    #[test]
    fn desert_keyword_matches_before_fallback() {
        assert_eq!(from_terrain_name("Red Desert Sand").name, "Zone2_Desert");
    }
}
