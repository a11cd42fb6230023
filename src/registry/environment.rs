//! Static environment catalog (`spec.md` §4.1).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentCategory {
    Surface,
    Underground,
    Aquatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentDef {
    pub id: u32,
    pub name: &'static str,
    pub display_name: &'static str,
    pub parent_name: Option<&'static str>,
    pub water_tint_hex: Option<&'static str>,
    pub spawn_density: f32,
    pub category: EnvironmentCategory,
}

pub static ENVIRONMENTS: &[EnvironmentDef] = &[
    EnvironmentDef {
        id: 1,
        name: "Env_Zone1_Plains",
        display_name: "Plains",
        parent_name: None,
        water_tint_hex: Some("#3F76E4"),
        spawn_density: 1.0,
        category: EnvironmentCategory::Surface,
    },
    EnvironmentDef {
        id: 2,
        name: "Env_Zone1_Forest",
        display_name: "Forest",
        parent_name: Some("Env_Zone1_Plains"),
        water_tint_hex: Some("#3F76E4"),
        spawn_density: 1.2,
        category: EnvironmentCategory::Surface,
    },
    EnvironmentDef {
        id: 3,
        name: "Env_Zone2_Desert",
        display_name: "Desert",
        parent_name: None,
        water_tint_hex: Some("#5C8FC7"),
        spawn_density: 0.6,
        category: EnvironmentCategory::Surface,
    },
    EnvironmentDef {
        id: 4,
        name: "Env_Zone3_Mountain",
        display_name: "Mountain",
        parent_name: None,
        water_tint_hex: Some("#3F76E4"),
        spawn_density: 0.5,
        category: EnvironmentCategory::Surface,
    },
    EnvironmentDef {
        id: 5,
        name: "Env_Zone1_Ocean",
        display_name: "Ocean",
        parent_name: None,
        water_tint_hex: Some("#1E4E8C"),
        spawn_density: 0.8,
        category: EnvironmentCategory::Aquatic,
    },
    EnvironmentDef {
        id: 6,
        name: "Env_Zone2_Swamp",
        display_name: "Swamp",
        parent_name: Some("Env_Zone1_Plains"),
        water_tint_hex: Some("#4E6B4A"),
        spawn_density: 1.4,
        category: EnvironmentCategory::Surface,
    },
];

pub const DEFAULT: &str = "Env_Zone1_Plains";

pub fn by_id(id: u32) -> Option<&'static EnvironmentDef> {
    ENVIRONMENTS.iter().find(|e| e.id == id)
}

pub fn by_name(name: &str) -> Option<&'static EnvironmentDef> {
    ENVIRONMENTS.iter().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plains_environment_is_surface() {
        let env = by_name(DEFAULT).unwrap();
        assert_eq!(env.category, EnvironmentCategory::Surface);
        assert_eq!(env.id, 1);
    }

    #[test]
    fn ids_are_1_based() {
        assert!(ENVIRONMENTS.iter().all(|e| e.id >= 1));
    }
}
