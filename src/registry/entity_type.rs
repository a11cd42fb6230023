//! Static entity-type catalog (`spec.md` §4.1).

use enum_iterator::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence)]
pub enum SpawnType {
    Passive,
    Hostile,
    Neutral,
    Aquatic,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTypeDef {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub spawn_type: SpawnType,
}

pub static ENTITY_TYPES: &[EntityTypeDef] = &[
    EntityTypeDef {
        id: "PlayerSpawn",
        display_name: "Player Spawn Marker",
        category: "Marker",
        spawn_type: SpawnType::Passive,
    },
    EntityTypeDef {
        id: "Trork",
        display_name: "Trork",
        category: "Humanoid",
        spawn_type: SpawnType::Hostile,
    },
    EntityTypeDef {
        id: "Kweebec",
        display_name: "Kweebec",
        category: "Humanoid",
        spawn_type: SpawnType::Neutral,
    },
    EntityTypeDef {
        id: "Fish",
        display_name: "Fish",
        category: "Creature",
        spawn_type: SpawnType::Aquatic,
    },
];

pub fn by_id(id: &str) -> Option<&'static EntityTypeDef> {
    ENTITY_TYPES.iter().find(|e| e.id == id)
}

pub fn by_index(index: usize) -> Option<&'static EntityTypeDef> {
    ENTITY_TYPES.get(index)
}

/// Enumerates every known `SpawnType` in declaration order
/// (`spec.md` §4.1: "enumeration in a stable declared order").
pub fn spawn_types() -> impl Iterator<Item = SpawnType> {
    enum_iterator::all::<SpawnType>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_spawn_is_registered() {
        assert_eq!(by_id("PlayerSpawn").unwrap().spawn_type, SpawnType::Passive);
    }

    #[test]
    fn index_lookup_matches_id_lookup() {
        assert_eq!(by_index(0).unwrap().id, "PlayerSpawn");
    }

    #[test]
    fn spawn_types_enumerate_in_order() {
        let types: Vec<_> = spawn_types().collect();
        assert_eq!(
            types,
            vec![
                SpawnType::Passive,
                SpawnType::Hostile,
                SpawnType::Neutral,
                SpawnType::Aquatic,
                SpawnType::Boss,
            ]
        );
    }
}
