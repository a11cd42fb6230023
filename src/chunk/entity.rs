//! Entity-like records attached to a chunk (`spec.md` §3, §4.4 `EntityChunk`).

use uuid::Uuid;

/// A persisted entity instance: a mob/NPC, or a marker such as `PlayerSpawn`.
///
/// `spawn_marker` is `Some` exactly for entities that carry the `SpawnMarker`
/// component (`spec.md` §3); plain mobs leave it `None`.
#[derive(Debug, Clone)]
pub struct Entity {
    pub uuid: Uuid,
    pub type_id: &'static str,
    pub position: (f64, f64, f64),
    /// (yaw, pitch, roll), all in degrees.
    pub rotation: (f32, f32, f32),
    pub spawn_marker: Option<SpawnMarker>,
}

impl Entity {
    /// A `PlayerSpawn` marker centered on a column, per `spec.md` §4.6
    /// "Entity emission": `(sx+0.5, h+1, sz+0.5)`, `spawn_count=0,
    /// respawn=0, despawn_when_far=false`.
    pub fn player_spawn(x: i32, h: i32, z: i32) -> Self {
        Entity {
            uuid: Uuid::new_v4(),
            type_id: "PlayerSpawn",
            position: (x as f64 + 0.5, (h + 1) as f64, z as f64 + 0.5),
            rotation: (0.0, 0.0, 0.0),
            spawn_marker: Some(SpawnMarker {
                spawn_marker_id: "PlayerSpawn".to_string(),
                respawn_time_s: 0.0,
                spawn_count: 0,
                spawn_radius: 0.0,
                active: true,
                despawn_when_far: false,
            }),
        }
    }
}

/// A designer-placed spawn marker (`spec.md` §3): player spawn, mob spawner
/// location, or similar. Fields match the persisted `SpawnMarker` sub-doc.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnMarker {
    pub spawn_marker_id: String,
    pub respawn_time_s: f32,
    pub spawn_count: i32,
    pub spawn_radius: f32,
    pub active: bool,
    pub despawn_when_far: bool,
}

/// A reference to a prefab instance rooted in this chunk, in world-space
/// integer coordinates (`spec.md` §3, §4.4 `WorldPainterMetadata`).
#[derive(Debug, Clone, PartialEq)]
pub struct PrefabMarker {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub category: String,
    pub path: String,
}

/// A non-default block health value, persisted sparsely and keyed by
/// chunk-local `(x, y, z)` (`spec.md` §3, §4.4 `BlockHealthChunk`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHealthEntry {
    /// `[0, 1]`.
    pub health: f32,
    pub last_damage_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_spawn_marker_matches_scenario_5() {
        let e = Entity::player_spawn(10, 64, 10);
        assert_eq!(e.position, (10.5, 65.0, 10.5));
        let marker = e.spawn_marker.unwrap();
        assert_eq!(marker.spawn_count, 0);
        assert_eq!(marker.respawn_time_s, 0.0);
        assert!(!marker.despawn_when_far);
    }

    #[test]
    fn block_health_carries_normalized_value_and_timestamp() {
        let h = BlockHealthEntry { health: 0.4, last_damage_time: 1234 };
        assert!(h.health >= 0.0 && h.health <= 1.0);
        assert_eq!(h.last_damage_time, 1234);
    }
}
