//! `EntityChunk` (`spec.md` §3, §4.4).

use bson::{Bson, Document};
use uuid::Uuid;

use crate::chunk::{Chunk, Entity, SpawnMarker};
use crate::registry::entity_type;

fn position_doc((x, y, z): (f64, f64, f64)) -> Document {
    let mut d = Document::new();
    d.insert("x", x);
    d.insert("y", y);
    d.insert("z", z);
    d
}

fn rotation_doc((yaw, pitch, roll): (f32, f32, f32)) -> Document {
    let mut d = Document::new();
    d.insert("Yaw", yaw as f64);
    d.insert("Pitch", pitch as f64);
    d.insert("Roll", roll as f64);
    d
}

fn entity_doc(entity: &Entity) -> Document {
    let mut d = Document::new();
    d.insert("Type", entity.type_id);
    d.insert("Uuid", entity.uuid.to_string());
    d.insert("Position", position_doc(entity.position));
    d.insert("Rotation", rotation_doc(entity.rotation));
    if let Some(marker) = &entity.spawn_marker {
        let mut m = Document::new();
        m.insert("SpawnMarkerId", marker.spawn_marker_id.clone());
        m.insert("RespawnTimeS", marker.respawn_time_s as f64);
        m.insert("SpawnCount", marker.spawn_count);
        m.insert("SpawnRadius", marker.spawn_radius as f64);
        m.insert("Active", marker.active);
        m.insert("DespawnWhenFar", marker.despawn_when_far);
        d.insert("SpawnMarker", m);
    }
    d
}

pub fn encode(chunk: &Chunk) -> Document {
    let entities: Vec<Bson> = chunk.entities().iter().map(|e| Bson::Document(entity_doc(e))).collect();
    let mut d = Document::new();
    d.insert("Entities", Bson::Array(entities));
    d
}

fn entity_from_doc(doc: &Document) -> Option<Entity> {
    let type_name = doc.get_str("Type").ok()?;
    let type_id = entity_type::by_id(type_name)?.id;
    let uuid = Uuid::parse_str(doc.get_str("Uuid").ok()?).ok()?;

    let pos = doc.get_document("Position").ok()?;
    let position = (pos.get_f64("x").ok()?, pos.get_f64("y").ok()?, pos.get_f64("z").ok()?);

    let rot = doc.get_document("Rotation").ok()?;
    let rotation = (
        rot.get_f64("Yaw").ok()? as f32,
        rot.get_f64("Pitch").ok()? as f32,
        rot.get_f64("Roll").ok()? as f32,
    );

    let spawn_marker = doc.get_document("SpawnMarker").ok().map(|m| SpawnMarker {
        spawn_marker_id: m.get_str("SpawnMarkerId").unwrap_or_default().to_string(),
        respawn_time_s: m.get_f64("RespawnTimeS").unwrap_or(0.0) as f32,
        spawn_count: m.get_i32("SpawnCount").unwrap_or(0),
        spawn_radius: m.get_f64("SpawnRadius").unwrap_or(0.0) as f32,
        active: m.get_bool("Active").unwrap_or(true),
        despawn_when_far: m.get_bool("DespawnWhenFar").unwrap_or(false),
    });

    Some(Entity { uuid, type_id, position, rotation, spawn_marker })
}

/// Reverses [`encode`], reconstructing every entity the `Entities` array
/// holds a recognized type for. Entries whose `Type` is absent from the
/// registry are skipped rather than failing the whole chunk read.
pub fn decode(doc: &Document) -> Vec<Entity> {
    doc.get_array("Entities")
        .map(|arr| arr.iter().filter_map(|b| b.as_document()).filter_map(entity_from_doc).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_spawn_carries_marker_subdoc() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.add_entity(Entity::player_spawn(10, 64, 10));
        let doc = encode(&chunk);
        let entities = doc.get_array("Entities").unwrap();
        assert_eq!(entities.len(), 1);
        let entity = entities[0].as_document().unwrap();
        assert_eq!(entity.get_str("Type").unwrap(), "PlayerSpawn");
        assert!(entity.contains_key("SpawnMarker"));
    }

    #[test]
    fn empty_chunk_has_no_entities() {
        let chunk = Chunk::new(0, 0, 0, 320);
        let doc = encode(&chunk);
        assert!(doc.get_array("Entities").unwrap().is_empty());
    }

    #[test]
    fn decode_reverses_encode() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.add_entity(Entity::player_spawn(10, 64, 10));
        let doc = encode(&chunk);
        let entities = decode(&doc);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].type_id, "PlayerSpawn");
        assert_eq!(entities[0].position, (10.5, 65.0, 10.5));
        assert!(entities[0].spawn_marker.is_some());
    }
}
