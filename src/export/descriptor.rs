//! World descriptor (`config.json`) and companion resource files
//! (`spec.md` §4.6, §6).

use std::path::Path;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::editor::GameType;
use crate::error::{Error, Result};

/// Fixed `GameTime` stamped onto a freshly exported world (`spec.md` §6).
const FIXED_GAME_TIME: &str = "0001-01-01T05:30:00.000000000Z";

fn base64_encode(bytes: &[u8]) -> String {
    const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = *chunk.get(1).unwrap_or(&0);
        let b2 = *chunk.get(2).unwrap_or(&0);
        out.push(ALPHABET[(b0 >> 2) as usize] as char);
        out.push(ALPHABET[(((b0 & 0x03) << 4) | (b1 >> 4)) as usize] as char);
        out.push(if chunk.len() > 1 { ALPHABET[(((b1 & 0x0f) << 2) | (b2 >> 6)) as usize] as char } else { '=' });
        out.push(if chunk.len() > 2 { ALPHABET[(b2 & 0x3f) as usize] as char } else { '=' });
    }
    out
}

/// Everything the descriptor needs beyond what each dimension export already
/// produced (`spec.md` §4.6).
pub struct WorldDescriptor {
    pub uuid: Uuid,
    pub seed: i64,
    pub game_type: GameType,
    /// Translated (centered) spawn point, or `(0, 64, 0)` when the world has none.
    pub spawn_point: (i32, i32, i32),
}

/// Writes `config.json` adjacent to `chunks/`. Key order follows `spec.md`
/// §4.6's enumeration; `GameTime`'s extended-JSON `UUID` shape follows §6.
pub fn write_config_json(world_dir: &Path, descriptor: &WorldDescriptor) -> Result<()> {
    let mut uuid_doc = Map::new();
    uuid_doc.insert("$binary".to_string(), Value::String(base64_encode(descriptor.uuid.as_bytes())));
    uuid_doc.insert("$type".to_string(), Value::String("04".to_string()));

    let mut worldgen = Map::new();
    worldgen.insert("type".to_string(), Value::String("Void".to_string()));

    let mut chunk_storage = Map::new();
    chunk_storage.insert("type".to_string(), Value::String("Hytale".to_string()));

    let mut spawn_point = Map::new();
    spawn_point.insert("x".to_string(), Value::from(descriptor.spawn_point.0));
    spawn_point.insert("y".to_string(), Value::from(descriptor.spawn_point.1));
    spawn_point.insert("z".to_string(), Value::from(descriptor.spawn_point.2));

    let mut spawn_provider = Map::new();
    spawn_provider.insert("type".to_string(), Value::String("Global".to_string()));
    spawn_provider.insert("spawn_point".to_string(), Value::Object(spawn_point));

    let game_mode = match descriptor.game_type {
        GameType::Adventure => "Adventure",
        GameType::Creative => "Creative",
    };

    let mut root = Map::new();
    root.insert("version".to_string(), Value::from(4));
    root.insert("uuid".to_string(), Value::Object(uuid_doc));
    root.insert("seed".to_string(), Value::from(descriptor.seed));
    root.insert("GameTime".to_string(), Value::String(FIXED_GAME_TIME.to_string()));
    root.insert("worldgen".to_string(), Value::Object(worldgen));
    root.insert("chunk_storage".to_string(), Value::Object(chunk_storage));
    root.insert("game_mode".to_string(), Value::String(game_mode.to_string()));
    root.insert("spawn_provider".to_string(), Value::Object(spawn_provider));
    root.insert("client_effects".to_string(), Value::Array(Vec::new()));
    root.insert("flags".to_string(), Value::Object(Map::new()));

    let json = serde_json::to_string_pretty(&Value::Object(root))
        .map_err(|e| Error::Internal(format!("config.json serialize failed: {e}")))?;
    let path = world_dir.join("config.json");
    std::fs::write(&path, json).map_err(|e| Error::io(path, e))
}

/// Writes the two static resource files under `resources/` (`spec.md` §6).
pub fn write_resource_files(world_dir: &Path) -> Result<()> {
    let resources = world_dir.join("resources");
    std::fs::create_dir_all(&resources).map_err(|e| Error::io(&resources, e))?;

    write_json(&resources.join("PrefabEditSession.json"), &serde_json::json!({ "Prefabs": [] }))?;
    write_json(&resources.join("InstanceData.json"), &serde_json::json!({ "Instances": [] }))
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Internal(format!("{} serialize failed: {e}", path.display())))?;
    std::fs::write(path, json).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_json_embeds_uuid_and_game_mode() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = WorldDescriptor {
            uuid: Uuid::nil(),
            seed: 42,
            game_type: GameType::Creative,
            spawn_point: (10, 65, 10),
        };
        write_config_json(dir.path(), &descriptor).unwrap();
        let text = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
        assert!(text.contains("\"game_mode\": \"Creative\""));
        assert!(text.contains("\"$type\": \"04\""));
        assert!(text.contains("\"seed\": 42"));
    }

    #[test]
    fn resource_files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        write_resource_files(dir.path()).unwrap();
        assert!(dir.path().join("resources/PrefabEditSession.json").exists());
        assert!(dir.path().join("resources/InstanceData.json").exists());
    }

    #[test]
    fn base64_encodes_all_zero_bytes_as_padding_free_a_run() {
        assert_eq!(base64_encode(&[0u8; 16]), "AAAAAAAAAAAAAAAAAAAAAA==");
    }
}
