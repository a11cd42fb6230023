//! `EnvironmentChunk` (`spec.md` §4.4).

use crate::chunk::Chunk;
use crate::codec::{read_utf, write_utf};
use crate::registry::{biome, environment};

fn resolve_env_id(name: &str) -> i32 {
    environment::by_name(name)
        .map(|e| e.id as i32)
        .or_else(|| environment::by_name(environment::DEFAULT).map(|e| e.id as i32))
        .expect("default environment must exist in the static table")
}

/// `i32 env_count`, per distinct environment `{i32 id, utf name}`, then
/// exactly 1024 column records `{i32 transition_count=0, i32 env_id}`.
pub fn encode(chunk: &Chunk) -> Vec<u8> {
    let columns: Vec<(i32, &str)> = (0..32)
        .flat_map(|z| (0..32).map(move |x| (x, z)))
        .map(|(x, z)| {
            let name = chunk.environment(x, z).unwrap();
            (resolve_env_id(name), name)
        })
        .collect();

    let mut distinct: Vec<(i32, &str)> = Vec::new();
    for &(id, name) in &columns {
        if !distinct.iter().any(|&(existing_id, _)| existing_id == id) {
            distinct.push((id, name));
        }
    }

    let mut out = Vec::new();
    out.extend_from_slice(&(distinct.len() as i32).to_le_bytes());
    for (id, name) in &distinct {
        out.extend_from_slice(&id.to_le_bytes());
        write_utf(&mut out, name);
    }

    for (id, _) in &columns {
        out.extend_from_slice(&0i32.to_le_bytes()); // transition_count
        out.extend_from_slice(&id.to_le_bytes());
    }

    out
}

/// Reverses [`encode`], returning `(environment_name, biome_name)` per column
/// in `z*32+x` order. The fixed component list has no dedicated biome field,
/// so `biome_name` is derived from the environment id via the registries'
/// 1:1 biome-to-environment mapping, falling back to [`biome::FALLBACK`]
/// when no biome claims that environment.
pub fn decode(data: &[u8]) -> crate::error::Result<Vec<(String, String)>> {
    use crate::error::Error;

    let env_count = i32::from_le_bytes(
        data.get(0..4)
            .ok_or_else(|| Error::Corruption("truncated environment chunk header".to_string()))?
            .try_into()
            .unwrap(),
    ) as usize;
    let mut cursor = 4usize;
    let mut by_id: Vec<(i32, String)> = Vec::with_capacity(env_count);
    for _ in 0..env_count {
        let id_bytes = data
            .get(cursor..cursor + 4)
            .ok_or_else(|| Error::Corruption("truncated environment table entry".to_string()))?;
        let id = i32::from_le_bytes(id_bytes.try_into().unwrap());
        cursor += 4;
        let name = read_utf(data, &mut cursor)?;
        by_id.push((id, name));
    }

    let mut out = Vec::with_capacity(1024);
    for _ in 0..1024 {
        cursor += 4; // transition_count
        let id_bytes = data
            .get(cursor..cursor + 4)
            .ok_or_else(|| Error::Corruption("truncated environment column record".to_string()))?;
        let id = i32::from_le_bytes(id_bytes.try_into().unwrap());
        cursor += 4;
        let env_name = by_id
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| environment::DEFAULT.to_string());
        let biome_name = biome::BIOMES
            .iter()
            .find(|b| b.environment_id as i32 == id)
            .map(|b| b.name.to_string())
            .unwrap_or_else(|| biome::FALLBACK.to_string());
        out.push((env_name, biome_name));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_environment_dedupes_to_one_entry() {
        let chunk = Chunk::new(0, 0, 0, 320);
        let data = encode(&chunk);
        let env_count = i32::from_le_bytes(data[0..4].try_into().unwrap());
        assert_eq!(env_count, 1);
    }

    #[test]
    fn column_records_total_1024() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.set_environment(3, 3, "Env_Zone1_Ocean").unwrap();
        let data = encode(&chunk);
        let env_count = i32::from_le_bytes(data[0..4].try_into().unwrap()) as usize;
        assert_eq!(env_count, 2);
        // header consumed: env_count(4) + per-env (4 + 2 + name_len)
        let mut cursor = 4;
        for _ in 0..env_count {
            cursor += 4;
            let name_len = u16::from_le_bytes([data[cursor], data[cursor + 1]]) as usize;
            cursor += 2 + name_len;
        }
        let remaining = data.len() - cursor;
        assert_eq!(remaining, 1024 * 8);
    }

    #[test]
    fn decode_reverses_encode() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.set_environment(3, 3, "Env_Zone1_Ocean").unwrap();
        let data = encode(&chunk);
        let columns = decode(&data).unwrap();
        assert_eq!(columns.len(), 1024);
        let (env_name, biome_name) = &columns[3 * 32 + 3];
        assert_eq!(env_name, "Env_Zone1_Ocean");
        assert_eq!(biome_name, "Zone1_Ocean");
        let (env_name0, _) = &columns[0];
        assert_eq!(env_name0, environment::DEFAULT);
    }
}
