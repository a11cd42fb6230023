//! `BlockHealthChunk` (`spec.md` §4.4).

use crate::chunk::Chunk;

/// `u8 version=2`, `i32 health_count`, per entry `{i32 x, i32 y, i32 z,
/// f32 health, i64 last_damage_time}`, then `i32 fragility_count=0`.
pub fn encode(chunk: &Chunk) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(2u8);

    let entries: Vec<_> = chunk.block_health().collect();
    out.extend_from_slice(&(entries.len() as i32).to_le_bytes());
    for (&(x, y, z), entry) in entries {
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
        out.extend_from_slice(&z.to_le_bytes());
        out.extend_from_slice(&entry.health.to_le_bytes());
        out.extend_from_slice(&entry.last_damage_time.to_le_bytes());
    }

    out.extend_from_slice(&0i32.to_le_bytes()); // fragility_count
    out
}

/// Reverses [`encode`], returning `(x, y, z, health, last_damage_time)` tuples.
pub fn decode(data: &[u8]) -> Vec<(i32, i32, i32, f32, i64)> {
    let count = i32::from_le_bytes(data[1..5].try_into().unwrap()) as usize;
    let mut cursor = 5usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let x = i32::from_le_bytes(data[cursor..cursor + 4].try_into().unwrap());
        let y = i32::from_le_bytes(data[cursor + 4..cursor + 8].try_into().unwrap());
        let z = i32::from_le_bytes(data[cursor + 8..cursor + 12].try_into().unwrap());
        let health = f32::from_le_bytes(data[cursor + 12..cursor + 16].try_into().unwrap());
        let last_damage_time = i64::from_le_bytes(data[cursor + 16..cursor + 24].try_into().unwrap());
        out.push((x, y, z, health, last_damage_time));
        cursor += 24;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chunk_has_zero_counts() {
        let chunk = Chunk::new(0, 0, 0, 320);
        let data = encode(&chunk);
        assert_eq!(data[0], 2);
        let count = i32::from_le_bytes([data[1], data[2], data[3], data[4]]);
        assert_eq!(count, 0);
        let tail = &data[data.len() - 4..];
        assert_eq!(i32::from_le_bytes(tail.try_into().unwrap()), 0);
    }

    #[test]
    fn one_entry_serializes_all_fields() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.upsert_block_health(1, 64, 2, 0.5, 999);
        let data = encode(&chunk);
        let count = i32::from_le_bytes([data[1], data[2], data[3], data[4]]);
        assert_eq!(count, 1);
        let x = i32::from_le_bytes(data[5..9].try_into().unwrap());
        assert_eq!(x, 1);
    }

    #[test]
    fn decode_reverses_encode() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.upsert_block_health(1, 64, 2, 0.5, 999);
        chunk.upsert_block_health(5, 70, 9, 0.1, -3);
        let data = encode(&chunk);
        let entries = decode(&data);
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&(1, 64, 2, 0.5, 999)));
        assert!(entries.contains(&(5, 70, 9, 0.1, -3)));
    }
}
