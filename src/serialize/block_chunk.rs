//! `BlockChunk` (version 3) — heightmap + tintmap (`spec.md` §4.4).

use crate::chunk::Chunk;
use crate::codec::palette;

/// `bool needs_physics=false`, a `ShortBytePalette` of the heightmap, then an
/// `IntBytePalette` of the tintmap.
pub fn encode(chunk: &Chunk) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(0u8); // needs_physics = false

    let heightmap: Vec<u16> = (0..32).flat_map(|z| (0..32).map(move |x| (x, z))).map(|(x, z)| chunk.height(x, z).unwrap() as u16).collect();
    out.extend_from_slice(&palette::encode_short(&heightmap));

    let tint: Vec<u32> = (0..32).flat_map(|z| (0..32).map(move |x| (x, z))).map(|(x, z)| chunk.tint(x, z).unwrap()).collect();
    out.extend_from_slice(&palette::encode_int(&tint));

    out
}

/// Reverses [`encode`], returning `(heightmap, tint)` in `z*32+x` order.
pub fn decode(data: &[u8]) -> (Vec<u16>, Vec<u32>) {
    let (heightmap, consumed) = palette::decode_short(&data[1..]);
    let (tint, _) = palette::decode_int(&data[1 + consumed..]);
    (heightmap, tint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_column_encodes_compactly() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        for z in 0..32 {
            for x in 0..32 {
                chunk.set_height(x, z, 64).unwrap();
                chunk.set_tint(x, z, 0xFF5B9E28).unwrap();
            }
        }
        let data = encode(&chunk);
        assert_eq!(data[0], 0);
        let (heightmap, consumed) = palette::decode_short(&data[1..]);
        assert!(heightmap.iter().all(|&h| h == 64));
        let (tint, _) = palette::decode_int(&data[1 + consumed..]);
        assert!(tint.iter().all(|&t| t == 0xFF5B9E28));
    }
}
