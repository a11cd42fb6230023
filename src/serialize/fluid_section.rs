//! Per-section `Fluid` document (`spec.md` §4.4).

use crate::chunk::Section;
use crate::codec::voxel;
use crate::registry::block;

/// Builds the `Data` payload for one section's `Fluid` component. Always a
/// `HalfByte` voxel palette when non-empty — fluid cardinality per section
/// is bounded well under 16 in practice and the format pins the type rather
/// than selecting it by cardinality, unlike the block/rotation palettes.
pub fn encode(section: &Section) -> Vec<u8> {
    let mut out = Vec::new();

    if section.is_all_empty_fluids() {
        out.push(0u8);
        out.push(0u8); // bool false
        return out;
    }

    let palette = section.fluid_palette();
    let indices = section.fluid_indices();
    let counts = voxel::occurrence_counts(indices, palette.len());

    out.push(voxel::PaletteType::HalfByte as u8);
    let ids: Vec<&str> = palette.iter().map(String::as_str).collect();
    voxel::write_string_palette(&mut out, &ids, &counts);
    out.extend_from_slice(&voxel::encode_indices_halfbyte(indices));

    out.push(1u8); // has_levels = true

    let levels: Vec<u8> = (0..indices.len())
        .map(|i| {
            let stored = section.fluid_levels()[i];
            if stored == 0 && indices[i] != 0 {
                block::default_level(&palette[indices[i] as usize])
            } else {
                stored
            }
        })
        .collect();
    out.extend_from_slice(&voxel::encode_fluid_levels(&levels));

    out
}

const SECTION_VOXELS: usize = crate::chunk::section::SECTION_VOXELS;

/// Reverses [`encode`], returning `(fluid_palette, fluid_index, fluid_level)`
/// ready for [`Section::from_raw`](crate::chunk::Section).
pub fn decode(data: &[u8]) -> crate::error::Result<(Vec<String>, Vec<u16>, Vec<u8>)> {
    if data[0] == 0 {
        return Ok((vec!["Empty".to_string()], vec![0u16; SECTION_VOXELS], vec![0u8; SECTION_VOXELS]));
    }

    let mut cursor = 1usize;
    let entries = voxel::read_string_palette(data, &mut cursor)?;
    let palette: Vec<String> = entries.into_iter().map(|(id, _)| id).collect();

    let index_len = SECTION_VOXELS.div_ceil(2);
    let fluid_index = voxel::decode_indices_halfbyte(&data[cursor..cursor + index_len], SECTION_VOXELS);
    cursor += index_len;

    cursor += 1; // has_levels
    let fluid_level = voxel::decode_fluid_levels(&data[cursor..], SECTION_VOXELS);

    Ok((palette, fluid_index, fluid_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fluid_section_is_minimal() {
        let section = Section::new();
        assert_eq!(encode(&section), vec![0u8, 0u8]);
    }

    #[test]
    fn single_water_voxel_defaults_to_level_one() {
        let mut section = Section::new();
        section.set_fluid(0, 0, 0, "Water_Source", 0).unwrap();
        let data = encode(&section);
        assert_eq!(data[0], voxel::PaletteType::HalfByte as u8);
        // palette size 2 (Empty, Water_Source)
        let palette_size = u16::from_le_bytes([data[1], data[2]]);
        assert_eq!(palette_size, 2);

        // 32768 voxels packed 2-per-byte = 16384 bytes of index stream.
        let mut cursor = 3usize;
        cursor += 1 + 2 + 12 + 2; // Empty entry: index, utf len+bytes, count
        cursor += 1 + 2 + 13 + 2; // Water_Source entry
        let index_stream_len = section.block_indices().len().div_ceil(2);
        assert_eq!(index_stream_len, 16384);
        cursor += index_stream_len;
        assert_eq!(data[cursor], 1); // has_levels
        cursor += 1;
        let levels = &data[cursor..];
        assert_eq!(levels.len(), 16384);
        // voxel 0 is even -> low nibble of byte 0.
        assert_eq!(levels[0] & 0xF, 1);
    }

    #[test]
    fn decode_reverses_encode() {
        let mut section = Section::new();
        section.set_fluid(0, 0, 0, "Water_Source", 5).unwrap();
        section.set_fluid(1, 0, 0, "Lava_Source", 3).unwrap();
        let data = encode(&section);
        let (palette, fluid_index, fluid_level) = decode(&data).unwrap();
        assert_eq!(palette, section.fluid_palette().to_vec());
        assert_eq!(fluid_index, section.fluid_indices());
        assert_eq!(fluid_level, section.fluid_levels());
    }
}
