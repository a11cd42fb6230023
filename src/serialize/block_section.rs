//! Per-section `Block` document, codec version 6 (`spec.md` §4.4 point by
//! point, "Block section").

use crate::chunk::{Chunk, Section};
use crate::codec::voxel;
use crate::config::LightingMode;
use crate::registry::block;

/// Whether a section's light octree is emitted fully lit or fully dark
/// (`spec.md` §4.6 "Lighting approximation").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLight {
    FullyLit,
    FullyDark,
}

/// Computes a section's light classification. `LightingMode::FullyLit`
/// always returns `FullyLit`, matching the observed default behavior
/// (`spec.md` §9 Open Questions); `HeightmapAware` is the guarded stricter
/// mode that compares the section's Y range against every column's height.
pub fn section_light(chunk: &Chunk, section_index: usize, mode: LightingMode) -> SectionLight {
    if mode == LightingMode::FullyLit {
        return SectionLight::FullyLit;
    }
    let y0 = chunk.min_y + section_index as i32 * 32;
    let y1 = y0 + 32;

    let mut min_h = i32::MAX;
    let mut max_h = i32::MIN;
    for z in 0..32 {
        for x in 0..32 {
            let h = chunk.height(x, z).unwrap();
            min_h = min_h.min(h);
            max_h = max_h.max(h);
        }
    }

    if y1 <= min_h {
        SectionLight::FullyDark
    } else {
        // Entirely at/above every column, or mixed: both emit fully-lit
        // (`spec.md` §4.6: "intentional simplification").
        let _ = y0 >= max_h;
        SectionLight::FullyLit
    }
}

fn encode_light_octree(light: SectionLight) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_le_bytes()); // change_id
    out.push(1u8); // has_data = true
    out.extend_from_slice(&17i32.to_le_bytes()); // len
    out.push(0u8); // mask
    let value: u16 = match light {
        SectionLight::FullyLit => 0xF000,
        SectionLight::FullyDark => 0x0000,
    };
    for _ in 0..8 {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Builds the `Data` payload for one section's `Block` component.
pub fn encode(section: &Section, light: SectionLight) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0i32.to_le_bytes()); // migration_version

    if section.is_all_empty_blocks() {
        out.push(voxel::PaletteType::Empty as u8);
    } else {
        let (palette, local_indices) = voxel::build_palette(section.block_indices());
        let counts = voxel::occurrence_counts(&local_indices, palette.len());
        let ty = voxel::select_type(palette.len());
        out.push(ty as u8);
        let ids: Vec<&str> = palette.iter().map(|&idx| block::by_index(idx).map(|b| b.id).unwrap_or("Empty")).collect();
        voxel::write_string_palette(&mut out, &ids, &counts);
        out.extend_from_slice(&voxel::encode_indices(&local_indices, ty));

        out.extend_from_slice(&0u16.to_le_bytes()); // ticking_cardinality
        out.extend_from_slice(&0u16.to_le_bytes()); // ticking_bitset_len
    }

    out.push(0u8); // filler sub-section: empty

    if section.has_any_rotation() {
        let (palette, local_indices) = voxel::build_palette(section.rotations());
        let counts = voxel::occurrence_counts(&local_indices, palette.len());
        let ty = voxel::select_type(palette.len());
        out.push(ty as u8);
        voxel::write_byte_palette(&mut out, &palette, &counts);
        out.extend_from_slice(&voxel::encode_indices(&local_indices, ty));
    } else {
        out.push(0u8);
    }

    out.extend_from_slice(&encode_light_octree(light)); // local light
    out.extend_from_slice(&encode_light_octree(light)); // global light

    out.extend_from_slice(&0u16.to_le_bytes()); // local_changes
    out.extend_from_slice(&0u16.to_le_bytes()); // global_changes

    out
}

const SECTION_VOXELS: usize = crate::chunk::section::SECTION_VOXELS;

fn index_stream_len(ty: voxel::PaletteType, count: usize) -> usize {
    match ty {
        voxel::PaletteType::Empty => 0,
        voxel::PaletteType::HalfByte => count.div_ceil(2),
        voxel::PaletteType::Byte => count,
        voxel::PaletteType::Short => count * 2,
    }
}

fn palette_type_from_byte(b: u8) -> voxel::PaletteType {
    match b {
        0 => voxel::PaletteType::Empty,
        1 => voxel::PaletteType::HalfByte,
        2 => voxel::PaletteType::Byte,
        _ => voxel::PaletteType::Short,
    }
}

/// Reverses [`encode`], reconstructing per-voxel registry indices and
/// rotation bytes in traversal order.
pub fn decode(data: &[u8]) -> crate::error::Result<(Vec<u16>, Vec<u8>)> {
    let mut cursor = 4; // skip migration_version

    let block_ty = palette_type_from_byte(data[cursor]);
    cursor += 1;
    let block_indices: Vec<u16> = if block_ty == voxel::PaletteType::Empty {
        vec![block::EMPTY_INDEX; SECTION_VOXELS]
    } else {
        let entries = voxel::read_string_palette(data, &mut cursor)?;
        let len = index_stream_len(block_ty, SECTION_VOXELS);
        let local = voxel::decode_indices(&data[cursor..cursor + len], block_ty, SECTION_VOXELS);
        cursor += len;
        cursor += 4; // ticking_cardinality + ticking_bitset_len
        local
            .into_iter()
            .map(|i| block::by_id(&entries[i as usize].0).map(|(idx, _)| idx).unwrap_or(block::EMPTY_INDEX))
            .collect()
    };

    cursor += 1; // filler byte

    let rot_ty = palette_type_from_byte(data[cursor]);
    cursor += 1;
    let rotations: Vec<u8> = if rot_ty == voxel::PaletteType::Empty {
        vec![0u8; SECTION_VOXELS]
    } else {
        let entries = voxel::read_byte_palette(data, &mut cursor);
        let len = index_stream_len(rot_ty, SECTION_VOXELS);
        let local = voxel::decode_indices(&data[cursor..cursor + len], rot_ty, SECTION_VOXELS);
        local.into_iter().map(|i| entries[i as usize].0).collect()
    };

    Ok((block_indices, rotations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_empty_section_emits_minimal_trailer() {
        let section = Section::new();
        let data = encode(&section, SectionLight::FullyLit);
        // migration_version(4) + type byte(1) + filler(1) + rotation type(1)
        assert_eq!(data[4], voxel::PaletteType::Empty as u8);
        assert_eq!(data[5], 0); // filler
        assert_eq!(data[6], 0); // rotation: no ticking fields in between
    }

    #[test]
    fn populated_section_round_trips_block_palette() {
        let mut section = Section::new();
        section.set_block(0, 0, 0, "Rock_Stone").unwrap();
        section.set_block(1, 0, 0, "Soil_Grass").unwrap();
        let data = encode(&section, SectionLight::FullyLit);
        assert_eq!(data[4], voxel::PaletteType::HalfByte as u8);
    }

    #[test]
    fn rotation_palette_present_only_when_used() {
        let mut section = Section::new();
        section.set_rotation(0, 0, 0, 21).unwrap();
        let data = encode(&section, SectionLight::FullyLit);
        // For an all-empty block section, the rotation type byte sits right
        // after the filler byte.
        assert_ne!(data[5 + 1], 0);
    }

    #[test]
    fn decode_reverses_encode_bit_for_bit() {
        let mut section = Section::new();
        section.set_block(0, 0, 0, "Rock_Stone").unwrap();
        section.set_block(5, 10, 7, "Soil_Grass").unwrap();
        section.set_rotation(5, 10, 7, 37).unwrap();
        let data = encode(&section, SectionLight::FullyLit);
        let (block_indices, rotations) = decode(&data).unwrap();
        assert_eq!(block_indices, section.block_indices());
        assert_eq!(rotations, section.rotations());
    }
}
