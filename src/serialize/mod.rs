//! BSON chunk serializer (`spec.md` §4.4).
//!
//! Composes the fixed `Components` document from a populated [`crate::chunk::Chunk`].
//! Every sub-module here builds one component's `Data` payload; this module
//! only concerns itself with document shape and ordering, which is
//! compatibility-critical (`spec.md` §6).

mod block_chunk;
mod block_health;
mod block_section;
mod entity_chunk;
mod environment_chunk;
mod fluid_section;
mod painter_metadata;

use bson::spec::BinarySubtype;
use bson::{Binary, Bson, Document};

use crate::chunk::{Chunk, Section};
use crate::config::LightingMode;
use crate::error::{Error, Result};

fn binary_doc(data: Vec<u8>) -> Document {
    let mut doc = Document::new();
    doc.insert("Data", Bson::Binary(Binary { subtype: BinarySubtype::Generic, bytes: data }));
    doc
}

/// Builds the full `{Components: {...}}` document for one chunk
/// (`spec.md` §4.4).
pub fn build_document(chunk: &Chunk, lighting: LightingMode) -> Document {
    let mut components = Document::new();
    components.insert("BlockComponentChunk", block_component_chunk());
    components.insert("ChunkColumn", chunk_column(chunk, lighting));
    components.insert("WorldChunk", Document::new());
    components.insert("BlockHealthChunk", binary_doc(block_health::encode(chunk)));
    components.insert("EnvironmentChunk", binary_doc(environment_chunk::encode(chunk)));
    components.insert("BlockChunk", {
        let mut d = Document::new();
        d.insert("Version", 3i32);
        d.insert("Data", Bson::Binary(Binary { subtype: BinarySubtype::Generic, bytes: block_chunk::encode(chunk) }));
        d
    });
    components.insert("EntityChunk", entity_chunk::encode(chunk));
    if chunk.has_painter_metadata() {
        components.insert("WorldPainterMetadata", painter_metadata::encode(chunk));
    }

    let mut top = Document::new();
    top.insert("Components", components);
    top
}

/// Serializes a chunk to raw BSON bytes, ready for Zstd compression
/// (`spec.md` §4.5 `write_chunk` step 1).
pub fn to_bytes(chunk: &Chunk, lighting: LightingMode) -> Result<Vec<u8>> {
    let doc = build_document(chunk, lighting);
    let mut out = Vec::new();
    doc.to_writer(&mut out).map_err(|e| Error::Internal(format!("BSON encode failed: {e}")))?;
    Ok(out)
}

/// Parses a previously-serialized chunk document back out of raw BSON bytes.
pub fn from_bytes(data: &[u8]) -> Result<Document> {
    Document::from_reader(&mut std::io::Cursor::new(data))
        .map_err(|e| Error::Format(format!("BSON decode failed: {e}")))
}

fn binary_data<'a>(doc: &'a Document, key: &str) -> Result<&'a [u8]> {
    doc.get_document(key)
        .and_then(|d| d.get_binary_generic("Data"))
        .map(Vec::as_slice)
        .map_err(|e| Error::Format(format!("missing/malformed {key}.Data: {e}")))
}

/// Reverses [`build_document`], reconstructing a full [`Chunk`] for the
/// configured `(cx, cz)` and Y range (`spec.md` §4.5 `read_chunk`).
pub fn from_document(doc: &Document, cx: i32, cz: i32, min_y: i32, max_y: i32) -> Result<Chunk> {
    let components = doc
        .get_document("Components")
        .map_err(|e| Error::Format(format!("missing Components: {e}")))?;

    let mut chunk = Chunk::new(cx, cz, min_y, max_y);

    let (heightmap, tint) = block_chunk::decode(binary_data(components, "BlockChunk")?);
    for z in 0..32i32 {
        for x in 0..32i32 {
            let i = (z * 32 + x) as usize;
            chunk.set_height(x, z, heightmap[i] as i32)?;
            chunk.set_tint(x, z, tint[i])?;
        }
    }

    let columns = environment_chunk::decode(binary_data(components, "EnvironmentChunk")?)?;
    for z in 0..32i32 {
        for x in 0..32i32 {
            let (env_name, biome_name) = &columns[(z * 32 + x) as usize];
            chunk.set_environment(x, z, env_name.clone())?;
            chunk.set_biome_name(x, z, biome_name.clone())?;
        }
    }

    for (x, y, z, health, last_damage_time) in block_health::decode(binary_data(components, "BlockHealthChunk")?) {
        chunk.upsert_block_health(x, y, z, health, last_damage_time);
    }

    for entity in entity_chunk::decode(components.get_document("EntityChunk").map_err(|e| Error::Format(format!("missing EntityChunk: {e}")))?) {
        chunk.add_entity(entity);
    }

    let chunk_column = components.get_document("ChunkColumn").map_err(|e| Error::Format(format!("missing ChunkColumn: {e}")))?;
    let sections = chunk_column.get_array("Sections").map_err(|e| Error::Format(format!("missing Sections: {e}")))?;
    let mut decoded_sections = Vec::with_capacity(sections.len());
    for section_bson in sections {
        let holder = section_bson.as_document().ok_or_else(|| Error::Format("section entry is not a document".to_string()))?;
        let section_components = holder.get_document("Components").map_err(|e| Error::Format(format!("missing section Components: {e}")))?;
        let (block_indices, rotations) = block_section::decode(binary_data(section_components, "Block")?)?;
        let (fluid_palette, fluid_index, fluid_level) = fluid_section::decode(binary_data(section_components, "Fluid")?)?;
        decoded_sections.push(Section::from_raw(
            block_indices.into_boxed_slice(),
            fluid_palette,
            fluid_index.into_boxed_slice(),
            fluid_level.into_boxed_slice(),
            rotations.into_boxed_slice(),
        ));
    }

    let expected = chunk.sections().len();
    if decoded_sections.len() != expected {
        return Err(Error::Corruption(format!(
            "chunk ({cx}, {cz}) has {} sections, expected {expected}",
            decoded_sections.len()
        )));
    }
    chunk.replace_sections(decoded_sections);

    Ok(chunk)
}

fn block_component_chunk() -> Document {
    let mut d = Document::new();
    d.insert("BlockComponents", Document::new());
    d
}

fn chunk_column(chunk: &Chunk, lighting: LightingMode) -> Document {
    let sections: Vec<Bson> = chunk
        .sections()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let light = block_section::section_light(chunk, i, lighting);
            Bson::Document(section_holder(section, light))
        })
        .collect();
    let mut d = Document::new();
    d.insert("Sections", Bson::Array(sections));
    d
}

fn section_holder(section: &crate::chunk::Section, light: block_section::SectionLight) -> Document {
    let mut components = Document::new();
    components.insert("ChunkSection", Document::new());
    components.insert("BlockPhysics", binary_doc(vec![0u8]));
    components.insert("Fluid", binary_doc(fluid_section::encode(section)));
    components.insert("Block", {
        let mut d = Document::new();
        d.insert("Version", 6i32);
        d.insert(
            "Data",
            Bson::Binary(Binary { subtype: BinarySubtype::Generic, bytes: block_section::encode(section, light) }),
        );
        d
    });
    let mut holder = Document::new();
    holder.insert("Components", components);
    holder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;

    #[test]
    fn component_order_is_fixed() {
        let chunk = Chunk::new(0, 0, 0, 320);
        let doc = build_document(&chunk, LightingMode::FullyLit);
        let components = doc.get_document("Components").unwrap();
        let keys: Vec<&str> = components.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "BlockComponentChunk",
                "ChunkColumn",
                "WorldChunk",
                "BlockHealthChunk",
                "EnvironmentChunk",
                "BlockChunk",
                "EntityChunk",
            ]
        );
    }

    #[test]
    fn painter_metadata_included_only_when_populated() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.set_spawn_tag(0, 0, Some("Boss".to_string())).unwrap();
        let doc = build_document(&chunk, LightingMode::FullyLit);
        assert!(doc.get_document("Components").unwrap().contains_key("WorldPainterMetadata"));
    }

    #[test]
    fn bson_round_trips_through_bytes() {
        let chunk = Chunk::new(1, -2, 0, 320);
        let bytes = to_bytes(&chunk, LightingMode::FullyLit).unwrap();
        let doc = from_bytes(&bytes).unwrap();
        assert!(doc.contains_key("Components"));
    }

    #[test]
    fn from_document_reverses_build_document() {
        use crate::chunk::Entity;

        let mut chunk = Chunk::new(1, -2, 0, 320);
        chunk.set_height(3, 4, 64).unwrap();
        chunk.set_tint(3, 4, 0xFF112233).unwrap();
        chunk.set_environment(3, 4, "Env_Zone1_Ocean").unwrap();
        chunk.set_block(3, 64, 4, "Rock_Stone").unwrap();
        chunk.set_fluid(5, 10, 6, "Water_Source", 5).unwrap();
        chunk.set_rotation(3, 64, 4, 21).unwrap();
        chunk.upsert_block_health(3, 64, 4, 0.5, 42);
        chunk.add_entity(Entity::player_spawn(10, 64, 10));

        let bytes = to_bytes(&chunk, LightingMode::FullyLit).unwrap();
        let doc = from_bytes(&bytes).unwrap();
        let restored = from_document(&doc, 1, -2, 0, 320).unwrap();

        assert_eq!(restored.height(3, 4).unwrap(), 64);
        assert_eq!(restored.tint(3, 4).unwrap(), 0xFF112233);
        assert_eq!(restored.environment(3, 4).unwrap(), "Env_Zone1_Ocean");
        assert_eq!(restored.biome_name(3, 4).unwrap(), "Zone1_Ocean");
        assert_eq!(restored.sections()[2].block_id(3, 0, 4), "Rock_Stone");
        assert_eq!(restored.sections()[2].rotation(3, 0, 4), 21);
        assert_eq!(restored.sections()[0].fluid_id(5, 10, 6), Some("Water_Source"));
        assert_eq!(restored.sections()[0].fluid_level(5, 10, 6), 5);
        assert_eq!(restored.block_health().count(), 1);
        assert_eq!(restored.entities().len(), 1);
        assert_eq!(restored.entities()[0].type_id, "PlayerSpawn");
    }
}
