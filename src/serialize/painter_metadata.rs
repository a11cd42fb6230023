//! `WorldPainterMetadata` (`spec.md` §4.4), present only when a chunk carries
//! painter-specific overrides beyond the base terrain.

use bson::{Bson, Document};

use crate::chunk::Chunk;

pub fn encode(chunk: &Chunk) -> Document {
    let mut doc = Document::new();

    let mut water_tints = Document::new();
    for z in 0..32 {
        for x in 0..32 {
            if let Some(hex) = chunk.water_tint_override(x, z).unwrap() {
                water_tints.insert(format!("{x},{z}"), hex);
            }
        }
    }
    if !water_tints.is_empty() {
        doc.insert("WaterTints", water_tints);
    }

    let mut spawn_overrides = Vec::new();
    for z in 0..32 {
        for x in 0..32 {
            let density = chunk.spawn_density_override(x, z).unwrap();
            let tag = chunk.spawn_tag(x, z).unwrap();
            if density.is_some() || tag.is_some() {
                let mut entry = Document::new();
                entry.insert("x", x);
                entry.insert("z", z);
                if let Some(d) = density {
                    entry.insert("density", d as f64);
                }
                if let Some(t) = tag {
                    entry.insert("tag", t);
                }
                spawn_overrides.push(Bson::Document(entry));
            }
        }
    }
    if !spawn_overrides.is_empty() {
        doc.insert("SpawnOverrides", spawn_overrides);
    }

    let markers: Vec<Bson> = chunk
        .prefab_markers()
        .iter()
        .map(|m| {
            let mut d = Document::new();
            d.insert("x", m.x);
            d.insert("y", m.y);
            d.insert("z", m.z);
            d.insert("category", m.category.clone());
            d.insert("path", m.path.clone());
            Bson::Document(d)
        })
        .collect();
    if !markers.is_empty() {
        doc.insert("PrefabMarkers", markers);
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::PrefabMarker;

    #[test]
    fn water_tint_override_is_keyed_by_column() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.set_water_tint_override(5, 6, Some("#112233".to_string())).unwrap();
        let doc = encode(&chunk);
        let tints = doc.get_document("WaterTints").unwrap();
        assert_eq!(tints.get_str("5,6").unwrap(), "#112233");
    }

    #[test]
    fn prefab_markers_round_trip_category_and_path() {
        let mut chunk = Chunk::new(0, 0, 0, 320);
        chunk.add_prefab_marker(PrefabMarker {
            x: 1,
            y: 65,
            z: 2,
            category: "Decoration".to_string(),
            path: "prefabs/oak.hpfb".to_string(),
        });
        let doc = encode(&chunk);
        let markers = doc.get_array("PrefabMarkers").unwrap();
        assert_eq!(markers.len(), 1);
        let m = markers[0].as_document().unwrap();
        assert_eq!(m.get_str("path").unwrap(), "prefabs/oak.hpfb");
    }
}
