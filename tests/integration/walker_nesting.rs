use lectern::artifact::ArtifactKind;
use lectern::extract::{detect_generation, Extraction};
use lectern::schema::SchemaGeneration;
use lectern::store::{DedupEngine, MemoryRecordStore};
use lectern::tree::Tag;
use lectern::walker::ContainerWalker;
use lectern::warnings::{CollectingSink, Severity};
use serde_json::json;

fn modern_book(title: &str, page: &str, generation: i64) -> serde_json::Value {
    json!({
        "id": "minecraft:written_book",
        "count": 1,
        "components": { "minecraft:written_book_content": {
            "title": { "raw": title },
            "author": "Alex",
            "generation": generation,
            "pages": [{ "raw": page }]
        }}
    })
}

fn modern_region() -> Tag {
    Tag::from_json(json!({
        "DataVersion": 3953,
        "block_entities": [
            {
                "id": "minecraft:chest", "x": 0, "y": 70, "z": 0,
                "Items": [
                    { "Slot": 0, "id": "minecraft:red_shulker_box", "count": 1,
                      "components": { "minecraft:container": [
                          { "slot": 2, "item": modern_book("Orders", "march", 1) }
                      ]}},
                    { "Slot": 1, "id": "minecraft:oak_planks", "count": 12 }
                ]
            },
            {
                "id": "minecraft:oak_sign", "x": 2, "y": 70, "z": 0,
                "front_text": { "messages": ["\"North\"", "\"\"", "\"\"", "\"\""] },
                "back_text": { "messages": ["\"\"", "\"\"", "\"\"", "\"\""] }
            }
        ],
        "Entities": [
            { "id": "minecraft:item_frame", "Pos": [1.5, 71.0, 0.5], "Item": modern_book("Orders", "march", 0) }
        ]
    }))
}

#[test]
fn test_modern_region_yields_nested_books_and_signs() {
    let region = modern_region();
    assert_eq!(detect_generation(&region), Some(SchemaGeneration::Modern));

    let mut sink = CollectingSink::new();
    let found: Vec<_> =
        ContainerWalker::new(&region, SchemaGeneration::Modern, "r.0.0.mca", &mut sink).collect();

    assert_eq!(found.len(), 3);
    let boxed = found
        .iter()
        .find(|f| f.artifact.provenance.contains("red_shulker_box"))
        .unwrap();
    assert_eq!(
        boxed.artifact.provenance,
        "r.0.0.mca > chest at (0, 70, 0) > slot 0 > red_shulker_box > slot 2"
    );
    assert_eq!(boxed.artifact.precedence, 1);

    let signs: Vec<_> = found
        .iter()
        .filter(|f| f.artifact.kind == ArtifactKind::SignageBoard)
        .collect();
    assert_eq!(signs.len(), 1);
    assert!(sink.warnings.is_empty());
}

#[test]
fn test_copy_before_original_ends_with_original_primary() {
    let region = modern_region();
    let engine = DedupEngine::open(MemoryRecordStore::new()).unwrap();
    let mut extraction = Extraction::new(engine);
    let mut sink = CollectingSink::new();

    let tree = extraction
        .ingest_tree(&region, SchemaGeneration::Modern, "r.0.0.mca", &mut sink)
        .clone();
    assert_eq!(tree.found, 3);
    assert_eq!(tree.failed, 0);

    let (report, engine) = extraction.finish(&mut sink).unwrap();
    assert_eq!(report.found(), 3);
    assert_eq!(engine.placement_violations(), 0);
    assert_eq!(engine.unique_count(), 2);
    assert_eq!(sink.count(Severity::Error), 0);
}

#[test]
fn test_runaway_nesting_is_cut_off_with_warning() {
    let mut nested = modern_book("Core", "deep", 0);
    for _ in 0..100 {
        nested = json!({
            "id": "minecraft:bundle", "count": 1,
            "components": { "minecraft:bundle_contents": [nested] }
        });
    }
    let chest = Tag::from_json(json!({
        "id": "minecraft:chest",
        "Items": [{ "Slot": 0, "id": "minecraft:bundle", "count": 1,
                    "components": { "minecraft:bundle_contents": [nested] } }]
    }));

    let mut sink = CollectingSink::new();
    let found: Vec<_> = ContainerWalker::new(&chest, SchemaGeneration::Modern, "t", &mut sink)
        .with_max_depth(16)
        .collect();
    assert!(found.is_empty());
    assert_eq!(sink.count(Severity::Warning), 1);
}
