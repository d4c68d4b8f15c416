use lectern::extract::Extraction;
use lectern::schema::SchemaGeneration;
use lectern::serialize::{plan_export, unescape_outer, unwrap_structural, write_export, SerializationTarget};
use lectern::store::{DedupEngine, MemoryRecordStore};
use lectern::tree::Tag;
use lectern::warnings::CollectingSink;
use serde_json::json;
use tempfile::TempDir;

fn sign(x: i64, text: &str) -> serde_json::Value {
    json!({
        "id": "Sign", "x": x, "y": 64, "z": 0,
        "Text1": format!("{{\"text\":\"{}\"}}", text), "Text2": "", "Text3": "", "Text4": ""
    })
}

fn populated() -> DedupEngine<MemoryRecordStore> {
    let chunk = Tag::from_json(json!({
        "Level": { "TileEntities": [
            sign(0, "Inn"),
            sign(1, "Market"),
            sign(2, "Inn"),
            { "id": "minecraft:chest", "x": 3, "y": 64, "z": 0, "Items": [
                { "id": "minecraft:written_book", "Count": 1, "Slot": 0,
                  "tag": { "title": "Rules", "author": "Keeper", "generation": 0,
                           "pages": ["No \"running\" in C:\\halls"] } }
            ]}
        ]}
    }));
    let engine = DedupEngine::open(MemoryRecordStore::new()).unwrap();
    let mut extraction = Extraction::new(engine);
    let mut sink = CollectingSink::new();
    extraction.ingest_tree(&chunk, SchemaGeneration::Legacy, "c.0.0", &mut sink);
    let (_, engine) = extraction.finish(&mut sink).unwrap();
    engine
}

#[test]
fn test_duplicate_signs_stack_beside_their_first_copy() {
    let engine = populated();
    let plan = plan_export(engine.store(), SerializationTarget::V1_13, true).unwrap();
    let signs = plan
        .files
        .iter()
        .find(|f| f.file_name == "signs_1_13.mcfunction")
        .unwrap();
    assert_eq!(signs.lines.len(), 3);

    let inn: Vec<&String> = signs.lines.iter().filter(|l| l.contains("Inn")).collect();
    assert_eq!(inn.len(), 2);
    let column = |line: &str| line.split(' ').nth(1).unwrap().to_string();
    assert_eq!(column(inn[0]), column(inn[1]));
    assert!(inn[0].contains(" ~0 minecraft:sign{") || inn[1].contains(" ~0 minecraft:sign{"));
    assert!(inn[0].contains(" ~1 minecraft:sign{") || inn[1].contains(" ~1 minecraft:sign{"));
}

#[test]
fn test_book_page_text_survives_every_target() {
    let engine = populated();
    let page = "No \"running\" in C:\\halls";
    for target in SerializationTarget::ALL {
        let plan = plan_export(engine.store(), target, false).unwrap();
        let books = &plan.files[0];
        assert_eq!(books.lines.len(), 1);
        let line = &books.lines[0];

        let start = line.find("pages:[").unwrap() + "pages:[".len();
        let end = line.rfind(']').unwrap();
        let end = if target == SerializationTarget::V1_20_5 {
            line[..end].rfind(']').unwrap()
        } else {
            end
        };
        let quoted = &line[start..end];
        let structural = unescape_outer(quoted, target).unwrap();
        assert_eq!(unwrap_structural(&structural), page, "target {}", target);
    }
}

#[test]
fn test_written_files_per_target() {
    let temp_dir = TempDir::new().unwrap();
    let engine = populated();
    for target in [SerializationTarget::V1_12, SerializationTarget::V1_20_5] {
        let plan = plan_export(engine.store(), target, true).unwrap();
        write_export(&plan, temp_dir.path()).unwrap();
    }
    let modern = std::fs::read_to_string(temp_dir.path().join("signs_1_20_5.mcfunction")).unwrap();
    assert_eq!(modern.lines().count(), 3);
    assert!(modern.lines().all(|l| l.contains("back_text")));

    let legacy = std::fs::read_to_string(temp_dir.path().join("books_1_12.mcfunction")).unwrap();
    assert!(legacy.starts_with("give @p written_book 1 0 {title:\"Rules\""));
    // no duplicate books were found, so no duplicates file
    assert!(!temp_dir.path().join("books_duplicates_1_12.mcfunction").exists());
}
