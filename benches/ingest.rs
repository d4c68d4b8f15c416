//! Benchmarks for walking and ingesting container-heavy trees.
//!
//! Run with: cargo bench --bench ingest

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lectern::extract::Extraction;
use lectern::schema::SchemaGeneration;
use lectern::store::{DedupEngine, MemoryRecordStore};
use lectern::tree::Tag;
use lectern::walker::ContainerWalker;
use lectern::warnings::CollectingSink;
use serde_json::json;

/// A region with `chests` chests, each holding books and a shulker box of
/// more books. One book in four repeats an earlier text.
fn build_region(chests: usize) -> Tag {
    let book = |n: usize, slot: usize| {
        json!({
            "id": "minecraft:written_book", "Count": 1, "Slot": slot,
            "tag": { "title": format!("Vol {}", n), "author": "Scribe",
                     "generation": n % 3, "pages": [format!("page {}", n % (chests * 3).max(1))] }
        })
    };
    let entities: Vec<serde_json::Value> = (0..chests)
        .map(|i| {
            json!({
                "id": "minecraft:chest", "x": i, "y": 64, "z": 0,
                "Items": [
                    book(i * 4, 0),
                    book(i * 4 + 1, 1),
                    { "id": "minecraft:shulker_box", "Slot": 2,
                      "tag": { "BlockEntityTag": { "Items": [book(i * 4 + 2, 0), book(i * 4 + 3, 1)] } } }
                ]
            })
        })
        .collect();
    Tag::from_json(json!({ "Level": { "TileEntities": entities } }))
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    for chests in [100, 1_000] {
        let region = build_region(chests);
        group.bench_with_input(BenchmarkId::new("legacy_region", chests), &chests, |b, _| {
            b.iter(|| {
                let mut sink = CollectingSink::new();
                let count = ContainerWalker::new(&region, SchemaGeneration::Legacy, "r", &mut sink).count();
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for chests in [100, 1_000] {
        let region = build_region(chests);
        group.bench_with_input(BenchmarkId::new("memory_store", chests), &chests, |b, _| {
            b.iter(|| {
                let engine = DedupEngine::open(MemoryRecordStore::new()).unwrap();
                let mut extraction = Extraction::new(engine);
                let mut sink = CollectingSink::new();
                extraction.ingest_tree(&region, SchemaGeneration::Legacy, "r", &mut sink);
                let (report, _) = extraction.finish(&mut sink).unwrap();
                black_box(report.found())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_walk, bench_ingest);
criterion_main!(benches);
