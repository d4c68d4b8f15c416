use lectern::artifact::{Artifact, ArtifactKind};
use lectern::store::{Bucket, DedupEngine, PlacementDecision, RecordStore, SledRecordStore, StoredRecord};
use lectern::warnings::CollectingSink;
use tempfile::TempDir;

fn book(page: &str, precedence: u8, provenance: &str) -> Artifact {
    Artifact::new(
        ArtifactKind::MultiPageDocument,
        Some("Notes".to_string()),
        Some("Alex".to_string()),
        precedence,
        vec![page.to_string()],
        provenance.to_string(),
    )
}

#[test]
fn test_index_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store");

    {
        let mut engine = DedupEngine::open(SledRecordStore::new(&path).unwrap()).unwrap();
        assert_eq!(engine.ingest(&book("a", 2, "first")).unwrap(), PlacementDecision::NewPrimary);
        assert_eq!(engine.ingest(&book("b", 0, "second")).unwrap(), PlacementDecision::NewPrimary);
        engine.flush().unwrap();
    }

    let mut engine = DedupEngine::open(SledRecordStore::new(&path).unwrap()).unwrap();
    assert_eq!(engine.unique_count(), 2);
    assert_eq!(engine.ingest(&book("b", 1, "third")).unwrap(), PlacementDecision::NewSecondary);
    assert_eq!(engine.ingest(&book("a", 0, "fourth")).unwrap(), PlacementDecision::Accepted);

    let primaries = engine
        .store()
        .load_all(ArtifactKind::MultiPageDocument, Bucket::Primary)
        .unwrap();
    let provenance: Vec<&str> = primaries.iter().map(|(_, r)| r.provenance.as_str()).collect();
    assert_eq!(provenance, vec!["second", "fourth"]);

    let secondaries = engine
        .store()
        .load_all(ArtifactKind::MultiPageDocument, Bucket::Secondary)
        .unwrap();
    assert_eq!(secondaries.len(), 2);
    // sequence numbers keep counting from where the first run stopped
    assert!(secondaries.iter().any(|(_, r)| r.sequence == 2));
    assert_eq!(engine.placement_violations(), 0);
}

#[test]
fn test_reconcile_repairs_store_written_out_of_band() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledRecordStore::new(temp_dir.path().join("store")).unwrap();

    let copy = StoredRecord::from_artifact(&book("x", 1, "copy"), 0);
    let original = StoredRecord::from_artifact(&book("x", 0, "original"), 1);
    let orphan = StoredRecord::from_artifact(&book("y", 2, "orphan"), 2);
    store.store(Bucket::Primary, &copy).unwrap();
    store.store(Bucket::Secondary, &original).unwrap();
    store.store(Bucket::Secondary, &orphan).unwrap();

    let mut engine = DedupEngine::open(&store).unwrap();
    assert_eq!(engine.placement_violations(), 1);

    let mut sink = CollectingSink::new();
    let report = engine.reconcile(&mut sink).unwrap();
    assert_eq!(report.swaps, 1);
    assert_eq!(report.promotions, 1);
    assert_eq!(engine.placement_violations(), 0);

    let primaries = store
        .load_all(ArtifactKind::MultiPageDocument, Bucket::Primary)
        .unwrap();
    let provenance: Vec<&str> = primaries.iter().map(|(_, r)| r.provenance.as_str()).collect();
    assert_eq!(provenance, vec!["original", "orphan"]);

    let again = engine.reconcile(&mut sink).unwrap();
    assert!(again.is_noop());
}

#[test]
fn test_signs_and_books_dedup_separately() {
    let temp_dir = TempDir::new().unwrap();
    let mut engine = DedupEngine::open(SledRecordStore::new(temp_dir.path()).unwrap()).unwrap();
    let sign = Artifact::new(
        ArtifactKind::SignageBoard,
        None,
        None,
        0,
        vec!["a".to_string()],
        "sign".to_string(),
    );
    assert_eq!(engine.ingest(&book("a", 0, "book")).unwrap(), PlacementDecision::NewPrimary);
    assert_eq!(engine.ingest(&sign).unwrap(), PlacementDecision::NewPrimary);

    let counts = engine.counts();
    assert_eq!(counts.get(&(ArtifactKind::SignageBoard, Bucket::Primary)), Some(&1));
    assert_eq!(counts.get(&(ArtifactKind::MultiPageDocument, Bucket::Primary)), Some(&1));
}
