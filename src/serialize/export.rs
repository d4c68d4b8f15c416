//! Export plan: which commands go into which function file.

use super::{serialize, serialize_placed, LayoutAssigner, SerializationTarget};
use crate::artifact::ArtifactKind;
use crate::error::StorageError;
use crate::store::{Bucket, RecordStore, StoredRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One output file and its command lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub file_name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPlan {
    pub target: SerializationTarget,
    pub files: Vec<ExportFile>,
}

impl ExportPlan {
    pub fn line_count(&self) -> usize {
        self.files.iter().map(|f| f.lines.len()).sum()
    }
}

fn records<S: RecordStore>(
    store: &S,
    kind: ArtifactKind,
    bucket: Bucket,
) -> Result<Vec<StoredRecord>, StorageError> {
    Ok(store
        .load_all(kind, bucket)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// Build the files for one target from the store's current contents.
///
/// Books: primary records, and secondary ones when `include_duplicates`.
/// Signs: every stored copy in encounter order, laid out so copies of the
/// same text stack beside each other.
pub fn plan_export<S: RecordStore>(
    store: &S,
    target: SerializationTarget,
    include_duplicates: bool,
) -> Result<ExportPlan, StorageError> {
    let stem = target.file_stem();
    let mut files = Vec::new();

    let books = records(store, ArtifactKind::MultiPageDocument, Bucket::Primary)?;
    files.push(ExportFile {
        file_name: format!("books_{}.mcfunction", stem),
        lines: books.iter().map(|r| serialize(r, target)).collect(),
    });

    if include_duplicates {
        let duplicates = records(store, ArtifactKind::MultiPageDocument, Bucket::Secondary)?;
        files.push(ExportFile {
            file_name: format!("books_duplicates_{}.mcfunction", stem),
            lines: duplicates.iter().map(|r| serialize(r, target)).collect(),
        });
    }

    let mut signs = records(store, ArtifactKind::SignageBoard, Bucket::Primary)?;
    signs.extend(records(store, ArtifactKind::SignageBoard, Bucket::Secondary)?);
    signs.sort_by_key(|r| r.sequence);
    let mut layout = LayoutAssigner::new();
    files.push(ExportFile {
        file_name: format!("signs_{}.mcfunction", stem),
        lines: signs
            .iter()
            .map(|r| serialize_placed(r, target, layout.next_placement(r.fingerprint)))
            .collect(),
    });

    files.retain(|f| !f.lines.is_empty());
    Ok(ExportPlan { target, files })
}

/// Write a plan's files into `dir`, returning the paths written
pub fn write_export(plan: &ExportPlan, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(plan.files.len());
    for file in &plan.files {
        let path = dir.join(&file.file_name);
        let mut body = file.lines.join("\n");
        body.push('\n');
        std::fs::write(&path, body)?;
        tracing::info!("Wrote {} commands to {}", file.lines.len(), path.display());
        written.push(path);
    }
    Ok(written)
}
