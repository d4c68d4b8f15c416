//! Extraction runs
//!
//! Drives walker → dedup engine for each source tree of a run, then runs the
//! reconciliation pass once all trees are in. A storage failure costs only the
//! record it happened on; the walk carries on.

use crate::error::ApiError;
use crate::schema::SchemaGeneration;
use crate::store::{DedupEngine, PlacementDecision, ReconcileReport, RecordStore};
use crate::tree::{Tag, TreeNode};
use crate::types::DEFAULT_MAX_DEPTH;
use crate::walker::ContainerWalker;
use crate::warnings::{Severity, WarningSink};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Per-tree outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeReport {
    pub label: String,
    pub generation: Option<SchemaGeneration>,
    pub found: usize,
    pub new_primary: usize,
    pub new_secondary: usize,
    pub accepted: usize,
    pub failed: usize,
}

impl TreeReport {
    fn record(&mut self, decision: PlacementDecision) {
        match decision {
            PlacementDecision::NewPrimary => self.new_primary += 1,
            PlacementDecision::NewSecondary => self.new_secondary += 1,
            PlacementDecision::Accepted => self.accepted += 1,
        }
    }
}

/// Whole-run outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub trees: Vec<TreeReport>,
    pub reconcile: ReconcileReport,
}

impl RunReport {
    pub fn found(&self) -> usize {
        self.trees.iter().map(|t| t.found).sum()
    }

    pub fn failed(&self) -> usize {
        self.trees.iter().map(|t| t.failed).sum()
    }
}

/// One extraction run over a dedup engine
pub struct Extraction<S: RecordStore> {
    engine: DedupEngine<S>,
    max_depth: usize,
    trees: Vec<TreeReport>,
}

impl<S: RecordStore> Extraction<S> {
    pub fn new(engine: DedupEngine<S>) -> Self {
        Self {
            engine,
            max_depth: DEFAULT_MAX_DEPTH,
            trees: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn engine(&self) -> &DedupEngine<S> {
        &self.engine
    }

    /// Walk one source tree and ingest every artifact found in it
    pub fn ingest_tree<N: TreeNode>(
        &mut self,
        root: &N,
        generation: SchemaGeneration,
        label: &str,
        sink: &mut dyn WarningSink,
    ) -> &TreeReport {
        let mut report = TreeReport {
            label: label.to_string(),
            generation: Some(generation),
            ..TreeReport::default()
        };
        let mut failures = Vec::new();

        let walker =
            ContainerWalker::new(root, generation, label, &mut *sink).with_max_depth(self.max_depth);
        for found in walker {
            report.found += 1;
            match self.engine.ingest(&found.artifact) {
                Ok(decision) => report.record(decision),
                Err(e) => {
                    report.failed += 1;
                    failures.push(format!(
                        "failed to store {} from {}: {}",
                        found.artifact.kind.as_str(),
                        found.artifact.provenance,
                        e
                    ));
                }
            }
        }
        for failure in failures {
            sink.emit(Severity::Error, failure);
        }

        info!(
            label = %report.label,
            found = report.found,
            new_primary = report.new_primary,
            new_secondary = report.new_secondary,
            accepted = report.accepted,
            failed = report.failed,
            "source tree finished"
        );
        self.trees.push(report);
        &self.trees[self.trees.len() - 1]
    }

    /// Reconcile and flush; hands the engine back for export or status
    pub fn finish(mut self, sink: &mut dyn WarningSink) -> Result<(RunReport, DedupEngine<S>), ApiError> {
        let reconcile = self.engine.reconcile(sink)?;
        self.engine.flush()?;
        Ok((
            RunReport {
                trees: self.trees,
                reconcile,
            },
            self.engine,
        ))
    }
}

/// Read an already-decoded tree stored as JSON
pub fn load_tree(path: &Path) -> Result<Tag, ApiError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ApiError::InputError(format!("{}: {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| ApiError::InputError(format!("{}: {}", path.display(), e)))?;
    Ok(Tag::from_json(value))
}

/// Generation implied by a root-level `DataVersion`, if the tree has one
pub fn detect_generation<N: TreeNode>(root: &N) -> Option<SchemaGeneration> {
    root.get_child("DataVersion")
        .or_else(|| root.get_path(&["Data", "DataVersion"]))
        .and_then(|v| v.as_int())
        .map(SchemaGeneration::from_data_version)
}
