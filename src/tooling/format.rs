//! Format run reports and store status as text.

use crate::artifact::ArtifactKind;
use crate::extract::RunReport;
use crate::store::Bucket;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// One row of the status table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub kind: ArtifactKind,
    pub primary: usize,
    pub secondary: usize,
}

/// Store contents summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub store_path: String,
    pub rows: Vec<StatusRow>,
    pub unique: usize,
    pub placement_violations: usize,
}

impl StoreStatus {
    pub fn from_counts(
        store_path: String,
        counts: &BTreeMap<(ArtifactKind, Bucket), usize>,
        unique: usize,
        placement_violations: usize,
    ) -> Self {
        let count = |kind: ArtifactKind, bucket: Bucket| counts.get(&(kind, bucket)).copied().unwrap_or(0);
        let rows = ArtifactKind::ALL
            .iter()
            .map(|kind| StatusRow {
                kind: *kind,
                primary: count(*kind, Bucket::Primary),
                secondary: count(*kind, Bucket::Secondary),
            })
            .collect();
        Self {
            store_path,
            rows,
            unique,
            placement_violations,
        }
    }
}

/// Format store status as human-readable text.
pub fn format_status_text(status: &StoreStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Store Status")));
    out.push_str(&format!("  Store path: {}\n", status.store_path));
    out.push_str(&format!("  Distinct texts: {}\n", status.unique));
    if status.placement_violations > 0 {
        out.push_str(&format!(
            "  {} {} canonical copies outside primary; run `lectern reconcile`\n",
            "!".yellow(),
            status.placement_violations
        ));
    }
    out.push('\n');

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Kind", "Primary", "Secondary"]);
    for row in &status.rows {
        table.add_row(vec![
            row.kind.as_str().to_string(),
            row.primary.to_string(),
            row.secondary.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format an extraction run as human-readable text.
pub fn format_run_report_text(report: &RunReport, warnings: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Extraction")));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Source", "Found", "New", "Duplicate", "Swapped", "Failed"]);
    for tree in &report.trees {
        table.add_row(vec![
            tree.label.clone(),
            tree.found.to_string(),
            tree.new_primary.to_string(),
            tree.new_secondary.to_string(),
            tree.accepted.to_string(),
            tree.failed.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!(
        "  Reconciliation: {} swaps, {} promotions\n",
        report.reconcile.swaps, report.reconcile.promotions
    ));
    if warnings > 0 {
        out.push_str(&format!("  Warnings: {}\n", warnings.yellow()));
    }
    if report.failed() > 0 {
        out.push_str(&format!("  Failed records: {}\n", report.failed().red()));
    }
    out
}
