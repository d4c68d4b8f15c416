//! CLI Tooling
//!
//! Command-line interface for extraction runs, reconciliation, export and
//! store inspection. Every command works against one persistent record store.

use crate::config::{ConfigLoader, LecternConfig};
use crate::error::ApiError;
use crate::extract::{detect_generation, load_tree, Extraction};
use crate::logging::LoggingConfig;
use crate::schema::SchemaGeneration;
use crate::serialize::{plan_export, write_export, SerializationTarget};
use crate::store::{DedupEngine, SledRecordStore};
use crate::tooling::format::{format_run_report_text, format_status_text, StoreStatus};
use crate::warnings::{CollectingSink, Severity, WarningSink};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Lectern CLI - Extract, deduplicate and re-export written artifacts
#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Collect books and signs from world data and re-emit them as commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record store directory (overrides storage.store_path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags over the configured logging section
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut logging = base.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk source trees and ingest every book and sign found
    Extract {
        /// Schema generation: legacy, modern, auto, or a game version
        #[arg(long)]
        generation: Option<String>,

        /// Label used in provenance strings (defaults to the file path)
        #[arg(long)]
        label: Option<String>,

        /// Nesting ceiling for container traversal
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Decoded source trees (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Re-run the reconciliation pass over the store
    Reconcile,
    /// Write command files for one or more targets
    Export {
        /// Target version (repeatable; defaults to export.targets)
        #[arg(long = "target")]
        targets: Vec<String>,

        /// Output directory (defaults to export.output_dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip duplicate books
        #[arg(long)]
        no_duplicates: bool,
    },
    /// Show record counts per kind and bucket
    Status {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration
    Config,
}

/// CLI context for executing commands
pub struct CliContext {
    config: LecternConfig,
    store_path: PathBuf,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(config_path: Option<PathBuf>, store_override: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Self::from_config(config, store_override)
    }

    /// Context over an already loaded configuration
    pub fn from_config(config: LecternConfig, store_override: Option<PathBuf>) -> Result<Self, ApiError> {
        let store_path = match store_override {
            Some(path) => path,
            None => config.storage.resolve_store_path()?,
        };
        Ok(Self { config, store_path })
    }

    pub fn config(&self) -> &LecternConfig {
        &self.config
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Extract {
                generation,
                label,
                max_depth,
                format,
                files,
            } => self.handle_extract(
                generation.as_deref(),
                label.as_deref(),
                *max_depth,
                format,
                files,
            ),
            Commands::Reconcile => self.handle_reconcile(),
            Commands::Export {
                targets,
                out,
                no_duplicates,
            } => self.handle_export(targets, out.as_deref(), *no_duplicates),
            Commands::Status { format } => self.handle_status(format),
            Commands::Config => self.config.to_toml(),
        }
    }

    fn open_store(&self) -> Result<SledRecordStore, ApiError> {
        Ok(SledRecordStore::new(&self.store_path)?)
    }

    fn handle_extract(
        &self,
        generation: Option<&str>,
        label: Option<&str>,
        max_depth: Option<usize>,
        format: &str,
        files: &[PathBuf],
    ) -> Result<String, ApiError> {
        check_format(format)?;
        let configured = match generation {
            Some(g) => parse_generation(g)?,
            None => self.config.extraction.generation()?,
        };
        let max_depth = max_depth.unwrap_or(self.config.extraction.max_depth);
        if max_depth == 0 {
            return Err(ApiError::InputError("--max-depth must be at least 1".to_string()));
        }

        let store = self.open_store()?;
        let engine = DedupEngine::open(&store)?;
        let mut extraction = Extraction::new(engine).with_max_depth(max_depth);
        let mut sink = CollectingSink::forwarding();

        for path in files {
            let tree_label = source_label(label, path, files.len());
            let root = match load_tree(path) {
                Ok(root) => root,
                Err(e) => {
                    sink.emit(Severity::Error, format!("skipping {}: {}", tree_label, e));
                    continue;
                }
            };
            let tree_generation = match configured {
                Some(g) => g,
                None => detect_generation(&root).unwrap_or_else(|| {
                    sink.warn(format!(
                        "{}: no DataVersion, assuming {} layout",
                        tree_label,
                        SchemaGeneration::Modern
                    ));
                    SchemaGeneration::Modern
                }),
            };
            extraction.ingest_tree(&root, tree_generation, &tree_label, &mut sink);
        }

        let (report, _) = extraction.finish(&mut sink)?;
        let anomalies = sink.count(Severity::Warning) + sink.count(Severity::Error);
        info!(
            trees = report.trees.len(),
            found = report.found(),
            failed = report.failed(),
            warnings = anomalies,
            "extraction finished"
        );

        match format {
            "json" => render_json(&json!({
                "report": report,
                "warnings": sink.warnings,
            })),
            _ => Ok(format_run_report_text(&report, anomalies)),
        }
    }

    fn handle_reconcile(&self) -> Result<String, ApiError> {
        let store = self.open_store()?;
        let mut engine = DedupEngine::open(&store)?;
        let mut sink = CollectingSink::forwarding();
        let report = engine.reconcile(&mut sink)?;
        if report.is_noop() {
            return Ok("Store already reconciled".to_string());
        }
        Ok(format!(
            "Reconciled: {} swaps, {} promotions",
            report.swaps, report.promotions
        ))
    }

    fn handle_export(
        &self,
        targets: &[String],
        out: Option<&Path>,
        no_duplicates: bool,
    ) -> Result<String, ApiError> {
        let targets: Vec<SerializationTarget> = if targets.is_empty() {
            self.config.export.targets()?
        } else {
            targets
                .iter()
                .map(|t| t.parse())
                .collect::<Result<Vec<SerializationTarget>, ApiError>>()?
        };
        let dir = out
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.export.output_dir.clone());
        let include_duplicates = self.config.export.include_duplicates && !no_duplicates;

        let store = self.open_store()?;
        let engine = DedupEngine::open(&store)?;
        let violations = engine.placement_violations();
        if violations > 0 {
            warn!(
                violations,
                "canonical copies outside primary; run `lectern reconcile` before exporting"
            );
        }

        let mut lines = Vec::new();
        for target in targets {
            let plan = plan_export(engine.store(), target, include_duplicates)?;
            if plan.files.is_empty() {
                lines.push(format!("{}: nothing to export", target));
                continue;
            }
            write_export(&plan, &dir)?;
            for file in &plan.files {
                lines.push(format!(
                    "{}: {} commands -> {}",
                    target,
                    file.lines.len(),
                    dir.join(&file.file_name).display()
                ));
            }
        }
        Ok(lines.join("\n"))
    }

    fn handle_status(&self, format: &str) -> Result<String, ApiError> {
        check_format(format)?;
        let store = self.open_store()?;
        let engine = DedupEngine::open(&store)?;
        let status = StoreStatus::from_counts(
            self.store_path.display().to_string(),
            &engine.counts(),
            engine.unique_count(),
            engine.placement_violations(),
        );
        match format {
            "json" => render_json(&status),
            _ => Ok(format_status_text(&status)),
        }
    }
}

/// `auto` defers to the tree's own `DataVersion`
fn parse_generation(value: &str) -> Result<Option<SchemaGeneration>, ApiError> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value.parse().map(Some)
}

fn check_format(format: &str) -> Result<(), ApiError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(ApiError::InputError(format!(
            "Unknown output format '{}': expected text or json",
            other
        ))),
    }
}

fn source_label(label: Option<&str>, path: &Path, file_count: usize) -> String {
    match label {
        Some(label) if file_count == 1 => label.to_string(),
        Some(label) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("{}/{}", label, name)
        }
        None => path.display().to_string(),
    }
}

fn render_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InputError(format!("Failed to render JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn context(temp_dir: &TempDir) -> CliContext {
        let mut config = LecternConfig::default();
        config.export.output_dir = temp_dir.path().join("out");
        CliContext::from_config(config, Some(temp_dir.path().join("store"))).unwrap()
    }

    fn write_tree(temp_dir: &TempDir, name: &str, value: serde_json::Value) -> PathBuf {
        let path = temp_dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        path
    }

    fn book(title: &str, page: &str, generation: i64) -> serde_json::Value {
        json!({
            "id": "minecraft:written_book",
            "Count": 1,
            "tag": {
                "title": title,
                "author": "Scribe",
                "generation": generation,
                "pages": [format!("{{\"text\":\"{}\"}}", page)]
            }
        })
    }

    fn extract(files: Vec<PathBuf>) -> Commands {
        Commands::Extract {
            generation: Some("legacy".to_string()),
            label: None,
            max_depth: None,
            format: "json".to_string(),
            files,
        }
    }

    #[test]
    fn test_extract_then_status() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        let tree = write_tree(
            &temp_dir,
            "chest.json",
            json!({
                "id": "minecraft:chest", "x": 1, "y": 64, "z": -3,
                "Items": [book("A", "hello", 1), book("A", "hello", 0), book("B", "other", 0)]
            }),
        );

        let output = ctx.execute(&extract(vec![tree])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["report"]["trees"][0]["found"], 3);
        assert_eq!(parsed["report"]["trees"][0]["accepted"], 1);

        let status = ctx
            .execute(&Commands::Status {
                format: "json".to_string(),
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&status).unwrap();
        assert_eq!(parsed["unique"], 2);
        assert_eq!(parsed["placement_violations"], 0);
        assert_eq!(parsed["rows"][0]["primary"], 2);
        assert_eq!(parsed["rows"][0]["secondary"], 1);
    }

    #[test]
    fn test_unreadable_file_is_reported_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        let good = write_tree(
            &temp_dir,
            "good.json",
            json!({ "id": "minecraft:chest", "Items": [book("A", "hello", 0)] }),
        );
        let missing = temp_dir.path().join("missing.json");

        let output = ctx.execute(&extract(vec![missing, good])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["report"]["trees"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["warnings"][0]["severity"], "Error");
    }

    #[test]
    fn test_export_writes_files() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        let tree = write_tree(
            &temp_dir,
            "chest.json",
            json!({ "id": "minecraft:chest", "Items": [book("A", "hello", 0), book("A", "hello", 0)] }),
        );
        ctx.execute(&extract(vec![tree])).unwrap();

        let out = temp_dir.path().join("export");
        let output = ctx
            .execute(&Commands::Export {
                targets: vec!["1.12".to_string(), "1.20.5".to_string()],
                out: Some(out.clone()),
                no_duplicates: true,
            })
            .unwrap();
        assert!(output.contains("1.12: 1 commands"));
        assert!(out.join("books_1_12.mcfunction").exists());
        assert!(out.join("books_1_20_5.mcfunction").exists());
        assert!(!out.join("books_duplicates_1_12.mcfunction").exists());
    }

    #[test]
    fn test_export_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        let output = ctx
            .execute(&Commands::Export {
                targets: Vec::new(),
                out: None,
                no_duplicates: false,
            })
            .unwrap();
        assert_eq!(output, "1.20.5: nothing to export");
    }

    #[test]
    fn test_reconcile_on_clean_store() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        assert_eq!(
            ctx.execute(&Commands::Reconcile).unwrap(),
            "Store already reconciled"
        );
    }

    #[test]
    fn test_rejects_unknown_format_and_generation() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        assert!(matches!(
            ctx.execute(&Commands::Status {
                format: "yaml".to_string()
            }),
            Err(ApiError::InputError(_))
        ));
        assert!(matches!(
            ctx.execute(&Commands::Extract {
                generation: Some("bedrock".to_string()),
                label: None,
                max_depth: None,
                format: "text".to_string(),
                files: vec![temp_dir.path().join("x.json")],
            }),
            Err(ApiError::InvalidGeneration(_))
        ));
    }

    #[test]
    fn test_source_label() {
        let path = Path::new("/saves/world/r.0.0.json");
        assert_eq!(source_label(None, path, 1), "/saves/world/r.0.0.json");
        assert_eq!(source_label(Some("spawn"), path, 1), "spawn");
        assert_eq!(source_label(Some("spawn"), path, 2), "spawn/r.0.0.json");
    }

    #[test]
    fn test_logging_flags_override_config() {
        let cli = Cli::parse_from(["lectern", "--log-level", "debug", "--log-format", "json", "config"]);
        let logging = cli.logging_config(&LoggingConfig::default());
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, "json");
        assert_eq!(logging.output, "stderr");
        assert!(matches!(cli.command, Commands::Config));
    }
}
