//! Configuration
//!
//! Layered configuration for extraction, storage, export and logging.
//! Precedence, lowest to highest: built-in defaults, the global config file,
//! an explicit `--config` file, then `LECTERN__SECTION__KEY` environment
//! variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

use crate::error::ApiError;
use crate::logging::{self, LoggingConfig};
use crate::schema::SchemaGeneration;
use crate::serialize::SerializationTarget;
use crate::types::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use facade::ConfigLoader;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_generation() -> String {
    "modern".to_string()
}

fn default_targets() -> Vec<String> {
    vec![SerializationTarget::V1_20_5.as_str().to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("lectern-out")
}

fn default_true() -> bool {
    true
}

/// `[extraction]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Nesting ceiling for container traversal
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// `legacy`, `modern`, a game version, or `auto` to read `DataVersion`
    #[serde(default = "default_generation")]
    pub generation: String,
}

impl ExtractionConfig {
    /// Configured generation; `None` means detect per tree
    pub fn generation(&self) -> Result<Option<SchemaGeneration>, ApiError> {
        if self.generation.eq_ignore_ascii_case("auto") {
            return Ok(None);
        }
        self.generation.parse().map(Some)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            generation: default_generation(),
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Record store directory; unset means the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_store_path(&self) -> Result<PathBuf, ApiError> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(paths::xdg_root::data_dir()?.join("store")),
        }
    }
}

/// `[export]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,

    /// Also write duplicate books
    #[serde(default = "default_true")]
    pub include_duplicates: bool,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl ExportConfig {
    pub fn targets(&self) -> Result<Vec<SerializationTarget>, ApiError> {
        self.targets.iter().map(|t| t.parse()).collect()
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            include_duplicates: default_true(),
            output_dir: default_output_dir(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecternConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LecternConfig {
    /// Reject values that would only fail later, mid-run
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.extraction.max_depth == 0 {
            return Err(ApiError::ConfigError(
                "extraction.max_depth must be at least 1".to_string(),
            ));
        }
        self.extraction.generation()?;
        if self.export.targets.is_empty() {
            return Err(ApiError::ConfigError(
                "export.targets must name at least one target".to_string(),
            ));
        }
        self.export.targets()?;
        logging::validate(&self.logging)
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
