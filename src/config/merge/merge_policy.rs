//! Built-in defaults: the lowest layer of every merge.

use crate::types::DEFAULT_MAX_DEPTH;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the default value of every scalar key.
/// List defaults stay with serde so a file list replaces them whole.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("extraction.max_depth", DEFAULT_MAX_DEPTH as i64)?
        .set_default("extraction.generation", "modern")?
        .set_default("export.include_duplicates", true)?
        .set_default("export.output_dir", "lectern-out")?
        .set_default("logging.enabled", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("logging.color", true)
}
