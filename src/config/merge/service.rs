//! MergeService: orchestrates sources, applies merge policy, deserializes to LecternConfig.

use crate::config::sources::{environment, file};
use crate::config::LecternConfig;
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the standard sources.
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<LecternConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_global(builder)?;
        let builder = match explicit {
            Some(path) => file::add_explicit(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay, skipping the global file.
    pub fn load_from_file(path: &Path) -> Result<LecternConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_explicit(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
