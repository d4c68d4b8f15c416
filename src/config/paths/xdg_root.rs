//! Platform directories for lectern's config and data.

use crate::error::ApiError;
use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Result<ProjectDirs, ApiError> {
    ProjectDirs::from("", "lectern", "lectern").ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine platform directories (HOME not set)".to_string(),
        )
    })
}

/// Config directory, e.g. `$XDG_CONFIG_HOME/lectern/`
pub fn config_dir() -> Result<PathBuf, ApiError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Global config file: `<config dir>/config.toml`
pub fn global_config_path() -> Result<PathBuf, ApiError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Data directory, e.g. `$XDG_DATA_HOME/lectern/`
pub fn data_dir() -> Result<PathBuf, ApiError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_path_is_under_config_dir() {
        let path = global_config_path().unwrap();
        assert!(path.ends_with("config.toml"));
        assert!(path.starts_with(config_dir().unwrap()));
    }
}
