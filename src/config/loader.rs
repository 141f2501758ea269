//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{MockConfig, RouteFile};
use crate::config::validation::{validate_config, validate_routes, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Relative `registry.include` paths are resolved against the file's directory.
pub fn load_config(path: &Path) -> Result<MockConfig, ConfigError> {
    let mut config: MockConfig = read_toml(path)?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for include in &mut config.registry.include {
        if include.is_relative() {
            *include = base.join(&*include);
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load a route file listed in `registry.include`.
pub fn load_route_file(path: &Path) -> Result<RouteFile, ConfigError> {
    let file: RouteFile = read_toml(path)?;
    validate_routes(&file.routes).map_err(ConfigError::Validation)?;
    Ok(file)
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
