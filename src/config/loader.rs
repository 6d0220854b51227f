//! Configuration loading from disk.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::DispatcherConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming a config file or directory.
pub const CONFIG_ENV: &str = "DISPATCH_CONFIG";

/// Preferred file name inside a config directory.
pub const CONFIG_FILE: &str = "dispatcher.toml";

/// Distribution defaults, used when [`CONFIG_FILE`] is absent.
pub const DIST_CONFIG_FILE: &str = "dispatcher.dist.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file `{}` does not exist or is unreadable: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file cannot be decoded: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DispatcherConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<DispatcherConfig, ConfigError> {
    let config: DispatcherConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Work out which file to load.
///
/// An explicit path wins, then [`CONFIG_ENV`], then `./config`. A directory
/// resolves to [`CONFIG_FILE`] when present and [`DIST_CONFIG_FILE`]
/// otherwise.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    let base = match explicit {
        Some(path) => path.to_path_buf(),
        None => env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config")),
    };

    if base.is_dir() {
        let preferred = base.join(CONFIG_FILE);
        if preferred.is_file() {
            preferred
        } else {
            base.join(DIST_CONFIG_FILE)
        }
    } else {
        base
    }
}
