//! Configuration loading.
//!
//! Settings come from a TOML file with logical sections. An explicitly
//! given path must exist; otherwise a `submux.toml` in the working
//! directory is picked up when present, and built-in defaults apply when
//! it is not.

mod settings;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use settings::{MatchSettings, Settings, ToolSettings};

/// Config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "submux.toml";

/// Errors that can occur during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load settings, resolving which file to use.
///
/// An explicit path is required to exist. Without one, the default file is
/// optional and its absence falls back to [`Settings::default`].
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            load_from(path)
        }
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                load_from(fallback)
            } else {
                debug!("no config file, using defaults");
                Ok(Settings::default())
            }
        }
    }
}

fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config");
    Ok(settings)
}
