//! Shared config utilities: reading settings from the process environment
//! (or any other key/value source) and loading JSON config files.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// A read-only key/value view of configuration.
///
/// Everything that selects a backend goes through this trait so the lookup
/// can be re-evaluated on every request and swapped out in tests.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Like `get`, but blank values count as absent.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Reads from `std::env` at call time. Nothing is cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Parse a numeric setting, ignoring values that don't parse.
pub fn get_parsed<T: std::str::FromStr>(source: &dyn ConfigSource, key: &str) -> Option<T> {
    source.get_non_empty(key).and_then(|v| v.parse::<T>().ok())
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and deserialize one JSON config file.
pub fn read_json_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `read_json_config`, falling back to `T::default()` on any failure.
/// `section` names the config in log lines ("server", ...).
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, section: &str) -> T {
    match read_json_config(path) {
        Ok(config) => {
            info!(section, "[Config] Loaded {}", path.display());
            config
        }
        Err(ConfigFileError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            info!(section, "[Config] No file at {}, using defaults", path.display());
            T::default()
        }
        Err(e) => {
            warn!(section, "[Config] {}, using defaults", e);
            T::default()
        }
    }
}
