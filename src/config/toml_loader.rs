//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Read and deserialize a TOML file.
///
/// Returns `Ok(None)` when the file does not exist so callers can choose
/// their own fallback.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML for `T`.
pub fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
}

/// Read and deserialize a TOML file that must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file is missing or unreadable and
/// [`ConfigError::Parse`] if it is not valid TOML for `T`.
pub fn load_required<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    load_optional(path)?.ok_or_else(|| ConfigError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    })
}
