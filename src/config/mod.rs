//! Declarative inputs: tool lists, config entries and template settings.
pub mod entries;
pub mod settings;
pub mod tools;
pub mod toml_loader;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

pub use entries::{ConfigEntry, DeployMode, EntryKind};
pub use settings::Settings;
pub use tools::{ResolvedTools, ToolList};

/// Inputs needed by the deploy and sync steps.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root.
    pub root: PathBuf,
    /// Managed entries, unfiltered by platform.
    pub entries: Vec<ConfigEntry>,
    /// Template variables.
    pub settings: Settings,
}

impl Config {
    /// Path of the settings file under `root`.
    #[must_use]
    pub fn settings_path(root: &Path) -> PathBuf {
        root.join("settings.toml")
    }

    /// Load `configs.toml` and `settings.toml` from `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file exists but is invalid.
    pub fn load(root: &Path, home: &Path) -> Result<Self> {
        let entries = entries::load(root).context("loading configs.toml")?;
        let settings = Settings::load(&Self::settings_path(root), home, root)
            .context("loading settings.toml")?;
        Ok(Self {
            root: root.to_path_buf(),
            entries,
            settings,
        })
    }
}
