//! Config entries: which files under `config/` land where under home.
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use super::toml_loader;
use crate::error::ConfigError;
use crate::platform::Os;

/// Whether an entry is a single file or a whole directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Single file.
    File,
    /// Directory copied recursively.
    Directory,
}

/// How an entry reaches the home directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    /// Write a copy (rendered, if templated).
    #[default]
    Copy,
    /// Point a symlink at the source.
    Symlink,
}

/// One file or directory managed by the deployer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Destination, relative to the home directory.
    pub target: PathBuf,
    /// Source, relative to `<root>/config`.
    pub source: PathBuf,
    /// Substitute settings into the content before writing.
    pub templated: bool,
    /// File or directory.
    pub kind: EntryKind,
    /// Copy or symlink.
    pub mode: DeployMode,
    /// OS names this entry applies to; empty means all.
    pub platforms: Vec<String>,
}

impl ConfigEntry {
    /// Plain copied file, deployed on every platform.
    #[must_use]
    pub fn file(target: &str, source: &str) -> Self {
        Self {
            target: PathBuf::from(target),
            source: PathBuf::from(source),
            templated: false,
            kind: EntryKind::File,
            mode: DeployMode::Copy,
            platforms: Vec::new(),
        }
    }

    /// Copied directory tree, deployed on every platform.
    #[must_use]
    pub fn directory(target: &str, source: &str) -> Self {
        Self {
            kind: EntryKind::Directory,
            ..Self::file(target, source)
        }
    }

    /// Restrict the entry to a single OS.
    #[must_use]
    pub fn only_on(mut self, os: Os) -> Self {
        self.platforms = vec![os.name().to_string()];
        self
    }

    /// Render with `settings` before writing.
    #[must_use]
    pub const fn templated(mut self) -> Self {
        self.templated = true;
        self
    }

    /// Absolute destination path.
    #[must_use]
    pub fn target_path(&self, home: &Path) -> PathBuf {
        home.join(&self.target)
    }

    /// Absolute source path.
    #[must_use]
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join("config").join(&self.source)
    }

    /// True if the entry should be processed on `os`.
    #[must_use]
    pub fn applies_to(&self, os: Os) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == os.name())
    }

    /// Reject combinations that cannot be deployed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEntry`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidEntry {
            entry: self.source.display().to_string(),
            reason: reason.to_string(),
        };

        if !is_plain_relative(&self.target) {
            return Err(invalid("target must be a relative path inside home"));
        }
        if !is_plain_relative(&self.source) {
            return Err(invalid("source must be a relative path inside config/"));
        }
        if self.templated && self.kind == EntryKind::Directory {
            return Err(invalid("directories cannot be templated"));
        }
        if self.templated && self.mode == DeployMode::Symlink {
            return Err(invalid("symlinked entries cannot be templated"));
        }
        let known = |name: &String| Os::SUPPORTED.iter().any(|os| os.name() == name);
        if let Some(unknown) = self.platforms.iter().find(|p| !known(p)) {
            return Err(invalid(&format!("unknown platform '{unknown}'")));
        }
        Ok(())
    }
}

fn is_plain_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Raw `[[config]]` table in `configs.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    target: String,
    source: String,
    #[serde(default)]
    templated: bool,
    #[serde(default)]
    directory: bool,
    #[serde(default)]
    mode: DeployMode,
    #[serde(default)]
    platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntriesFile {
    #[serde(default)]
    config: Vec<RawEntry>,
}

impl From<RawEntry> for ConfigEntry {
    fn from(raw: RawEntry) -> Self {
        Self {
            target: PathBuf::from(raw.target),
            source: PathBuf::from(raw.source),
            templated: raw.templated,
            kind: if raw.directory {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            mode: raw.mode,
            platforms: raw.platforms,
        }
    }
}

/// Built-in entry list used when `configs.toml` is absent.
#[must_use]
pub fn default_entries() -> Vec<ConfigEntry> {
    vec![
        ConfigEntry::file(".zshrc", "zsh/zshrc"),
        ConfigEntry::file(".zsh_aliases", "zsh/aliases"),
        ConfigEntry::file(".config/git/config", "git/config"),
        ConfigEntry::file(".config/starship/starship.toml", "starship/starship.toml"),
        ConfigEntry::directory(".config/nvim", "nvim"),
        ConfigEntry::file(".ssh/config", "ssh/config").only_on(Os::Linux),
        ConfigEntry::file(".lesskey", "less/lesskey").only_on(Os::Linux),
        ConfigEntry::file(".config/htop/htoprc", "htop/htoprc").only_on(Os::Linux),
        ConfigEntry::file(".config/curlrc", "curl/curlrc").only_on(Os::Linux),
        ConfigEntry::file(".psqlrc", "postgres/psqlrc").only_on(Os::Linux),
    ]
}

/// Load `<root>/configs.toml`, or the built-in list when it is absent.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or an entry is invalid.
pub fn load(root: &Path) -> Result<Vec<ConfigEntry>, ConfigError> {
    let path = root.join("configs.toml");
    let Some(file) = toml_loader::load_optional::<EntriesFile>(&path)? else {
        return Ok(default_entries());
    };

    let entries: Vec<ConfigEntry> = file.config.into_iter().map(ConfigEntry::from).collect();
    for entry in &entries {
        entry.validate()?;
    }
    Ok(entries)
}
