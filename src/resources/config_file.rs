//! Config deployment resource: copy, render or symlink one entry into home.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::{
    backup_path, copy_dir_recursive, ensure_parent_dir, move_to_backup, path_exists, trees_equal,
};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::{ConfigEntry, DeployMode, EntryKind, Settings};
use crate::template;

/// One config entry that can be checked and deployed.
#[derive(Debug, Clone)]
pub struct DeployResource<'a> {
    /// File or directory under `<root>/config`.
    pub source: PathBuf,
    /// Destination under home.
    pub target: PathBuf,
    /// File or directory.
    pub kind: EntryKind,
    /// Copy or symlink.
    pub mode: DeployMode,
    /// Settings to render with; `None` for verbatim copies.
    settings: Option<&'a Settings>,
}

impl<'a> DeployResource<'a> {
    /// Build the resource for `entry`. `settings` is used only when the entry
    /// is templated.
    #[must_use]
    pub fn from_entry(entry: &ConfigEntry, root: &Path, home: &Path, settings: &'a Settings) -> Self {
        Self {
            source: entry.source_path(root),
            target: entry.target_path(home),
            kind: entry.kind,
            mode: entry.mode,
            settings: entry.templated.then_some(settings),
        }
    }

    /// Bytes a copied file should contain after deployment.
    fn desired_contents(&self) -> Result<Vec<u8>> {
        match self.settings {
            Some(settings) => {
                let raw = std::fs::read_to_string(&self.source)
                    .with_context(|| format!("reading template {}", self.source.display()))?;
                Ok(template::render(&raw, settings).into_bytes())
            }
            None => std::fs::read(&self.source)
                .with_context(|| format!("reading {}", self.source.display())),
        }
    }

    fn source_problem(&self) -> Option<String> {
        if !self.source.exists() {
            return Some(format!("source does not exist: {}", self.source.display()));
        }
        match (self.kind, self.source.is_dir()) {
            (EntryKind::File, true) => Some(format!(
                "source is a directory: {}",
                self.source.display()
            )),
            (EntryKind::Directory, false) => Some(format!(
                "source is not a directory: {}",
                self.source.display()
            )),
            _ => None,
        }
    }

    fn symlink_state(&self) -> ResourceState {
        match std::fs::read_link(&self.target) {
            Ok(existing) if existing == self.source => ResourceState::Correct,
            Ok(existing) => self.differs(&format!("points to {}", existing.display())),
            Err(_) if path_exists(&self.target) => self.differs("not a symlink"),
            Err(_) => ResourceState::Missing,
        }
    }

    fn copy_state(&self) -> Result<ResourceState> {
        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };
        if meta.file_type().is_symlink() {
            return Ok(self.differs("is a symlink"));
        }
        let equal = match self.kind {
            EntryKind::Directory if meta.is_dir() => trees_equal(&self.source, &self.target)?,
            EntryKind::File if meta.is_file() => {
                let current = std::fs::read(&self.target)
                    .with_context(|| format!("reading {}", self.target.display()))?;
                current == self.desired_contents()?
            }
            EntryKind::Directory => return Ok(self.differs("not a directory")),
            EntryKind::File => return Ok(self.differs("not a regular file")),
        };
        Ok(if equal {
            ResourceState::Correct
        } else {
            self.differs("contents differ")
        })
    }

    fn differs(&self, what: &str) -> ResourceState {
        ResourceState::Incorrect {
            current: format!(
                "{what}; existing kept as {}",
                backup_path(&self.target).display()
            ),
        }
    }
}

impl Applicable for DeployResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.target)?;

        let backup = if path_exists(&self.target) {
            Some(move_to_backup(&self.target)?)
        } else {
            None
        };

        match (self.mode, self.kind) {
            (DeployMode::Symlink, _) => create_symlink(&self.source, &self.target)?,
            (DeployMode::Copy, EntryKind::Directory) => {
                copy_dir_recursive(&self.source, &self.target)?;
            }
            (DeployMode::Copy, EntryKind::File) => {
                std::fs::write(&self.target, self.desired_contents()?)
                    .with_context(|| format!("writing {}", self.target.display()))?;
            }
        }

        Ok(backup.map_or(ResourceChange::Applied, |backup| {
            ResourceChange::Replaced { backup }
        }))
    }
}

impl Resource for DeployResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if let Some(reason) = self.source_problem() {
            return Ok(ResourceState::Invalid { reason });
        }
        match self.mode {
            DeployMode::Symlink => Ok(self.symlink_state()),
            DeployMode::Copy => self.copy_state(),
        }
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);

    #[cfg(windows)]
    let result = if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };

    result.with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })
}
