//! Sync-back resource: copy a deployed entry from home into the repository.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::{
    copy_dir_recursive, ensure_parent_dir, path_exists, remove_existing, trees_equal,
};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::{ConfigEntry, EntryKind};

/// A deployed file or directory that can be copied back into `config/`.
///
/// Templated files are copied as they are on disk: rendered values are not
/// turned back into placeholders.
#[derive(Debug, Clone)]
pub struct SyncResource {
    /// Deployed copy under home (read).
    pub host: PathBuf,
    /// Source under `<root>/config` (written).
    pub repo: PathBuf,
    /// File or directory.
    pub kind: EntryKind,
}

impl SyncResource {
    /// Build the resource for `entry`.
    #[must_use]
    pub fn from_entry(entry: &ConfigEntry, root: &Path, home: &Path) -> Self {
        Self {
            host: entry.target_path(home),
            repo: entry.source_path(root),
            kind: entry.kind,
        }
    }
}

impl Applicable for SyncResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.host.display(), self.repo.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.repo)?;
        match self.kind {
            EntryKind::Directory => {
                remove_existing(&self.repo)?;
                copy_dir_recursive(&self.host, &self.repo)?;
            }
            EntryKind::File => {
                std::fs::copy(&self.host, &self.repo).with_context(|| {
                    format!("copying {} to {}", self.host.display(), self.repo.display())
                })?;
            }
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SyncResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.host.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("not deployed: {}", self.host.display()),
            });
        }
        if std::fs::read_link(&self.host).is_ok_and(|target| target == self.repo) {
            return Ok(ResourceState::Correct);
        }
        match (self.kind, self.host.is_dir()) {
            (EntryKind::File, true) => {
                return Ok(ResourceState::Invalid {
                    reason: format!("expected a file: {}", self.host.display()),
                });
            }
            (EntryKind::Directory, false) => {
                return Ok(ResourceState::Invalid {
                    reason: format!("expected a directory: {}", self.host.display()),
                });
            }
            _ => {}
        }
        if !path_exists(&self.repo) {
            return Ok(ResourceState::Missing);
        }

        let equal = match self.kind {
            EntryKind::Directory => self.repo.is_dir() && trees_equal(&self.host, &self.repo)?,
            EntryKind::File => {
                self.repo.is_file()
                    && std::fs::read(&self.host)
                        .with_context(|| format!("reading {}", self.host.display()))?
                        == std::fs::read(&self.repo)
                            .with_context(|| format!("reading {}", self.repo.display()))?
            }
        };
        Ok(if equal {
            ResourceState::Correct
        } else {
            ResourceState::Incorrect {
                current: "repository copy differs".to_string(),
            }
        })
    }
}
