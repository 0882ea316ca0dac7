//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix appended to the full file name of a displaced destination.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// True if anything, including a broken symlink, exists at `path`.
#[must_use]
pub fn path_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Remove whatever lives at `path`: file, symlink (broken or not) or
/// directory tree. Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("remove existing directory: {}", path.display()))?;
    } else {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Recursively copy a directory tree.
///
/// Symlinks within the source tree are followed: their content is copied,
/// not the link itself.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// `path` with [`BACKUP_SUFFIX`] appended to its file name.
///
/// `~/.zshrc` becomes `~/.zshrc.backup` and `starship.toml` becomes
/// `starship.toml.backup`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, OsString::from);
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// Rename `path` to its backup name, replacing any older backup.
///
/// # Errors
///
/// Returns an error if the old backup cannot be removed or the rename fails.
pub fn move_to_backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    remove_existing(&backup)?;
    std::fs::rename(path, &backup)
        .with_context(|| format!("back up {} to {}", path.display(), backup.display()))?;
    Ok(backup)
}

/// Relative path and contents (`None` for directories) of every entry under
/// `root`, sorted by path.
fn tree_snapshot(root: &Path) -> Result<Vec<(PathBuf, Option<Vec<u8>>)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("relativizing {}", entry.path().display()))?
            .to_path_buf();
        let contents = if entry.file_type().is_dir() {
            None
        } else {
            Some(
                std::fs::read(entry.path())
                    .with_context(|| format!("reading {}", entry.path().display()))?,
            )
        };
        entries.push((relative, contents));
    }
    Ok(entries)
}

/// True when both directory trees hold the same paths with the same bytes.
///
/// # Errors
///
/// Returns an error if either tree cannot be read.
pub fn trees_equal(a: &Path, b: &Path) -> Result<bool> {
    Ok(tree_snapshot(a)? == tree_snapshot(b)?)
}
