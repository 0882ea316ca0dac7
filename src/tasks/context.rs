use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::{PackageManager, Platform};

/// Shared context for task execution.
pub struct Context {
    /// Detected platform information.
    ///
    /// Behind a lock so that `SetupPackageManager` can record a freshly
    /// bootstrapped package manager for the tasks that follow. Use
    /// [`Context::platform`] for read access.
    platform: RwLock<Platform>,
    /// Root directory of the dotfiles repository.
    pub root: PathBuf,
    /// User's home directory path.
    pub home: PathBuf,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("platform", &self.platform())
            .field("root", &self.root)
            .field("home", &self.home)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        platform: Platform,
        root: PathBuf,
        home: PathBuf,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            platform: RwLock::new(platform),
            root,
            home,
            log,
            dry_run,
            executor,
        }
    }

    /// Snapshot of the current platform.
    ///
    /// Recovers from a poisoned lock by consuming the poison and returning
    /// the inner value.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Record the package manager that later tasks should use.
    pub fn set_package_manager(&self, manager: PackageManager) {
        self.platform
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .package_manager = Some(manager);
    }

    /// Path relative to home when possible, for shorter log lines.
    #[must_use]
    pub fn display_home_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.home).map_or_else(
            |_| path.display().to_string(),
            |rel| format!("~/{}", rel.display()),
        )
    }
}
