pub mod install;
pub mod platform_info;
pub mod sync;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates platform detection and path resolution so that each command
/// does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    pub platform: Platform,
    pub root: PathBuf,
    pub home: PathBuf,
}

impl CommandSetup {
    /// Detect the platform and resolve the repository root and home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the root or home directory cannot be determined.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let platform = Platform::detect(&SystemExecutor);
        let root = resolve_root(global)?;
        let home = home_dir()?;

        for line in platform.summary() {
            log.debug(&line);
        }
        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("home: {}", home.display()));

        Ok(Self {
            platform,
            root,
            home,
        })
    }

    /// Build the task context, consuming the setup.
    #[must_use]
    pub fn into_context(self, log: &Arc<Logger>, dry_run: bool) -> Context {
        Context::new(
            self.platform,
            self.root,
            self.home,
            Arc::clone(log) as Arc<dyn Log>,
            dry_run,
            Arc::new(SystemExecutor),
        )
    }
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} step(s) failed");
    }
    Ok(())
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// Order: `--root`, `DOTFILES_ROOT`, the repository containing the binary
/// (`target/<profile>/` or `bin/`), then the current directory.
///
/// # Errors
///
/// Returns an error if an explicit root does not exist or no candidate looks
/// like a dotfiles repository.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let explicit = global
        .root
        .clone()
        .or_else(|| std::env::var_os("DOTFILES_ROOT").map(PathBuf::from));
    if let Some(root) = explicit {
        return dunce::canonicalize(&root)
            .with_context(|| format!("dotfiles root {} does not exist", root.display()));
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir()?;

    find_root(exe_dir.as_deref(), &cwd).ok_or_else(|| {
        anyhow::anyhow!("cannot determine dotfiles root. Use --root or set DOTFILES_ROOT env var")
    })
}

/// Whether `dir` has the layout of a dotfiles repository.
fn is_repo_root(dir: &Path) -> bool {
    dir.join("config").is_dir() && dir.join("tools").is_dir()
}

fn find_root(exe_dir: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    let from_exe = exe_dir.into_iter().flat_map(|parent| {
        [
            parent.join("../.."), // target/release/ → repo root
            parent.join(".."),    // bin/ → repo root
        ]
    });

    from_exe
        .chain(std::iter::once(cwd.to_path_buf()))
        .find(|candidate| is_repo_root(candidate))
        .and_then(|root| dunce::canonicalize(root).ok())
}

/// The user's home directory: `HOME`, or `USERPROFILE` on Windows.
///
/// # Errors
///
/// Returns an error if neither variable is set.
pub fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .or_else(|| {
            if cfg!(windows) {
                std::env::var_os("USERPROFILE").filter(|h| !h.is_empty())
            } else {
                None
            }
        })
        .map(PathBuf::from)
        .context("cannot determine home directory: HOME is not set")
}
