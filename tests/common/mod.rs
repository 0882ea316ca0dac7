// Shared helpers for integration tests.
//
// Provides a temporary repository and home directory, a fluent builder for
// populating them, and an executor double that records package manager calls
// instead of running them.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotfiles_installer::exec::{Executor, display_command};
use dotfiles_installer::logging::{Log, Logger};
use dotfiles_installer::platform::{Os, PackageManager, Platform};
use dotfiles_installer::tasks::Context;

/// Executor that records every command and reports success.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Every command issued so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str]) {
        self.calls
            .lock()
            .expect("calls lock")
            .push(display_command(program, args));
    }
}

impl Executor for RecordingExecutor {
    fn run_interactive(&self, program: &str, args: &[&str]) -> anyhow::Result<()> {
        self.record(program, args);
        Ok(())
    }

    fn which(&self, _program: &str) -> bool {
        false
    }
}

/// An isolated repository and home directory, each backed by a
/// [`tempfile::TempDir`] that is deleted on drop.
pub struct TestRepo {
    pub root: tempfile::TempDir,
    pub home: tempfile::TempDir,
    pub executor: Arc<RecordingExecutor>,
}

impl TestRepo {
    /// Start building a repository with no files.
    pub fn builder() -> TestRepoBuilder {
        TestRepoBuilder {
            repo: Self {
                root: tempfile::tempdir().expect("create root dir"),
                home: tempfile::tempdir().expect("create home dir"),
                executor: Arc::new(RecordingExecutor::default()),
            },
        }
    }

    /// Path to `config/<source>` in the repository.
    pub fn source(&self, source: &str) -> PathBuf {
        self.root.path().join("config").join(source)
    }

    /// Path to `<target>` under the home directory.
    pub fn target(&self, target: &str) -> PathBuf {
        self.home.path().join(target)
    }

    /// Build a task context for `os` with the given package manager.
    pub fn context(
        &self,
        os: Os,
        manager: Option<PackageManager>,
        dry_run: bool,
    ) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("test"));
        let ctx = Context::new(
            Platform::new(os, None, manager, false),
            self.root.path().to_path_buf(),
            self.home.path().to_path_buf(),
            Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            Arc::clone(&self.executor) as Arc<dyn Executor>,
        );
        (ctx, log)
    }
}

/// Fluent builder for [`TestRepo`].
pub struct TestRepoBuilder {
    repo: TestRepo,
}

impl TestRepoBuilder {
    /// Write `content` to `<root>/<path>`.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        write(&self.repo.root.path().join(path), content);
        self
    }

    /// Write `configs.toml`.
    pub fn with_configs(self, content: &str) -> Self {
        self.with_file("configs.toml", content)
    }

    /// Write `settings.toml`.
    pub fn with_settings(self, content: &str) -> Self {
        self.with_file("settings.toml", content)
    }

    /// Write `config/<source>`.
    pub fn with_source(self, source: &str, content: &str) -> Self {
        write(&self.repo.source(source), content);
        self
    }

    /// Write `<home>/<target>`, as if already deployed or edited by the user.
    pub fn with_home_file(self, target: &str, content: &str) -> Self {
        write(&self.repo.target(target), content);
        self
    }

    /// Finish building.
    pub fn build(self) -> TestRepo {
        self.repo
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Read `path` as UTF-8.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read file")
}

/// Snapshot every file under `dir` as `(relative path, bytes)` pairs.
pub fn tree(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).expect("prefix").to_path_buf();
            (rel, std::fs::read(e.path()).expect("read file"))
        })
        .collect();
    files.sort();
    files
}
