//! Copy deployed configuration files back into the repository.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, process_resources};
use crate::config::entries;
use crate::resources::sync::SyncResource;

/// Copy every applicable deployed entry from home back into `config/`.
#[derive(Debug)]
pub struct SyncRepo;

impl Task for SyncRepo {
    fn name(&self) -> &str {
        "Sync configuration files to repository"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let entries = entries::load(&ctx.root).context("loading configs.toml")?;
        let os = ctx.platform().os;

        let mut resources = Vec::new();
        for entry in entries.iter().filter(|e| e.applies_to(os)) {
            if entry.templated {
                ctx.log.warn(&format!(
                    "{} is templated; rendered values are copied back as-is",
                    entry.source.display()
                ));
            }
            resources.push(SyncResource::from_entry(entry, &ctx.root, &ctx.home));
        }

        if resources.is_empty() {
            return Ok(TaskResult::Skipped(format!("no config entries for {os}")));
        }
        process_resources(ctx, resources, "sync")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::RecordingExecutor;
    use crate::platform::Os;
    use crate::tasks::test_helpers::make_context_with;
    use std::path::Path;
    use std::sync::Arc;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn context(root: &Path, home: &Path, dry_run: bool) -> Context {
        let (mut ctx, _log) = make_context_with(
            Os::Linux,
            None,
            root.to_path_buf(),
            home.to_path_buf(),
            Arc::new(RecordingExecutor::new()),
        );
        ctx.dry_run = dry_run;
        ctx
    }

    #[test]
    fn copies_edited_files_back() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        write(
            &root.path().join("configs.toml"),
            "[[config]]\ntarget = \".zshrc\"\nsource = \"zsh/zshrc\"\n",
        );
        write(&root.path().join("config/zsh/zshrc"), "old\n");
        write(&home.path().join(".zshrc"), "new\n");

        let result = SyncRepo.run(&context(root.path(), home.path(), false)).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            std::fs::read_to_string(root.path().join("config/zsh/zshrc")).unwrap(),
            "new\n"
        );
    }

    #[test]
    fn dry_run_leaves_repository_untouched() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        write(
            &root.path().join("configs.toml"),
            "[[config]]\ntarget = \".zshrc\"\nsource = \"zsh/zshrc\"\n",
        );
        write(&root.path().join("config/zsh/zshrc"), "old\n");
        write(&home.path().join(".zshrc"), "new\n");

        let result = SyncRepo.run(&context(root.path(), home.path(), true)).unwrap();

        assert!(matches!(result, TaskResult::DryRun));
        assert_eq!(
            std::fs::read_to_string(root.path().join("config/zsh/zshrc")).unwrap(),
            "old\n"
        );
    }

    #[test]
    fn undeployed_entry_fails_without_stopping_others() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        write(
            &root.path().join("configs.toml"),
            "[[config]]\ntarget = \".zshrc\"\nsource = \"zsh/zshrc\"\n\n[[config]]\ntarget = \".psqlrc\"\nsource = \"postgres/psqlrc\"\n",
        );
        write(&home.path().join(".zshrc"), "zsh\n");

        let err = SyncRepo.run(&context(root.path(), home.path(), false)).unwrap_err();

        assert_eq!(err.to_string(), "1 of 2 entries failed");
        assert!(root.path().join("config/zsh/zshrc").exists());
    }
}
