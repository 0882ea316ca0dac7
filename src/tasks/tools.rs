//! Package manager bootstrap and per-category tool installation.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::ToolList;
use crate::platform::{Os, PackageManager};
use crate::resources::Applicable as _;
use crate::resources::package::PackageBatch;

/// Script handed to `/bin/bash -c`: fetch the official Homebrew installer and
/// run it in the same shell.
const HOMEBREW_INSTALL: &str = r#"eval "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

/// Where the Homebrew installer puts `brew` (Apple Silicon, then Intel).
const HOMEBREW_PREFIXES: [&str; 2] = ["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

/// Install Homebrew on macOS when no package manager was detected.
#[derive(Debug)]
pub struct SetupPackageManager;

impl Task for SetupPackageManager {
    fn name(&self) -> &str {
        "Install Homebrew"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        let platform = ctx.platform();
        platform.os == Os::MacOs && platform.package_manager.is_none()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run: /bin/bash -c '{HOMEBREW_INSTALL}'"));
            ctx.set_package_manager(PackageManager::Brew);
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info("Homebrew not found, running the official installer");
        ctx.executor
            .run_interactive("/bin/bash", &["-c", HOMEBREW_INSTALL])?;

        if !ctx.executor.which(PackageManager::Brew.name()) {
            let installed = HOMEBREW_PREFIXES.iter().find(|p| Path::new(p).exists());
            anyhow::bail!(
                "Homebrew installed but brew is not on PATH{}; add it to PATH and re-run",
                installed.map_or_else(String::new, |p| format!(" (found {p})"))
            );
        }
        ctx.set_package_manager(PackageManager::Brew);
        Ok(TaskResult::Ok)
    }
}

/// Install every package of one tool category.
#[derive(Debug)]
pub struct InstallTools {
    name: String,
    category: String,
    tools: Arc<ToolList>,
}

impl InstallTools {
    /// Task for `category`, resolved against `tools`.
    #[must_use]
    pub fn new(category: &str, tools: Arc<ToolList>) -> Self {
        Self {
            name: format!("Install {category} tools"),
            category: category.to_string(),
            tools,
        }
    }
}

impl Task for InstallTools {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let manager = ctx.platform().require_package_manager()?;
        let resolved = self.tools.resolve(&self.category, manager)?;
        if resolved.is_empty() {
            return Ok(TaskResult::Skipped(format!(
                "no {manager} packages in '{}'",
                self.category
            )));
        }

        let batch = PackageBatch::new(
            self.category.clone(),
            manager,
            resolved.packages,
            resolved.casks,
            &*ctx.executor,
        );
        ctx.log.debug(&batch.description());

        if ctx.dry_run {
            for command in batch.commands() {
                ctx.log.dry_run(&format!("would run: {command}"));
            }
            return Ok(TaskResult::DryRun);
        }

        batch.apply()?;
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::RecordingExecutor;
    use crate::error::{ConfigError, PlatformError};
    use crate::tasks::test_helpers::make_context_with;
    use std::path::PathBuf;

    const LINUX: &str = "[packages.essential]\napt = [\"git\", \"zsh\"]\n\n[packages.development]\npacman = [\"gcc\"]\n";

    fn tools() -> Arc<ToolList> {
        Arc::new(ToolList::parse(Path::new("tools/linux.toml"), LINUX).unwrap())
    }

    fn context(
        os: Os,
        manager: Option<PackageManager>,
        exec: &Arc<RecordingExecutor>,
    ) -> Context {
        make_context_with(
            os,
            manager,
            PathBuf::from("/dotfiles"),
            PathBuf::from("/home/test"),
            Arc::clone(exec) as Arc<dyn crate::exec::Executor>,
        )
        .0
    }

    #[test]
    fn installs_category_with_detected_manager() {
        let exec = Arc::new(RecordingExecutor::new());
        let ctx = context(Os::Linux, Some(PackageManager::Apt), &exec);
        let result = InstallTools::new("essential", tools()).run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            exec.calls(),
            vec!["sudo apt update", "sudo apt install -y git zsh"]
        );
    }

    #[test]
    fn dry_run_issues_no_commands() {
        let exec = Arc::new(RecordingExecutor::new());
        let mut ctx = context(Os::Linux, Some(PackageManager::Apt), &exec);
        ctx.dry_run = true;
        let result = InstallTools::new("essential", tools()).run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::DryRun));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn category_without_manager_packages_is_skipped() {
        let exec = Arc::new(RecordingExecutor::new());
        let ctx = context(Os::Linux, Some(PackageManager::Apt), &exec);
        let result = InstallTools::new("development", tools()).run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(reason) if reason == "no apt packages in 'development'"));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn unknown_category_fails() {
        let exec = Arc::new(RecordingExecutor::new());
        let ctx = context(Os::Linux, Some(PackageManager::Apt), &exec);
        let err = InstallTools::new("games", tools()).run(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn missing_package_manager_fails() {
        let exec = Arc::new(RecordingExecutor::new());
        let ctx = context(Os::Linux, None, &exec);
        let err = InstallTools::new("essential", tools()).run(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlatformError>(),
            Some(PlatformError::MissingPackageManager { .. })
        ));
    }

    #[test]
    fn failing_manager_fails_task() {
        let exec = Arc::new(RecordingExecutor::new().with_response(true).with_response(false));
        let ctx = context(Os::Linux, Some(PackageManager::Apt), &exec);
        assert!(InstallTools::new("essential", tools()).run(&ctx).is_err());
    }

    #[test]
    fn task_name_includes_category() {
        assert_eq!(InstallTools::new("optional", tools()).name(), "Install optional tools");
    }

    #[test]
    fn homebrew_setup_only_on_macos_without_manager() {
        let exec = Arc::new(RecordingExecutor::new());
        assert!(SetupPackageManager.should_run(&context(Os::MacOs, None, &exec)));
        assert!(!SetupPackageManager.should_run(&context(
            Os::MacOs,
            Some(PackageManager::Brew),
            &exec
        )));
        assert!(!SetupPackageManager.should_run(&context(Os::Linux, None, &exec)));
    }

    #[test]
    fn homebrew_setup_dry_run_records_brew() {
        let exec = Arc::new(RecordingExecutor::new());
        let mut ctx = context(Os::MacOs, None, &exec);
        ctx.dry_run = true;
        let result = SetupPackageManager.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::DryRun));
        assert!(exec.calls().is_empty());
        assert_eq!(ctx.platform().package_manager, Some(PackageManager::Brew));
    }

    #[test]
    fn homebrew_setup_runs_installer() {
        let exec = Arc::new(RecordingExecutor::new().with_program("brew"));
        let ctx = context(Os::MacOs, None, &exec);
        SetupPackageManager.run(&ctx).unwrap();
        assert_eq!(
            exec.calls(),
            vec![format!("/bin/bash -c {HOMEBREW_INSTALL}")]
        );
        assert_eq!(exec.calls()[0].matches("/bin/bash").count(), 1);
        assert!(HOMEBREW_INSTALL.starts_with(r#"eval "$(curl -fsSL https://"#));
        assert_eq!(ctx.platform().package_manager, Some(PackageManager::Brew));
    }
}
