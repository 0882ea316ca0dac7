#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the default install run.
//!
//! These tests exercise the step list built from an [`InstallPlan`] and run
//! it end to end against a recording executor, so no package manager is ever
//! invoked.

mod common;

use common::TestRepo;
use dotfiles_installer::cli::{InstallPlan, ToolSelection};
use dotfiles_installer::commands::install::build_tasks;
use dotfiles_installer::commands::run_tasks_to_completion;
use dotfiles_installer::logging::TaskStatus;
use dotfiles_installer::platform::{Os, PackageManager};
use dotfiles_installer::tasks::Task as _;

const LINUX_TOOLS: &str = r#"
[packages.essential]
apt = ["git", "zsh", "curl"]
pacman = ["git", "zsh", "curl"]

[packages.development]
apt = ["build-essential"]
pacman = ["base-devel"]

[packages.optional]
pacman = ["btop"]
"#;

const MACOS_TOOLS: &str = r#"
[packages]
essential = ["git", "zsh"]
optional = ["jq"]

[casks]
optional = ["iterm2"]
"#;

fn plan(tools: ToolSelection, configs: bool) -> InstallPlan {
    InstallPlan { tools, configs }
}

fn categories(names: &[&str]) -> ToolSelection {
    ToolSelection::Categories(names.iter().map(ToString::to_string).collect())
}

#[test]
fn essential_tools_then_configs_on_apt() {
    let repo = TestRepo::builder()
        .with_file("tools/linux.toml", LINUX_TOOLS)
        .with_configs("[[config]]\ntarget = \".zshrc\"\nsource = \"zsh/zshrc\"\n")
        .with_source("zsh/zshrc", "zsh\n")
        .build();
    let (ctx, log) = repo.context(Os::Linux, Some(PackageManager::Apt), false);

    let tasks = build_tasks(&plan(categories(&["essential"]), true), &ctx);
    run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap();

    assert_eq!(
        repo.executor.calls(),
        vec!["sudo apt update", "sudo apt install -y git zsh curl"]
    );
    let statuses: Vec<_> = log.task_entries().iter().map(|e| e.status).collect();
    assert_eq!(statuses, vec![TaskStatus::Ok, TaskStatus::Ok]);
    assert!(repo.target(".zshrc").exists());
}

#[test]
fn all_categories_on_pacman() {
    let repo = TestRepo::builder()
        .with_file("tools/linux.toml", LINUX_TOOLS)
        .build();
    let (ctx, log) = repo.context(Os::Linux, Some(PackageManager::Pacman), false);

    let tasks = build_tasks(&plan(ToolSelection::All, false), &ctx);
    run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap();

    assert_eq!(
        repo.executor.calls(),
        vec![
            "sudo pacman -Sy",
            "sudo pacman -S --needed --noconfirm git zsh curl",
            "sudo pacman -Sy",
            "sudo pacman -S --needed --noconfirm base-devel",
            "sudo pacman -Sy",
            "sudo pacman -S --needed --noconfirm btop",
        ]
    );
}

#[test]
fn brew_installs_formulae_and_casks() {
    let repo = TestRepo::builder()
        .with_file("tools/macos.toml", MACOS_TOOLS)
        .build();
    let (ctx, log) = repo.context(Os::MacOs, Some(PackageManager::Brew), false);

    let tasks = build_tasks(&plan(categories(&["optional"]), false), &ctx);
    run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap();

    assert_eq!(
        repo.executor.calls(),
        vec!["brew install jq", "brew install --cask iterm2"]
    );
}

#[test]
fn dry_run_invokes_no_package_manager() {
    let repo = TestRepo::builder()
        .with_file("tools/macos.toml", MACOS_TOOLS)
        .build();
    let (ctx, log) = repo.context(Os::MacOs, None, true);

    let tasks = build_tasks(&plan(ToolSelection::All, false), &ctx);
    run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap();

    assert!(repo.executor.calls().is_empty());
    assert!(
        log.task_entries()
            .iter()
            .all(|e| e.status == TaskStatus::DryRun)
    );
}

#[test]
fn unknown_category_fails_without_stopping_other_categories() {
    let repo = TestRepo::builder()
        .with_file("tools/linux.toml", LINUX_TOOLS)
        .build();
    let (ctx, log) = repo.context(Os::Linux, Some(PackageManager::Apt), false);

    let tasks = build_tasks(&plan(categories(&["games", "development"]), false), &ctx);
    let err = run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap_err();

    assert_eq!(err.to_string(), "1 step(s) failed");
    assert_eq!(
        repo.executor.calls(),
        vec!["sudo apt update", "sudo apt install -y build-essential"]
    );
    let failed: Vec<_> = log
        .task_entries()
        .into_iter()
        .filter(|e| e.status == TaskStatus::Failed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "Install games tools");
}

#[test]
fn category_without_packages_for_manager_is_skipped() {
    let repo = TestRepo::builder()
        .with_file("tools/linux.toml", LINUX_TOOLS)
        .build();
    let (ctx, log) = repo.context(Os::Linux, Some(PackageManager::Apt), false);

    let tasks = build_tasks(&plan(categories(&["optional"]), false), &ctx);
    run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap();

    assert!(repo.executor.calls().is_empty());
    assert_eq!(log.task_entries()[0].status, TaskStatus::Skipped);
}

#[test]
fn missing_package_manager_fails_every_category() {
    let repo = TestRepo::builder()
        .with_file("tools/linux.toml", LINUX_TOOLS)
        .build();
    let (ctx, log) = repo.context(Os::Linux, None, false);

    let tasks = build_tasks(&plan(categories(&["essential", "development"]), false), &ctx);
    let err = run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap_err();

    assert_eq!(err.to_string(), "2 step(s) failed");
    assert!(repo.executor.calls().is_empty());
}

#[test]
fn unknown_os_reports_unsupported_platform() {
    let repo = TestRepo::builder()
        .with_file("tools/linux.toml", LINUX_TOOLS)
        .with_configs("[[config]]\ntarget = \".zshrc\"\nsource = \"zsh/zshrc\"\n")
        .with_source("zsh/zshrc", "zsh\n")
        .build();
    let (ctx, log) = repo.context(Os::Unknown, None, false);

    let tasks = build_tasks(&plan(categories(&["essential"]), true), &ctx);
    let err = run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, &log).unwrap_err();

    assert_eq!(err.to_string(), "1 step(s) failed");
    assert!(repo.executor.calls().is_empty());
    let entries = log.task_entries();
    assert_eq!(entries[0].name, "Install tools");
    assert_eq!(entries[0].status, TaskStatus::Failed);
    let message = entries[0].message.clone().unwrap_or_default();
    assert!(message.contains("unsupported platform"), "{message}");
    assert!(!message.contains("unknown.toml"), "{message}");
    assert!(repo.target(".zshrc").exists());
}

#[test]
fn linux_run_has_no_homebrew_step() {
    let repo = TestRepo::builder()
        .with_file("tools/linux.toml", LINUX_TOOLS)
        .build();
    let (ctx, _log) = repo.context(Os::Linux, None, false);

    let tasks = build_tasks(&plan(ToolSelection::All, false), &ctx);

    assert!(tasks.iter().all(|t| t.name() != "Install Homebrew"));
}
