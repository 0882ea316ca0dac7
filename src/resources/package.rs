//! Package installation resource.
use std::fmt;

use anyhow::Result;

use super::{Applicable, ResourceChange};
use crate::exec::Executor;
use crate::platform::PackageManager;

/// A single command line issued to a package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Program to spawn.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
}

impl InstallCommand {
    fn new(program: &str, args: &[&str], packages: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args
                .iter()
                .map(|a| (*a).to_string())
                .chain(packages.iter().cloned())
                .collect(),
        }
    }

    fn sudo(args: &[&str], packages: &[String]) -> Self {
        Self::new("sudo", args, packages)
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Commands that install `packages` (and Homebrew `casks`) with `manager`.
///
/// Every manager installs the whole list in one call, except winget which
/// takes one package per call. apt and pacman refresh their index first.
#[must_use]
pub fn install_commands(
    manager: PackageManager,
    packages: &[String],
    casks: &[String],
) -> Vec<InstallCommand> {
    let mut commands = Vec::new();
    if !packages.is_empty() {
        match manager {
            PackageManager::Brew => {
                commands.push(InstallCommand::new("brew", &["install"], packages));
            }
            PackageManager::Apt => {
                commands.push(InstallCommand::sudo(&["apt", "update"], &[]));
                commands.push(InstallCommand::sudo(&["apt", "install", "-y"], packages));
            }
            PackageManager::Pacman => {
                commands.push(InstallCommand::sudo(&["pacman", "-Sy"], &[]));
                commands.push(InstallCommand::sudo(
                    &["pacman", "-S", "--needed", "--noconfirm"],
                    packages,
                ));
            }
            PackageManager::Dnf => {
                commands.push(InstallCommand::sudo(&["dnf", "install", "-y"], packages));
            }
            PackageManager::Yum => {
                commands.push(InstallCommand::sudo(&["yum", "install", "-y"], packages));
            }
            PackageManager::Zypper => {
                commands.push(InstallCommand::sudo(
                    &["zypper", "--non-interactive", "install"],
                    packages,
                ));
            }
            PackageManager::Emerge => {
                commands.push(InstallCommand::sudo(&["emerge", "--noreplace"], packages));
            }
            PackageManager::Winget => {
                commands.extend(packages.iter().map(|id| {
                    InstallCommand::new(
                        "winget",
                        &[
                            "install",
                            "--id",
                            id.as_str(),
                            "--exact",
                            "--source",
                            "winget",
                            "--accept-source-agreements",
                            "--accept-package-agreements",
                        ],
                        &[],
                    )
                }));
            }
        }
    }
    if manager == PackageManager::Brew && !casks.is_empty() {
        commands.push(InstallCommand::new("brew", &["install", "--cask"], casks));
    }
    commands
}

/// All packages of one category, installed in as few manager calls as
/// possible.
#[derive(Debug)]
pub struct PackageBatch<'a> {
    /// Category the packages belong to.
    pub category: String,
    /// Package manager to use.
    pub manager: PackageManager,
    /// Regular packages.
    pub packages: Vec<String>,
    /// Homebrew casks.
    pub casks: Vec<String>,
    /// Executor for running package manager commands.
    executor: &'a dyn Executor,
}

impl<'a> PackageBatch<'a> {
    /// Create a new batch.
    #[must_use]
    pub const fn new(
        category: String,
        manager: PackageManager,
        packages: Vec<String>,
        casks: Vec<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            category,
            manager,
            packages,
            casks,
            executor,
        }
    }

    /// Commands [`apply`](Applicable::apply) will run, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<InstallCommand> {
        install_commands(self.manager, &self.packages, &self.casks)
    }
}

impl Applicable for PackageBatch<'_> {
    fn description(&self) -> String {
        let mut names = self.packages.clone();
        names.extend(self.casks.iter().cloned());
        format!("{} {} ({})", self.manager, self.category, names.join(", "))
    }

    fn apply(&self) -> Result<ResourceChange> {
        for command in self.commands() {
            let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
            self.executor.run_interactive(&command.program, &args)?;
        }
        Ok(ResourceChange::Applied)
    }
}
