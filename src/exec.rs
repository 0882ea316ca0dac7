//! Subprocess execution behind an injectable [`Executor`].
use anyhow::{Context as _, Result};
use std::process::Command;

use crate::error::ResourceError;

/// Abstraction over process spawning so package manager calls can be
/// replaced in tests.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command attached to the terminal so the user sees progress and
    /// can answer prompts (e.g. `sudo` passwords).
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        if !status.success() {
            return Err(ResourceError::ExecutionFailed {
                program: program.to_string(),
                exit_code: status.code().unwrap_or(-1),
            }
            .into());
        }
        Ok(())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render a command line for logs and dry-run previews.
#[must_use]
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
