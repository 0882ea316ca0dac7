//! Idempotent resource primitives (check + apply pattern).
pub mod config_file;
pub mod helpers;
pub mod package;
pub mod sync;

use std::path::PathBuf;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources that cannot cheaply determine their own state (package batches,
/// where the package manager decides what is already installed) implement only
/// this trait. Resources that can inspect the filesystem implement the richer
/// [`Resource`] super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// permission issues, failing subprocesses, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "contents differ".into() };
/// let broken = ResourceState::Invalid { reason: "source does not exist".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, broken);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist at the destination.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// Description of what is there now.
        current: String,
    },
    /// Resource cannot be applied (e.g. its source is missing).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Existing destination was moved aside before the resource was written.
    Replaced {
        /// Where the previous destination now lives.
        backup: PathBuf,
    },
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O failures
    /// or permission issues.
    fn current_state(&self) -> Result<ResourceState>;
}
