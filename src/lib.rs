//! Personal dotfiles manager.
//!
//! Installs command-line tools through the platform's package manager and
//! deploys configuration files from the repository into the home directory,
//! rendering `$name` placeholders from `settings.toml` on the way. The
//! `sync-repo` command copies edited files back.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: tool lists, config entries and settings read from TOML
//! - **[`resources`]**: idempotent `check + apply` primitives (deployed files, package batches)
//! - **[`tasks`]**: named steps wired to resources
//! - **[`commands`]**: top-level orchestration (`install`, `sync-repo`, `--platform-info`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
pub mod template;
