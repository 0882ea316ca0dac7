//! Domain-specific error types for the dotfiles installer.
//!
//! Internal modules return these typed errors while task and command handlers
//! convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! ```text
//! ConfigError   : settings.toml, configs.toml, tools/*.toml
//! PlatformError : OS and package manager detection
//! ResourceError : package manager and installer subprocesses
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from loading the declarative TOML inputs.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A config file is not valid TOML or does not match the expected shape.
    #[error("invalid TOML in {}: {message}", path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A tool category was requested that the tool list does not declare.
    #[error("no tools found for category '{category}' in {}", path.display())]
    UnknownCategory {
        /// Requested category name.
        category: String,
        /// Tool list that was searched.
        path: PathBuf,
    },

    /// A config entry combines options that cannot be deployed.
    #[error("invalid config entry '{entry}': {reason}")]
    InvalidEntry {
        /// Source path of the entry, relative to `config/`.
        entry: String,
        /// Why the entry was rejected.
        reason: String,
    },
}

/// Errors that arise from platform detection.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The operating system is not one the installer knows about.
    #[error("unsupported platform: {platform}")]
    Unsupported {
        /// Name of the platform as reported by the standard library.
        platform: String,
    },

    /// No known package manager is available on this system.
    #[error("no supported package manager found on {os}{}", hint.as_deref().map_or_else(String::new, |h| format!(" ({h})")))]
    MissingPackageManager {
        /// Detected OS name.
        os: String,
        /// Suggestion shown to the user, if any.
        hint: Option<String>,
    },
}

/// Errors that arise while applying a resource change.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command exited with a non-zero status.
    #[error("command '{program}' failed (exit {exit_code})")]
    ExecutionFailed {
        /// Name of the program that was invoked.
        program: String,
        /// Exit code returned by the process (`-1` when killed by a signal).
        exit_code: i32,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_io_display_and_source() {
        use std::error::Error as _;
        let e = ConfigError::Io {
            path: PathBuf::from("/repo/settings.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("/repo/settings.toml"));
        assert!(e.to_string().contains("IO error reading config file"));
        assert!(e.source().is_some());
    }

    #[test]
    fn config_error_parse_display() {
        let e = ConfigError::Parse {
            path: PathBuf::from("tools/linux.toml"),
            message: "expected `=`".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid TOML in tools/linux.toml: expected `=`"
        );
    }

    #[test]
    fn config_error_unknown_category_display() {
        let e = ConfigError::UnknownCategory {
            category: "gaming".to_string(),
            path: PathBuf::from("tools/macos.toml"),
        };
        assert_eq!(
            e.to_string(),
            "no tools found for category 'gaming' in tools/macos.toml"
        );
    }

    #[test]
    fn config_error_invalid_entry_display() {
        let e = ConfigError::InvalidEntry {
            entry: "nvim".to_string(),
            reason: "directories cannot be templated".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid config entry 'nvim': directories cannot be templated"
        );
    }

    #[test]
    fn platform_error_unsupported_display() {
        let e = PlatformError::Unsupported {
            platform: "freebsd".to_string(),
        };
        assert_eq!(e.to_string(), "unsupported platform: freebsd");
    }

    #[test]
    fn platform_error_missing_manager_with_hint() {
        let e = PlatformError::MissingPackageManager {
            os: "linux".to_string(),
            hint: Some("Fedora ships with dnf".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "no supported package manager found on linux (Fedora ships with dnf)"
        );
    }

    #[test]
    fn platform_error_missing_manager_without_hint() {
        let e = PlatformError::MissingPackageManager {
            os: "windows".to_string(),
            hint: None,
        };
        assert_eq!(
            e.to_string(),
            "no supported package manager found on windows"
        );
    }

    #[test]
    fn resource_error_execution_failed_display() {
        let e = ResourceError::ExecutionFailed {
            program: "sudo".to_string(),
            exit_code: 100,
        };
        assert_eq!(e.to_string(), "command 'sudo' failed (exit 100)");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ConfigError>();
        assert_send_sync::<PlatformError>();
        assert_send_sync::<ResourceError>();
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let _config: anyhow::Error = ConfigError::Parse {
            path: PathBuf::from("x"),
            message: "y".to_string(),
        }
        .into();
        let _platform: anyhow::Error = PlatformError::Unsupported {
            platform: "z".to_string(),
        }
        .into();
        let _resource: anyhow::Error = ResourceError::ExecutionFailed {
            program: "brew".to_string(),
            exit_code: 1,
        }
        .into();
    }
}
