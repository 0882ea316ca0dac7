//! Platform detection: operating system, Linux distribution, WSL and the
//! package manager the installer should drive.
use std::fmt;
use std::path::Path;

use crate::error::PlatformError;
use crate::exec::Executor;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Apple macOS.
    MacOs,
    /// Any Linux distribution (including WSL).
    Linux,
    /// Microsoft Windows.
    Windows,
    /// Anything else; no package manager support.
    Unknown,
}

impl Os {
    /// Platforms with package manager support, as named in config files.
    pub const SUPPORTED: [Self; 3] = [Self::MacOs, Self::Linux, Self::Windows];

    /// The OS this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Lower-case name used in config files and output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Homebrew (macOS).
    Brew,
    /// Debian/Ubuntu.
    Apt,
    /// Arch Linux.
    Pacman,
    /// Fedora.
    Dnf,
    /// RHEL/CentOS.
    Yum,
    /// openSUSE.
    Zypper,
    /// Gentoo.
    Emerge,
    /// Windows Package Manager.
    Winget,
}

/// Linux package managers in detection priority order.
pub const LINUX_PACKAGE_MANAGERS: [PackageManager; 6] = [
    PackageManager::Apt,
    PackageManager::Pacman,
    PackageManager::Dnf,
    PackageManager::Yum,
    PackageManager::Zypper,
    PackageManager::Emerge,
];

impl PackageManager {
    /// Binary name, also used as the key in tool list files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Apt => "apt",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
            Self::Emerge => "emerge",
            Self::Winget => "winget",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// Linux distribution ID (e.g. `ubuntu`, `arch`).
    pub distro: Option<String>,
    /// First available package manager, if any.
    pub package_manager: Option<PackageManager>,
    /// Running under Windows Subsystem for Linux.
    pub is_wsl: bool,
}

impl Platform {
    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(
        os: Os,
        distro: Option<String>,
        package_manager: Option<PackageManager>,
        is_wsl: bool,
    ) -> Self {
        Self {
            os,
            distro,
            package_manager,
            is_wsl,
        }
    }

    /// Detect the current platform, probing `PATH` through `executor`.
    pub fn detect(executor: &dyn Executor) -> Self {
        let os = Os::current();
        let (distro, is_wsl) = if os == Os::Linux {
            let release = std::fs::read_to_string("/proc/sys/kernel/osrelease").unwrap_or_default();
            (detect_linux_distro(Path::new("/etc")), is_wsl_kernel(&release))
        } else {
            (None, false)
        };
        Self {
            os,
            distro,
            package_manager: detect_package_manager(os, executor),
            is_wsl,
        }
    }

    /// Return the package manager, or the reason there is none.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on an unknown OS and
    /// [`PlatformError::MissingPackageManager`] when detection found nothing.
    pub fn require_package_manager(&self) -> Result<PackageManager, PlatformError> {
        if self.os == Os::Unknown {
            return Err(PlatformError::Unsupported {
                platform: std::env::consts::OS.to_string(),
            });
        }
        self.package_manager
            .ok_or_else(|| PlatformError::MissingPackageManager {
                os: self.os.to_string(),
                hint: missing_manager_hint(self.os).map(String::from),
            })
    }

    /// Lines printed by `--platform-info`.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!("OS: {}", self.os)];
        if let Some(distro) = &self.distro {
            lines.push(format!("Distribution: {distro}"));
        }
        lines.push(format!(
            "Package Manager: {}",
            self.package_manager
                .map_or("None detected", PackageManager::name)
        ));
        if self.is_wsl {
            lines.push("Environment: WSL".to_string());
        }
        lines
    }
}

/// Pick the package manager for `os` by probing binaries in priority order.
pub fn detect_package_manager(os: Os, executor: &dyn Executor) -> Option<PackageManager> {
    let candidates: &[PackageManager] = match os {
        Os::MacOs => &[PackageManager::Brew],
        Os::Linux => &LINUX_PACKAGE_MANAGERS,
        Os::Windows => &[PackageManager::Winget],
        Os::Unknown => &[],
    };
    candidates
        .iter()
        .copied()
        .find(|pm| executor.which(pm.name()))
}

/// Extract the `ID=` field from `/etc/os-release` content.
#[must_use]
pub fn parse_os_release(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("ID="))
        .map(|id| id.trim().trim_matches('"').to_string())
        .filter(|id| !id.is_empty())
}

/// Detect the Linux distribution from files under `etc`.
#[must_use]
pub fn detect_linux_distro(etc: &Path) -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(etc.join("os-release"))
        && let Some(id) = parse_os_release(&content)
    {
        return Some(id);
    }
    [
        ("debian_version", "debian"),
        ("redhat-release", "redhat"),
        ("arch-release", "arch"),
    ]
    .into_iter()
    .find(|(marker, _)| etc.join(marker).exists())
    .map(|(_, distro)| distro.to_string())
}

/// WSL kernels carry `microsoft` in their release string.
#[must_use]
pub fn is_wsl_kernel(release: &str) -> bool {
    release.to_lowercase().contains("microsoft")
}

const fn missing_manager_hint(os: Os) -> Option<&'static str> {
    match os {
        Os::MacOs => Some("install Homebrew from https://brew.sh"),
        Os::Linux => Some(
            "Ubuntu/Debian ship apt, Arch ships pacman, Fedora ships dnf; install one manually",
        ),
        Os::Windows | Os::Unknown => None,
    }
}
