//! Tool lists: per-category packages for each package manager.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::toml_loader;
use crate::error::ConfigError;
use crate::platform::{Os, PackageManager};

/// Categories listed first, in this order; the rest follow alphabetically.
pub const KNOWN_CATEGORIES: [&str; 3] = ["essential", "development", "optional"];

/// Category installed when no categories are named.
pub const DEFAULT_CATEGORY: &str = "essential";

/// Raw shape of `tools/<os>.toml`.
///
/// The macOS file lists Homebrew formulae directly under `[packages]` and GUI
/// apps under `[casks]`; the other files key each category by manager.
#[derive(Debug, Default, Deserialize)]
struct ToolFile {
    #[serde(default)]
    packages: BTreeMap<String, CategorySection>,
    #[serde(default)]
    casks: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategorySection {
    Brew(Vec<String>),
    PerManager(BTreeMap<String, Vec<String>>),
}

/// Packages declared for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCategory {
    /// Package names keyed by package manager name.
    pub packages: BTreeMap<String, Vec<String>>,
    /// Homebrew casks.
    pub casks: Vec<String>,
}

/// Packages to install for one category on one package manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTools {
    /// Regular packages.
    pub packages: Vec<String>,
    /// Homebrew casks; always empty for other managers.
    pub casks: Vec<String>,
}

impl ResolvedTools {
    /// True when there is nothing to install.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.casks.is_empty()
    }
}

/// Tool list for one operating system.
#[derive(Debug, Clone, Default)]
pub struct ToolList {
    path: PathBuf,
    categories: BTreeMap<String, ToolCategory>,
}

impl ToolList {
    /// Load `tools/<os>.toml` under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load(root: &Path, os: Os) -> Result<Self, ConfigError> {
        let path = root.join("tools").join(format!("{}.toml", os.name()));
        let file: ToolFile = toml_loader::load_required(&path)?;
        Ok(Self::from_file(path, file))
    }

    /// Parse a tool list from TOML text. `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `content` is not a valid tool list.
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let file: ToolFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        Ok(Self::from_file(path.to_path_buf(), file))
    }

    fn from_file(path: PathBuf, file: ToolFile) -> Self {
        let mut categories: BTreeMap<String, ToolCategory> = BTreeMap::new();
        for (name, section) in file.packages {
            let entry = categories.entry(name).or_default();
            match section {
                CategorySection::Brew(list) => {
                    entry
                        .packages
                        .insert(PackageManager::Brew.name().to_string(), list);
                }
                CategorySection::PerManager(map) => entry.packages.extend(map),
            }
        }
        for (name, casks) in file.casks {
            categories.entry(name).or_default().casks = casks;
        }
        Self { path, categories }
    }

    /// File this list was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared category names: known categories first, then alphabetical.
    #[must_use]
    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = KNOWN_CATEGORIES
            .iter()
            .filter(|c| self.categories.contains_key(**c))
            .map(|c| (*c).to_string())
            .collect();
        names.extend(
            self.categories
                .keys()
                .filter(|k| !KNOWN_CATEGORIES.contains(&k.as_str()))
                .cloned(),
        );
        names
    }

    /// Packages for `category` on `manager`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCategory`] if the category is not declared.
    pub fn resolve(
        &self,
        category: &str,
        manager: PackageManager,
    ) -> Result<ResolvedTools, ConfigError> {
        let section =
            self.categories
                .get(category)
                .ok_or_else(|| ConfigError::UnknownCategory {
                    category: category.to_string(),
                    path: self.path.clone(),
                })?;
        Ok(ResolvedTools {
            packages: section
                .packages
                .get(manager.name())
                .cloned()
                .unwrap_or_default(),
            casks: if manager == PackageManager::Brew {
                section.casks.clone()
            } else {
                Vec::new()
            },
        })
    }
}
