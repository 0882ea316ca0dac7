//! Template variables loaded from `settings.toml`.
use std::collections::BTreeMap;
use std::path::Path;

use super::toml_loader;
use crate::error::ConfigError;

/// Flat, read-only variable map used for template substitution.
///
/// `settings.toml` is flattened so that
///
/// ```toml
/// editor = "nvim"
///
/// [font]
/// mono = "Fira Code"
/// ```
///
/// yields `editor`, `font_mono` and `mono`. Top-level keys win over the bare
/// aliases of section keys, and the builtins `home` and `repo` always win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Load `path` and add the `home` and `repo` builtins.
    ///
    /// A missing file yields only the builtins.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path, home: &Path, repo: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = toml_loader::load_optional(path)?.unwrap_or_default();
        let mut settings = Self::from_table(&table);
        settings.set_builtins(home, repo);
        Ok(settings)
    }

    /// Flatten a parsed TOML table. Does not add builtins.
    #[must_use]
    pub fn from_table(table: &toml::Table) -> Self {
        let mut values = BTreeMap::new();
        let mut aliases = BTreeMap::new();

        for (key, value) in table {
            match value {
                toml::Value::Table(section) => {
                    for (inner, inner_value) in section {
                        if let Some(rendered) = render_scalar(inner_value) {
                            values.insert(format!("{key}_{inner}"), rendered.clone());
                            aliases.entry(inner.clone()).or_insert(rendered);
                        }
                    }
                }
                other => {
                    if let Some(rendered) = render_scalar(other) {
                        values.insert(key.clone(), rendered);
                    }
                }
            }
        }

        for (alias, value) in aliases {
            values.entry(alias).or_insert(value);
        }
        Self { values }
    }

    fn set_builtins(&mut self, home: &Path, repo: &Path) {
        self.values
            .insert("home".to_string(), home.display().to_string());
        self.values
            .insert("repo".to_string(), repo.display().to_string());
    }

    /// Value for `key`, if defined.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of defined variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no variables are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Strings verbatim, other non-table values in their TOML form.
fn render_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Table(_) => None,
        other => Some(other.to_string()),
    }
}
