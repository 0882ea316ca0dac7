//! `$name` / `${name}` placeholder substitution for templated config files.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::Settings;

/// `$$`, `$name` or `${name}`.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(\$)|([_A-Za-z][_A-Za-z0-9]*)|\{([_A-Za-z][_A-Za-z0-9]*)\})")
        .expect("placeholder pattern is valid")
});

fn placeholder_name<'a>(caps: &'a Captures<'_>) -> Option<&'a str> {
    caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
}

/// Substitute every known placeholder in `content` in a single pass.
///
/// Unknown placeholders are left as written and `$$` becomes `$`.
/// Substituted values are never expanded again.
#[must_use]
pub fn render(content: &str, settings: &Settings) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                return "$".to_string();
            }
            placeholder_name(caps)
                .and_then(|name| settings.get(name))
                .or_else(|| caps.get(0).map(|m| m.as_str()))
                .unwrap_or_default()
                .to_string()
        })
        .into_owned()
}

/// Placeholder names in `content` that `settings` does not define, in order
/// of first appearance.
#[must_use]
pub fn unresolved(content: &str, settings: &Settings) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        if let Some(name) = placeholder_name(&caps)
            && settings.get(name).is_none()
            && !missing.iter().any(|m| m == name)
        {
            missing.push(name.to_string());
        }
    }
    missing
}
