//! Deploy configuration files from the repository into home.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_resources};
use crate::config::{Config, ConfigEntry};
use crate::resources::config_file::DeployResource;
use crate::template;

/// Copy, render or symlink every applicable config entry into home.
#[derive(Debug)]
pub struct DeployConfigs;

impl DeployConfigs {
    /// Warn about placeholders a templated entry leaves unresolved.
    fn report_unresolved(ctx: &Context, config: &Config, entry: &ConfigEntry) {
        let Ok(content) = std::fs::read_to_string(entry.source_path(&ctx.root)) else {
            return;
        };
        let missing = template::unresolved(&content, &config.settings);
        if !missing.is_empty() {
            ctx.log.warn(&format!(
                "{}: no setting for {}; left as-is",
                entry.source.display(),
                missing
                    .iter()
                    .map(|name| format!("${name}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }
}

impl Task for DeployConfigs {
    fn name(&self) -> &str {
        "Deploy configuration files"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config = Config::load(&ctx.root, &ctx.home)?;
        let settings_path = Config::settings_path(&ctx.root);
        if !settings_path.exists() {
            ctx.log.warn(&format!(
                "{} not found; templates can only use $home and $repo",
                settings_path.display()
            ));
        }

        let os = ctx.platform().os;
        let mut resources = Vec::new();
        for entry in &config.entries {
            if !entry.applies_to(os) {
                ctx.log.debug(&format!(
                    "skipping {} (only on {})",
                    entry.target.display(),
                    entry.platforms.join(", ")
                ));
                continue;
            }
            if entry.templated {
                Self::report_unresolved(ctx, &config, entry);
            }
            resources.push(DeployResource::from_entry(
                entry,
                &ctx.root,
                &ctx.home,
                &config.settings,
            ));
        }

        if resources.is_empty() {
            return Ok(TaskResult::Skipped(format!("no config entries for {os}")));
        }
        process_resources(ctx, resources, "deploy")
    }
}
