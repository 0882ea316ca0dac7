use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::{GlobalOpts, InstallOpts, InstallPlan, ToolSelection};
use crate::config::ToolList;
use crate::error::PlatformError;
use crate::logging::{Logger, TaskStatus};
use crate::platform::Os;
use crate::tasks::configs::DeployConfigs;
use crate::tasks::tools::{InstallTools, SetupPackageManager};
use crate::tasks::{Context, Task};

/// Run the default install command.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved or any step fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    let version = option_env!("DOTFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("dotfiles {version}"));

    let ctx = CommandSetup::init(global, log)?.into_context(log, global.dry_run);
    let plan = opts.plan();
    if global.dry_run {
        log.info("dry run: nothing will be installed or written");
    }

    let tasks = build_tasks(&plan, &ctx);
    run_tasks_to_completion(tasks.iter().map(AsRef::as_ref), &ctx, log)
}

/// Build the ordered step list for `plan`.
///
/// An unsupported platform or a tool list that cannot be loaded is recorded
/// as a failed step and the config deployment still runs.
pub fn build_tasks(plan: &InstallPlan, ctx: &Context) -> Vec<Box<dyn Task>> {
    let mut tasks: Vec<Box<dyn Task>> = Vec::new();

    if plan.tools != ToolSelection::None {
        match tool_tasks(&plan.tools, ctx) {
            Ok(tool_tasks) => tasks.extend(tool_tasks),
            Err(e) => {
                ctx.log.error(&format!("Install tools: {e}"));
                ctx.log
                    .record_task("Install tools", TaskStatus::Failed, Some(&e.to_string()));
            }
        }
    }

    if plan.configs {
        tasks.push(Box::new(DeployConfigs));
    }
    tasks
}

/// Homebrew bootstrap (macOS only) followed by one step per category.
fn tool_tasks(selection: &ToolSelection, ctx: &Context) -> Result<Vec<Box<dyn Task>>> {
    let os = ctx.platform().os;
    if let Err(e @ PlatformError::Unsupported { .. }) = ctx.platform().require_package_manager() {
        return Err(e.into());
    }

    let tools = Arc::new(ToolList::load(&ctx.root, os)?);
    let categories = match selection {
        ToolSelection::Categories(categories) => categories.clone(),
        ToolSelection::All | ToolSelection::None => tools.category_names(),
    };
    ctx.log.debug(&format!(
        "{}: {}",
        tools.path().display(),
        categories.join(", ")
    ));

    let mut tasks: Vec<Box<dyn Task>> = Vec::new();
    if os == Os::MacOs {
        tasks.push(Box::new(SetupPackageManager));
    }
    for category in &categories {
        tasks.push(Box::new(InstallTools::new(category, Arc::clone(&tools))));
    }
    Ok(tasks)
}
