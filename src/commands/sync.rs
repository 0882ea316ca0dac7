use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::Task;
use crate::tasks::sync::SyncRepo;

/// Run the `sync-repo` command.
///
/// # Errors
///
/// Returns an error if the root cannot be resolved or any entry fails to sync.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let ctx = CommandSetup::init(global, log)?.into_context(log, global.dry_run);
    let tasks: [&dyn Task; 1] = [&SyncRepo];
    run_tasks_to_completion(tasks, &ctx, log)
}
