//! Generic resource processing loop: check state, apply, collect stats.

use anyhow::Result;

use super::{Context, TaskResult};
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 3, already_ok: 10, failed: 0 };
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
///
/// let stats = TaskStats { changed: 1, already_ok: 2, failed: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items that could not be processed.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of items seen.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.changed + self.already_ok + self.failed
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.failed > 0 {
            format!(
                "{} {verb}, {} already ok, {} failed",
                self.changed, self.already_ok, self.failed
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and turn the counters into a task outcome.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failure count if any item failed.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            anyhow::bail!("{} of {} entries failed", self.failed, self.total());
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.failed += other.failed;
    }
}

/// Process resources by checking each one's current state and applying as
/// needed.
///
/// A resource that is [`ResourceState::Invalid`], or whose state check or
/// apply fails, is logged and counted as failed; the remaining resources are
/// still processed. `verb` is used in log messages ("deploy", "sync").
///
/// # Errors
///
/// Returns an error after processing everything if any resource failed.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats += process_single(ctx, &resource, verb);
    }
    stats.finish(ctx)
}

/// Process one resource, returning a stats delta.
fn process_single<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> TaskStats {
    let desc = resource.description();
    let mut delta = TaskStats::new();

    let state = match resource.current_state() {
        Ok(state) => state,
        Err(e) => {
            ctx.log.warn(&format!("failed to check {desc}: {e:#}"));
            delta.failed += 1;
            return delta;
        }
    };

    match state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("cannot {verb} {desc}: {reason}"));
            delta.failed += 1;
        }
        ResourceState::Missing if ctx.dry_run => {
            ctx.log.dry_run(&format!("would {verb}: {desc}"));
            delta.changed += 1;
        }
        ResourceState::Incorrect { current } if ctx.dry_run => {
            ctx.log
                .dry_run(&format!("would {verb} {desc} (currently {current})"));
            delta.changed += 1;
        }
        ResourceState::Missing | ResourceState::Incorrect { .. } => match resource.apply() {
            Ok(ResourceChange::Applied) => {
                ctx.log.info(&format!("{verb}: {desc}"));
                delta.changed += 1;
            }
            Ok(ResourceChange::Replaced { backup }) => {
                ctx.log.info(&format!("{verb}: {desc}"));
                ctx.log
                    .info(&format!("  backed up to {}", ctx.display_home_path(&backup)));
                delta.changed += 1;
            }
            Err(e) => {
                ctx.log.warn(&format!("failed to {verb} {desc}: {e:#}"));
                delta.failed += 1;
            }
        },
    }
    delta
}
