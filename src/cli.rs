use clap::{Args, Parser, Subcommand};

use crate::config::tools::DEFAULT_CATEGORY;

/// Top-level CLI entry point for the dotfiles manager.
///
/// Without a subcommand the flags select what to install; `sync-repo` copies
/// deployed files back into the repository.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Install tools and deploy configuration files",
    version = option_env!("DOTFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Subcommand; the default run installs.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every command.
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Selection flags for the default run.
    #[command(flatten)]
    pub install: InstallOpts,
}

impl Cli {
    /// Name used for the log file (`<command>.log`).
    #[must_use]
    pub fn command_name(&self) -> &'static str {
        match self.command {
            Some(Command::SyncRepo) => "sync-repo",
            None if self.install.platform_info => "platform-info",
            None => "install",
        }
    }
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy deployed configuration files back into the repository
    SyncRepo,
}

/// Selection flags for the default install run.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Install every tool category and deploy configuration files
    #[arg(long, conflicts_with = "tools")]
    pub all: bool,

    /// Install tools from the given categories (default: essential)
    #[arg(long, num_args = 0.., value_delimiter = ',', value_name = "CATEGORIES")]
    pub tools: Option<Vec<String>>,

    /// Deploy configuration files
    #[arg(long)]
    pub configs: bool,

    /// Print detected platform information and exit
    #[arg(long)]
    pub platform_info: bool,
}

/// Which tool categories an install run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSelection {
    /// Install no tools.
    None,
    /// Every category the tool list declares.
    All,
    /// The named categories, in the order given.
    Categories(Vec<String>),
}

/// What an install run does, derived from [`InstallOpts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Tool categories to install.
    pub tools: ToolSelection,
    /// Whether to deploy configuration files.
    pub configs: bool,
}

impl InstallOpts {
    /// Resolve the selection flags into a plan.
    ///
    /// No flags means essential tools plus configs. `--tools` and `--configs`
    /// each select only their own step; giving both selects both.
    #[must_use]
    pub fn plan(&self) -> InstallPlan {
        if self.all {
            return InstallPlan {
                tools: ToolSelection::All,
                configs: true,
            };
        }

        let tools = match &self.tools {
            Some(categories) => {
                let categories = dedup(categories);
                if categories.is_empty() {
                    ToolSelection::Categories(vec![DEFAULT_CATEGORY.to_string()])
                } else {
                    ToolSelection::Categories(categories)
                }
            }
            None if !self.configs => {
                ToolSelection::Categories(vec![DEFAULT_CATEGORY.to_string()])
            }
            None => ToolSelection::None,
        };
        let configs = self.configs || self.tools.is_none();

        InstallPlan { tools, configs }
    }
}

/// Drop repeated and blank categories, keeping first-seen order.
fn dedup(categories: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for category in categories.iter().map(|c| c.trim()) {
        if !category.is_empty() && !seen.iter().any(|s: &String| s == category) {
            seen.push(category.to_string());
        }
    }
    seen
}
