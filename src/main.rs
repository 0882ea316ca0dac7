use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotfiles_installer::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let command = args.command_name();
    logging::init_subscriber(args.verbose, command, args.global.dry_run);
    let log = Arc::new(logging::Logger::new(command));

    if args.install.platform_info {
        commands::platform_info::run(&log);
        return Ok(());
    }

    match args.command {
        Some(cli::Command::SyncRepo) => commands::sync::run(&args.global, &log),
        None => commands::install::run(&args.global, &args.install, &log),
    }
}
