//! bgstats-merge CLI
//!
//! Command-line interface for merging BG Stats export files.

mod cli_types;
mod commands;
mod display;
mod error;
mod logging;
mod prompt;
mod settings;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Merge {
            files,
            output,
            base,
            player,
        } => commands::merge::run_merge(files, output, base, player),
        Commands::Inspect { files } => commands::inspect::run_inspect(&files),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetOutput { path } => commands::config::run_config_set_output(path),
            ConfigAction::ClearOutput => commands::config::run_config_clear_output(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
