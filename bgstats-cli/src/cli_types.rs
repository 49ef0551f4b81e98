//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bgstats-merge")]
#[command(about = "Merge BG Stats export files into one", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Merge export files, asking about anything that cannot be matched
    Merge {
        /// Export files to merge (BG Stats JSON backups)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Where to write the merged export (default: settings, then export.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base file, by file name or by its number in the list (1-based)
        #[arg(long)]
        base: Option<String>,

        /// Id of the target player in the base file
        #[arg(long)]
        player: Option<u32>,
    },

    /// Show owner, entity counts and players of export files
    Inspect {
        /// Export files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the effective output path
    Show,

    /// Print the settings file path
    Path,

    /// Save the default output path for merges
    SetOutput {
        /// Path to write merged exports to
        path: PathBuf,
    },

    /// Remove the saved output path
    ClearOutput,
}
