//! Root CLI structure for pchtxt-rs

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pchtxt-rs")]
#[command(about = "Command-line tools for Patch Text (pchtxt) files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display information about a Patch Text file
    Info {
        /// Path to the pchtxt file
        file: PathBuf,

        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a Patch Text file and print parser diagnostics
    Validate {
        /// Path to the pchtxt file
        file: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
