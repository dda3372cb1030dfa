//! Command-line argument structures and enums

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resort")]
#[command(
    about = "Find note attachments sitting in the wrong folder and move them where their notes expect them",
    long_about = None
)]
pub struct Cli {
    /// Override vault location
    #[arg(short, long, global = true)]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List misplaced attachments and their candidate folders
    Detect {
        /// Print pairs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a selection plan (first candidate for every pair) to edit and apply later
    Plan {
        /// Where to write the plan
        output: PathBuf,
    },

    /// Move misplaced attachments
    Apply {
        /// Apply a plan file instead of detecting and prompting
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Accept the first candidate for every pair without prompting
        #[arg(short = 'y', long)]
        yes: bool,

        /// Show what would be moved without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a config file for the vault (--vault, or the current directory)
    Init,
}
