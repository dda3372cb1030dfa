/// Clap argument definitions
mod args;

/// `apply` command (interactive selection and moves)
mod apply;

/// Config command handlers
mod config;

/// `detect` and `plan` commands
mod detect;

/// Shared CLI utilities
mod util;

use clap::Parser;
use std::path::PathBuf;

use resort_core::AttachmentResorter;
use resort_core::fs::{RealFileSystem, SyncToAsyncFs};
use resort_core::policy::FolderPolicy;

/// Type alias for the async filesystem used throughout the CLI.
/// Wraps RealFileSystem with SyncToAsyncFs for use with async-first core APIs.
pub type AsyncFs = SyncToAsyncFs<RealFileSystem>;

/// Type alias for the resorter the CLI drives.
pub type CliResorter = AttachmentResorter<AsyncFs, FolderPolicy>;

/// Helper to run async operations in sync context
fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}

pub use args::Cli;
use args::Commands;

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();

    let success = match cli.command {
        Commands::Config { command } => config::handle_config_command(command, cli.vault),

        Commands::Detect { json } => {
            with_resorter(cli.vault, |resorter| detect::handle_detect(resorter, json))
        }

        Commands::Plan { output } => {
            with_resorter(cli.vault, |resorter| detect::handle_plan(resorter, &output))
        }

        Commands::Apply { plan, yes, dry_run } => with_resorter(cli.vault, |resorter| {
            apply::handle_apply(resorter, plan, yes, dry_run)
        }),
    };

    if !success {
        std::process::exit(1);
    }
}

/// Build the resorter from config (and `--vault`), then run `handler`.
/// Returns false if the resorter could not be set up.
fn with_resorter(vault: Option<PathBuf>, handler: impl FnOnce(&mut CliResorter) -> bool) -> bool {
    match util::load_resorter(vault) {
        Ok(mut resorter) => handler(&mut resorter),
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}
