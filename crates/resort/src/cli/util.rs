//! Shared utilities for CLI commands

use std::io::{self, Write};
use std::path::PathBuf;

use resort_core::config::Config;
use resort_core::fs::{RealFileSystem, SyncToAsyncFs};
use resort_core::{AttachmentResorter, Result, ResortPair};

use crate::cli::CliResorter;

/// Load the config, apply a `--vault` override, and build the resorter.
pub fn load_resorter(vault_override: Option<PathBuf>) -> Result<CliResorter> {
    let config = effective_config(vault_override)?;
    log::debug!("Using vault {:?}", config.vault);
    Ok(AttachmentResorter::new(
        SyncToAsyncFs::new(RealFileSystem),
        config.vault,
        config.attachments,
    ))
}

/// The config file's settings with `--vault` taking precedence.
pub fn effective_config(vault_override: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(vault) = vault_override {
        config.vault = vault;
    }
    Ok(config)
}

/// Display form of a store path; the vault root has no name of its own.
pub fn display_folder(folder: &str) -> &str {
    if folder.is_empty() { "/" } else { folder }
}

/// Print one pair with numbered candidates.
pub fn print_pair(index: usize, total: usize, pair: &ResortPair) {
    println!(
        "[{}/{}] {} (in {})",
        index + 1,
        total,
        pair.attachment,
        display_folder(&pair.current_folder)
    );
    for (i, candidate) in pair.candidates.iter().enumerate() {
        println!(
            "    {}. {}  (from {})",
            i + 1,
            display_folder(&candidate.folder),
            candidate.note
        );
    }
}

/// Result of a per-pair prompt
#[derive(Debug, PartialEq, Eq)]
pub enum PairChoice {
    /// Move to the candidate at this index
    Accept(usize),
    /// Leave this attachment where it is
    Remove,
    /// Cancel the whole batch
    Quit,
}

/// Interpret an answer to the per-pair prompt.
///
/// `y` (or just Enter) picks the first candidate, a number picks that
/// candidate, `n` removes the pair, `q` cancels everything. `None` means
/// the answer was not understood.
pub fn parse_pair_choice(input: &str, candidates: usize) -> Option<PairChoice> {
    match input.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(PairChoice::Accept(0)),
        "n" | "no" => Some(PairChoice::Remove),
        "q" | "quit" => Some(PairChoice::Quit),
        other => match other.parse::<usize>() {
            Ok(n) if (1..=candidates).contains(&n) => Some(PairChoice::Accept(n - 1)),
            _ => None,
        },
    }
}

/// Prompt until the user gives a valid answer for a pair.
pub fn prompt_pair_choice(candidates: usize) -> PairChoice {
    loop {
        if candidates > 1 {
            print!("Move? [y/1-{}/n/q] ", candidates);
        } else {
            print!("Move? [y/n/q] ");
        }
        let _ = io::stdout().flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            // EOF or unreadable stdin cancels rather than guessing
            Ok(0) | Err(_) => return PairChoice::Quit,
            Ok(_) => {}
        }

        match parse_pair_choice(&input, candidates) {
            Some(choice) => return choice,
            None => println!("Please answer y, n, q or a candidate number."),
        }
    }
}

/// Ask a yes/no question, defaulting to no.
pub fn prompt_yes_no(message: &str) -> bool {
    print!("{} [y/N] ", message);
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
