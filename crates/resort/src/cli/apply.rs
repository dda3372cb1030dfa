//! `apply` command handler

use std::path::PathBuf;

use resort_core::{MoveReport, MoveSelection, ResortPair, SelectionPlan};

use crate::cli::util::{PairChoice, display_folder, print_pair, prompt_pair_choice, prompt_yes_no};
use crate::cli::{CliResorter, block_on};

/// Choose and execute moves. Returns false if anything failed.
///
/// Nothing touches the vault until every choice has been made; quitting
/// the prompt leaves the vault untouched.
pub fn handle_apply(
    resorter: &mut CliResorter,
    plan_path: Option<PathBuf>,
    yes: bool,
    dry_run: bool,
) -> bool {
    let plan = match plan_path {
        Some(path) => match block_on(SelectionPlan::load_from(resorter.fs(), &path)) {
            Ok(plan) => {
                if !yes
                    && !dry_run
                    && !prompt_yes_no(&format!(
                        "Apply {} move(s) from {}?",
                        plan.selected_count(),
                        path.display()
                    ))
                {
                    println!("Cancelled. Nothing was moved.");
                    return true;
                }
                plan
            }
            Err(e) => {
                eprintln!("✗ {}", e);
                return false;
            }
        },
        None => {
            let pairs = match block_on(resorter.detect_resort_pairs()) {
                Ok(pairs) => pairs,
                Err(e) => {
                    eprintln!("✗ {}", e);
                    return false;
                }
            };
            if pairs.is_empty() {
                println!("✓ All attachments are where their notes expect them.");
                return true;
            }

            if yes || dry_run {
                SelectionPlan::from_pairs(pairs)
            } else {
                match choose_interactively(pairs) {
                    Some(plan) => plan,
                    None => {
                        println!("Cancelled. Nothing was moved.");
                        return true;
                    }
                }
            }
        }
    };

    let selections = plan.into_selections();
    if selections.is_empty() {
        println!("Nothing to move.");
        return true;
    }

    if dry_run {
        print_dry_run(&selections);
        return true;
    }

    let report = block_on(resorter.execute_moves(&selections));
    print_report(&report);
    report.is_success()
}

/// Ask about every pair. `None` when the user quits.
fn choose_interactively(pairs: Vec<ResortPair>) -> Option<SelectionPlan> {
    let mut plan = SelectionPlan::from_pairs(pairs);
    let total = plan.len();

    for i in 0..total {
        let entry = &plan.entries[i];
        print_pair(i, total, &entry.pair);
        match prompt_pair_choice(entry.pair.candidates.len()) {
            PairChoice::Accept(candidate) => {
                plan.choose(i, candidate);
            }
            PairChoice::Remove => {
                plan.remove(i);
            }
            PairChoice::Quit => return None,
        }
        println!();
    }

    Some(plan)
}

fn print_dry_run(selections: &[MoveSelection]) {
    println!("Would move {} attachment(s):", selections.len());
    for selection in selections {
        println!(
            "  {} -> {}/",
            selection.source_path,
            display_folder(&selection.destination_folder)
        );
    }
}

fn print_report(report: &MoveReport) {
    for moved in &report.moved {
        println!("  {} -> {}", moved.from, moved.to);
    }
    for failure in &report.failures {
        eprintln!("✗ Failed to move {}: {}", failure.file_name, failure.message);
    }

    println!();
    println!("✓ Moved {} attachment(s)", report.success_count());
    if !report.skipped.is_empty() {
        println!("  {} already in place", report.skipped.len());
    }
    if !report.failures.is_empty() {
        println!("  {} failed", report.failures.len());
    }
}
