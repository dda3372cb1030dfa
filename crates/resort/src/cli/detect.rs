//! `detect` and `plan` command handlers

use std::path::Path;

use resort_core::SelectionPlan;

use crate::cli::util::print_pair;
use crate::cli::{CliResorter, block_on};

/// Print every misplaced attachment. Returns false on error.
pub fn handle_detect(resorter: &mut CliResorter, json: bool) -> bool {
    let pairs = match block_on(resorter.detect_resort_pairs()) {
        Ok(pairs) => pairs,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    if json {
        return match serde_json::to_string_pretty(&pairs) {
            Ok(out) => {
                println!("{}", out);
                true
            }
            Err(e) => {
                eprintln!("✗ {}", e);
                false
            }
        };
    }

    if pairs.is_empty() {
        println!("✓ All attachments are where their notes expect them.");
        return true;
    }

    println!("{} misplaced attachment(s):", pairs.len());
    println!();
    for (i, pair) in pairs.iter().enumerate() {
        print_pair(i, pairs.len(), pair);
    }
    true
}

/// Detect and write a plan file choosing every first candidate.
pub fn handle_plan(resorter: &mut CliResorter, output: &Path) -> bool {
    let pairs = match block_on(resorter.detect_resort_pairs()) {
        Ok(pairs) => pairs,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    let plan = SelectionPlan::from_pairs(pairs);
    match block_on(plan.save_to(resorter.fs(), output)) {
        Ok(()) => {
            println!(
                "✓ Wrote plan with {} pair(s) to {}",
                plan.len(),
                output.display()
            );
            println!("  Edit `choice` (candidate index, or null to skip), then run:");
            println!("  resort apply --plan {}", output.display());
            true
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}
