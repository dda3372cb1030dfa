//! Misplaced attachment detection.
//!
//! Two passes over a [`ReferenceGraph`]:
//!
//! 1. **Folder contents.** For each note with a canonical folder that exists,
//!    every non-note file directly inside that folder which the note does
//!    *not* reference, but other notes do, is a candidate for moving to those
//!    notes' canonical folders.
//! 2. **Global mismatch.** Every other referenced attachment whose current
//!    folder is none of its referencing notes' canonical folders.
//!
//! An attachment is reported at most once, and never when it already sits in
//! one of its candidate folders. Attachments without any candidate (orphans)
//! are never reported.
//!
//! Output order follows the graph's insertion order and the vault listing; it
//! is deterministic but not sorted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::graph::{CanonicalFolder, ReferenceGraph};
use crate::path_utils::{file_name, parent_folder};
use crate::vault::{VaultIndex, is_note_path};

/// A misplaced attachment and the folders it could be moved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResortPair {
    /// File name of the attachment
    pub attachment: String,
    /// Store path of the folder it currently sits in
    pub current_folder: String,
    /// Store path of the attachment
    pub current_path: String,
    /// Canonical folders of the notes referencing it, in note order
    pub candidates: Vec<CanonicalFolder>,
}

impl ResortPair {
    /// Create a pair for the attachment at `path`.
    pub fn new(path: &str, candidates: Vec<CanonicalFolder>) -> Self {
        Self {
            attachment: file_name(path).to_string(),
            current_folder: parent_folder(path).to_string(),
            current_path: path.to_string(),
            candidates,
        }
    }

    /// Whether the attachment already sits in one of its candidate folders.
    pub fn is_in_place(&self) -> bool {
        self.candidates
            .iter()
            .any(|candidate| candidate.folder == self.current_folder)
    }
}

/// Find every misplaced attachment.
pub fn detect_resort_pairs(graph: &ReferenceGraph, index: &VaultIndex) -> Vec<ResortPair> {
    let mut processed: HashSet<&str> = HashSet::new();
    let mut pairs = Vec::new();

    // Pass 1: what is sitting in each note's folder without being its own
    for canonical in graph.canonical_folders() {
        if !index.is_folder(&canonical.folder) {
            log::debug!(
                "Canonical folder {:?} of {} does not exist",
                canonical.folder,
                canonical.note
            );
            continue;
        }

        for file in index.files_in_folder(&canonical.folder) {
            let file = file.as_str();
            if processed.contains(file)
                || is_note_path(file)
                || graph.references(&canonical.note, file)
            {
                continue;
            }

            let candidates = graph.candidates_for(file);
            if candidates.is_empty() {
                continue;
            }

            processed.insert(file);
            let pair = ResortPair::new(file, candidates);
            if !pair.is_in_place() {
                pairs.push(pair);
            }
        }
    }

    let folder_pass = pairs.len();

    // Pass 2: everything else that is referenced but not where its notes expect
    for attachment in graph.attachments() {
        if processed.contains(attachment) {
            continue;
        }

        let candidates = graph.candidates_for(attachment);
        if candidates.is_empty() {
            continue;
        }

        let pair = ResortPair::new(attachment, candidates);
        if !pair.is_in_place() {
            pairs.push(pair);
        }
    }

    log::debug!(
        "Detected {} misplaced attachments ({} from canonical folders)",
        pairs.len(),
        folder_pass
    );

    pairs
}
