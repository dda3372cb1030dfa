//! From detected pairs to approved moves.
//!
//! A [`SelectionPlan`] holds one entry per [`ResortPair`] along with the
//! user's choice of candidate folder, or `None` when the pair was removed.
//! Plans serialize to JSON so detection and execution can be split across
//! invocations (`resort plan` then `resort apply --plan`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detect::ResortPair;
use crate::error::{ResortError, Result};
use crate::fs::AsyncFileSystem;
use crate::mover::MoveSelection;

impl ResortPair {
    /// The move to the `choice`-th candidate folder, if there is one.
    pub fn select(&self, choice: usize) -> Option<MoveSelection> {
        let candidate = self.candidates.get(choice)?;
        Some(MoveSelection {
            source_path: self.current_path.clone(),
            destination_folder: candidate.folder.clone(),
            source_file_name: self.attachment.clone(),
        })
    }
}

/// A pair and the candidate chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// The detected pair
    pub pair: ResortPair,
    /// Index into `pair.candidates`; `None` when the pair was removed
    pub choice: Option<usize>,
}

/// Every detected pair with the user's decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPlan {
    /// One entry per pair, in detection order
    pub entries: Vec<PlanEntry>,
}

impl SelectionPlan {
    /// Plan that moves every pair to its first candidate.
    pub fn from_pairs(pairs: Vec<ResortPair>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|pair| PlanEntry { pair, choice: Some(0) })
            .collect();
        Self { entries }
    }

    /// Number of entries, removed ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entry `index` from the batch. Returns false if there is no such entry.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.choice = None;
                true
            }
            None => false,
        }
    }

    /// Choose candidate `candidate` for entry `index`. Returns false, leaving
    /// the plan untouched, if either index is out of range.
    pub fn choose(&mut self, index: usize, candidate: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if candidate < entry.pair.candidates.len() => {
                entry.choice = Some(candidate);
                true
            }
            _ => false,
        }
    }

    /// Number of entries that will produce a move.
    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.choice.is_some()).count()
    }

    /// The moves this plan approves, in entry order.
    ///
    /// Entries whose choice does not name an existing candidate (e.g. an
    /// edited plan file) are dropped with a warning.
    pub fn into_selections(self) -> Vec<MoveSelection> {
        self.entries
            .into_iter()
            .filter_map(|entry| {
                let choice = entry.choice?;
                let selection = entry.pair.select(choice);
                if selection.is_none() {
                    log::warn!(
                        "Ignoring {}: candidate {} does not exist",
                        entry.pair.current_path,
                        choice
                    );
                }
                selection
            })
            .collect()
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a plan from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a plan file.
    pub async fn load_from<FS: AsyncFileSystem + ?Sized>(fs: &FS, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .await
            .map_err(|e| ResortError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::from_json(&contents)
    }

    /// Write a plan file.
    pub async fn save_to<FS: AsyncFileSystem + ?Sized>(&self, fs: &FS, path: &Path) -> Result<()> {
        let contents = self.to_json()?;
        fs.write_file(path, &contents)
            .await
            .map_err(|e| ResortError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })
    }
}
