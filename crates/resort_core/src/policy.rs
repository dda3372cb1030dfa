//! Canonical attachment folders.
//!
//! Where a note's attachments are expected to live is configuration, not
//! something detection computes. [`AttachmentFolderPolicy`] is the seam;
//! [`FolderPolicy`] is the configurable implementation stored in the
//! [`Config`](crate::config::Config).
//!
//! ```
//! use resort_core::policy::{AttachmentFolderPolicy, AttachmentLocation, FolderPolicy};
//!
//! let policy = FolderPolicy {
//!     location: AttachmentLocation::SameFolder,
//!     folder_name: "${notename}/assets".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(policy.folder_for("Docs/A.md").as_deref(), Some("Docs/A/assets"));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::path_utils::{file_name, join_store_path, normalize_store_path, parent_folder, split_extension};

/// Computes the canonical attachment folder of a note.
pub trait AttachmentFolderPolicy {
    /// Store path of the folder `note`'s attachments belong in, or `None`
    /// when the note has no canonical folder.
    fn folder_for(&self, note: &str) -> Option<String>;
}

impl<F> AttachmentFolderPolicy for F
where
    F: Fn(&str) -> Option<String>,
{
    fn folder_for(&self, note: &str) -> Option<String> {
        self(note)
    }
}

/// Base location of attachment folders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AttachmentLocation {
    /// A subfolder next to the note
    #[default]
    SameFolder,
    /// A subfolder of one vault-wide folder
    VaultFolder,
    /// The note's own folder
    NoteFolder,
}

/// Configurable canonical folder policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct FolderPolicy {
    /// Where attachment folders are rooted
    pub location: AttachmentLocation,

    /// Folder name template. `${notename}` expands to the note's file name
    /// without extension, `${notefolder}` to the name of the folder holding
    /// the note.
    pub folder_name: String,

    /// Vault-relative root for [`AttachmentLocation::VaultFolder`]
    pub vault_folder: String,
}

impl Default for FolderPolicy {
    fn default() -> Self {
        Self {
            location: AttachmentLocation::SameFolder,
            folder_name: "${notename} (attachments)".to_string(),
            vault_folder: "attachments".to_string(),
        }
    }
}

impl FolderPolicy {
    /// Expand `${notename}` and `${notefolder}` for `note`.
    pub fn expand_name(&self, note: &str) -> String {
        let note_name = split_extension(file_name(note)).0;
        let note_folder = file_name(parent_folder(note));
        self.folder_name
            .replace("${notename}", note_name)
            .replace("${notefolder}", note_folder)
    }
}

impl AttachmentFolderPolicy for FolderPolicy {
    fn folder_for(&self, note: &str) -> Option<String> {
        let note = normalize_store_path(note);
        if note.is_empty() {
            return None;
        }

        let folder = match self.location {
            AttachmentLocation::SameFolder => {
                join_store_path(parent_folder(&note), &self.expand_name(&note))
            }
            AttachmentLocation::VaultFolder => {
                join_store_path(&self.vault_folder, &self.expand_name(&note))
            }
            AttachmentLocation::NoteFolder => parent_folder(&note).to_string(),
        };
        Some(normalize_store_path(&folder))
    }
}
