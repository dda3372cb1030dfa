#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Configuration options
pub mod config;

/// Misplaced attachment detection
pub mod detect;

/// Error (common error types)
pub mod error;

/// Filesystem abstraction
pub mod fs;

/// Reference graph between notes and attachments
pub mod graph;

/// Raw link records parsed from notes
pub mod link_cache;

/// Link normalization
pub mod links;

/// Moving attachments
pub mod mover;

/// Path utilities for vault-relative store paths
pub mod path_utils;

/// Canonical attachment folder policies
pub mod policy;

/// Detect-then-move facade
pub mod resorter;

/// Link destination resolution
pub mod resolver;

/// Selection plans
pub mod selection;

/// Vault snapshot
pub mod vault;

pub use detect::{ResortPair, detect_resort_pairs};
pub use error::{ResortError, Result, SerializableError};
pub use fs::{AsyncFileSystem, FileSystem, InMemoryFileSystem, SyncToAsyncFs};
#[cfg(not(target_arch = "wasm32"))]
pub use fs::RealFileSystem;
pub use graph::{CanonicalFolder, ReferenceGraph};
pub use mover::{AttachmentMover, MoveReport, MoveSelection, next_free_name};
pub use policy::{AttachmentFolderPolicy, AttachmentLocation, FolderPolicy};
pub use resorter::AttachmentResorter;
pub use selection::{PlanEntry, SelectionPlan};
