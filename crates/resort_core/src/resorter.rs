//! One detect-then-move cycle over a vault.

use std::path::{Path, PathBuf};

use crate::detect::{ResortPair, detect_resort_pairs};
use crate::error::Result;
use crate::fs::AsyncFileSystem;
use crate::graph::ReferenceGraph;
use crate::link_cache::MarkdownLinkCache;
use crate::mover::{AttachmentMover, MoveReport, MoveSelection};
use crate::policy::AttachmentFolderPolicy;
use crate::resolver::VaultLinkResolver;
use crate::vault::VaultIndex;

/// Detects misplaced attachments in a vault and moves them.
///
/// ```ignore
/// use resort_core::{AttachmentResorter, FolderPolicy, RealFileSystem, SyncToAsyncFs};
///
/// let fs = SyncToAsyncFs::new(RealFileSystem);
/// let mut resorter = AttachmentResorter::new(fs, "/home/user/notes", FolderPolicy::default());
/// let pairs = resorter.detect_resort_pairs().await?;
/// let selections: Vec<_> = pairs.iter().filter_map(|p| p.select(0)).collect();
/// let report = resorter.execute_moves(&selections).await;
/// println!("Moved {} attachments", report.success_count());
/// ```
pub struct AttachmentResorter<FS: AsyncFileSystem, P: AttachmentFolderPolicy> {
    fs: FS,
    root: PathBuf,
    policy: P,
    graph: ReferenceGraph,
}

impl<FS: AsyncFileSystem, P: AttachmentFolderPolicy> AttachmentResorter<FS, P> {
    /// Create a resorter for the vault at `root`.
    pub fn new(fs: FS, root: impl Into<PathBuf>, policy: P) -> Self {
        Self {
            fs,
            root: root.into(),
            policy,
            graph: ReferenceGraph::new(),
        }
    }

    /// The underlying store.
    pub fn fs(&self) -> &FS {
        &self.fs
    }

    /// The vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The canonical folder policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The graph built by the last detection run.
    pub fn graph(&self) -> &ReferenceGraph {
        &self.graph
    }

    /// Scan the vault, rebuild the reference graph and find misplaced
    /// attachments.
    ///
    /// Fails only when the vault root cannot be listed.
    pub async fn detect_resort_pairs(&mut self) -> Result<Vec<ResortPair>> {
        let index = VaultIndex::scan(&self.fs, &self.root).await?;
        let mut cache = MarkdownLinkCache::load(&self.fs, &index).await;
        let resolver = VaultLinkResolver::new(&index);

        self.graph
            .rebuild(&index, &mut cache, &resolver, &self.policy);
        Ok(detect_resort_pairs(&self.graph, &index))
    }

    /// Move the approved attachments. See [`AttachmentMover::execute_moves`].
    pub async fn execute_moves(&self, selections: &[MoveSelection]) -> MoveReport {
        AttachmentMover::new(&self.fs, &self.root)
            .execute_moves(selections)
            .await
    }
}
