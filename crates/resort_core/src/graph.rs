//! Bidirectional note/attachment reference graph.
//!
//! Three insertion-ordered maps, rebuilt from scratch on every detection run:
//!
//! - note → (attachment → [`Link`])
//! - attachment → set of referencing notes
//! - note → [`CanonicalFolder`]
//!
//! The two edge maps always describe the same edge set; both are only ever
//! written by [`ReferenceGraph::insert_edge`].

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::link_cache::LinkCache;
use crate::links::{Link, normalize_links};
use crate::policy::AttachmentFolderPolicy;
use crate::resolver::LinkResolver;
use crate::vault::VaultIndex;

/// The folder a note's attachments are expected to live in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CanonicalFolder {
    /// Store path of the folder
    pub folder: String,
    /// Store path of the note it was computed for
    pub note: String,
}

impl CanonicalFolder {
    /// Create a canonical folder entry
    pub fn new(folder: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            note: note.into(),
        }
    }
}

/// Which notes reference which attachments.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    note_to_attachments: IndexMap<String, IndexMap<String, Link>>,
    attachment_to_notes: IndexMap<String, IndexSet<String>>,
    note_to_canonical_folder: IndexMap<String, CanonicalFolder>,
}

impl ReferenceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph in one go. See [`ReferenceGraph::rebuild`].
    pub fn build<C, R, P>(index: &VaultIndex, cache: &mut C, resolver: &R, policy: &P) -> Self
    where
        C: LinkCache + ?Sized,
        R: LinkResolver + ?Sized,
        P: AttachmentFolderPolicy + ?Sized,
    {
        let mut graph = Self::new();
        graph.rebuild(index, cache, resolver, policy);
        graph
    }

    /// Clear the graph and repopulate it from every note in `index`.
    ///
    /// Notes without surviving attachment links get neither edges nor a
    /// canonical folder. Unresolvable links are dropped, never fatal.
    pub fn rebuild<C, R, P>(&mut self, index: &VaultIndex, cache: &mut C, resolver: &R, policy: &P)
    where
        C: LinkCache + ?Sized,
        R: LinkResolver + ?Sized,
        P: AttachmentFolderPolicy + ?Sized,
    {
        cache.force_resolve();
        let cache: &C = cache;
        self.clear();

        for note in index.notes() {
            let Some(cached) = cache.cached_links(note) else {
                continue;
            };
            if cached.is_empty() {
                continue;
            }

            let mut links = normalize_links(note, cached, resolver).peekable();
            if links.peek().is_none() {
                continue;
            }

            match policy.folder_for(note) {
                Some(folder) => {
                    self.note_to_canonical_folder
                        .insert(note.to_string(), CanonicalFolder::new(folder, note));
                }
                None => log::debug!("No canonical folder for {}", note),
            }

            for link in links {
                self.insert_edge(note, link);
            }
        }

        log::debug!(
            "Reference graph: {} notes, {} attachments, {} edges",
            self.note_to_attachments.len(),
            self.attachment_to_notes.len(),
            self.edge_count()
        );
    }

    /// Record that `note` references `link.resolved`.
    ///
    /// The first link recorded for a (note, attachment) pair wins; later ones
    /// are ignored. Returns whether a new edge was added.
    pub fn insert_edge(&mut self, note: &str, link: Link) -> bool {
        let attachments = self
            .note_to_attachments
            .entry(note.to_string())
            .or_default();
        if attachments.contains_key(&link.resolved) {
            return false;
        }

        self.attachment_to_notes
            .entry(link.resolved.clone())
            .or_default()
            .insert(note.to_string());
        attachments.insert(link.resolved.clone(), link);
        true
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.note_to_attachments.clear();
        self.attachment_to_notes.clear();
        self.note_to_canonical_folder.clear();
    }

    /// Whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.attachment_to_notes.is_empty()
    }

    /// Number of (note, attachment) edges.
    pub fn edge_count(&self) -> usize {
        self.note_to_attachments.values().map(IndexMap::len).sum()
    }

    /// Whether `note` references `attachment`.
    pub fn references(&self, note: &str, attachment: &str) -> bool {
        self.note_to_attachments
            .get(note)
            .is_some_and(|attachments| attachments.contains_key(attachment))
    }

    /// The link through which `note` first referenced `attachment`.
    pub fn link(&self, note: &str, attachment: &str) -> Option<&Link> {
        self.note_to_attachments.get(note)?.get(attachment)
    }

    /// Attachments referenced by `note`, in first-reference order.
    pub fn attachments_of(&self, note: &str) -> impl Iterator<Item = &str> {
        self.note_to_attachments
            .get(note)
            .into_iter()
            .flat_map(|attachments| attachments.keys().map(String::as_str))
    }

    /// Notes referencing `attachment`, in scan order.
    pub fn notes_referencing(&self, attachment: &str) -> impl Iterator<Item = &str> {
        self.attachment_to_notes
            .get(attachment)
            .into_iter()
            .flat_map(|notes| notes.iter().map(String::as_str))
    }

    /// Every referenced attachment, in first-reference order.
    pub fn attachments(&self) -> impl Iterator<Item = &str> {
        self.attachment_to_notes.keys().map(String::as_str)
    }

    /// Canonical folder of `note`, if it has one.
    pub fn canonical_folder(&self, note: &str) -> Option<&CanonicalFolder> {
        self.note_to_canonical_folder.get(note)
    }

    /// Every note's canonical folder, in scan order.
    pub fn canonical_folders(&self) -> impl Iterator<Item = &CanonicalFolder> {
        self.note_to_canonical_folder.values()
    }

    /// Canonical folders of the notes referencing `attachment`. Notes without
    /// a canonical folder contribute nothing.
    pub fn candidates_for(&self, attachment: &str) -> Vec<CanonicalFolder> {
        self.notes_referencing(attachment)
            .filter_map(|note| self.canonical_folder(note))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_cache::MarkdownLinkCache;
    use crate::path_utils::file_name;

    fn index() -> VaultIndex {
        VaultIndex::from_files(
            "",
            [
                "Docs/A.md",
                "Docs/B.md",
                "Docs/C.md",
                "Docs/A/assets/img.png",
                "loose.pdf",
            ],
        )
    }

    /// Resolve by file name anywhere in the fixture vault.
    fn resolver(dest: &str, _source: &str) -> Option<String> {
        index()
            .files()
            .find(|f| file_name(f) == dest || f.strip_suffix(".md") == Some(dest))
            .map(str::to_string)
    }

    fn policy(note: &str) -> Option<String> {
        note.strip_suffix(".md").map(|stem| format!("{}/assets", stem))
    }

    fn link(resolved: &str, dest: &str) -> Link {
        Link {
            text: resolved.to_string(),
            dest: dest.to_string(),
            resolved: resolved.to_string(),
        }
    }

    #[test]
    fn test_rebuild_records_edges_both_ways() {
        let mut cache = MarkdownLinkCache::new();
        cache.insert("Docs/A.md", "[[loose.pdf]]");
        cache.insert("Docs/B.md", "![[img.png]] [[A]] [[loose.pdf]]");
        cache.insert("Docs/C.md", "no links here");

        let graph = ReferenceGraph::build(&index(), &mut cache, &resolver, &policy);

        assert_eq!(graph.attachments_of("Docs/B.md").collect::<Vec<_>>(), [
            "Docs/A/assets/img.png",
            "loose.pdf"
        ]);
        assert_eq!(graph.notes_referencing("loose.pdf").collect::<Vec<_>>(), [
            "Docs/A.md",
            "Docs/B.md"
        ]);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.references("Docs/B.md", "Docs/A/assets/img.png"));
        assert!(!graph.references("Docs/A.md", "Docs/A/assets/img.png"));
        assert!(graph.canonical_folder("Docs/C.md").is_none());
        assert_eq!(
            graph.canonical_folder("Docs/B.md"),
            Some(&CanonicalFolder::new("Docs/B/assets", "Docs/B.md"))
        );
    }

    #[test]
    fn test_first_link_wins() {
        let mut graph = ReferenceGraph::new();
        assert!(graph.insert_edge("Docs/A.md", link("loose.pdf", "[[loose.pdf|one]]")));
        assert!(!graph.insert_edge("Docs/A.md", link("loose.pdf", "![[loose.pdf]]")));

        assert_eq!(
            graph.link("Docs/A.md", "loose.pdf").map(|l| l.dest.as_str()),
            Some("[[loose.pdf|one]]")
        );
        assert_eq!(graph.notes_referencing("loose.pdf").count(), 1);
    }

    #[test]
    fn test_rebuild_clears_previous_state() {
        let mut cache = MarkdownLinkCache::new();
        cache.insert("Docs/A.md", "[[loose.pdf]]");
        let mut graph = ReferenceGraph::build(&index(), &mut cache, &resolver, &policy);
        assert!(!graph.is_empty());

        cache.insert("Docs/A.md", "nothing");
        graph.rebuild(&index(), &mut cache, &resolver, &policy);
        assert!(graph.is_empty());
        assert_eq!(graph.canonical_folders().count(), 0);
    }

    #[test]
    fn test_notes_without_policy_folder_keep_edges() {
        let mut cache = MarkdownLinkCache::new();
        cache.insert("Docs/A.md", "[[loose.pdf]]");
        let no_folder = |_: &str| -> Option<String> { None };

        let graph = ReferenceGraph::build(&index(), &mut cache, &resolver, &no_folder);

        assert!(graph.references("Docs/A.md", "loose.pdf"));
        assert!(graph.candidates_for("loose.pdf").is_empty());
    }

    #[test]
    fn test_candidates_follow_note_order() {
        let mut graph = ReferenceGraph::new();
        graph.insert_edge("Docs/C.md", link("loose.pdf", "[[loose.pdf]]"));
        graph.insert_edge("Docs/A.md", link("loose.pdf", "[[loose.pdf]]"));
        graph
            .note_to_canonical_folder
            .insert("Docs/A.md".into(), CanonicalFolder::new("Docs/A/assets", "Docs/A.md"));
        graph
            .note_to_canonical_folder
            .insert("Docs/C.md".into(), CanonicalFolder::new("Docs/C/assets", "Docs/C.md"));

        let folders: Vec<String> = graph
            .candidates_for("loose.pdf")
            .into_iter()
            .map(|c| c.folder)
            .collect();
        assert_eq!(folders, ["Docs/C/assets", "Docs/A/assets"]);
    }
}
