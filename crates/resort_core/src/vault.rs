//! Point-in-time listing of a vault.
//!
//! [`VaultIndex`] is the `listFiles` / `getByPath` view of the store that
//! detection runs against. It is built once per detection run from an
//! [`AsyncFileSystem`], so both detection passes see one consistent snapshot.
//!
//! Entries whose path contains a dot-prefixed component (`.obsidian/`, `.git/`,
//! `.trash/`) are not part of the vault and are skipped.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

use crate::error::{ResortError, Result};
use crate::fs::AsyncFileSystem;
use crate::path_utils::{extension_lowercase, normalize_store_path, parent_folder, store_path_from};

/// File extensions (lowercase) of document-type files.
pub const NOTE_EXTENSIONS: [&str; 2] = ["md", "canvas"];

/// Whether the file at `path` is a note rather than an attachment.
pub fn is_note_path(path: &str) -> bool {
    extension_lowercase(path).is_some_and(|ext| NOTE_EXTENSIONS.contains(&ext.as_str()))
}

/// Snapshot of every file and folder in a vault, keyed by store path.
#[derive(Debug, Clone, Default)]
pub struct VaultIndex {
    root: PathBuf,
    files: IndexSet<String>,
    folders: IndexSet<String>,
    /// folder -> files directly inside it, in listing order
    children: IndexMap<String, Vec<String>>,
}

impl VaultIndex {
    /// List everything below `root` through the store.
    pub async fn scan<FS: AsyncFileSystem>(fs: &FS, root: &Path) -> Result<Self> {
        if !fs.is_dir(root).await {
            return Err(ResortError::VaultNotFound(root.to_path_buf()));
        }

        let entries = fs.list_all_files_recursive(root).await?;
        let mut files = Vec::new();
        let mut folders = Vec::new();

        for entry in entries {
            let relative = pathdiff::diff_paths(&entry, root).unwrap_or_else(|| entry.clone());
            let store_path = store_path_from(&relative);
            if store_path.is_empty() || is_hidden(&store_path) {
                continue;
            }

            if fs.is_dir(&entry).await {
                if fs.is_symlink(&entry).await {
                    log::debug!("Skipping symlinked folder {}", store_path);
                    continue;
                }
                folders.push(store_path);
            } else {
                files.push(store_path);
            }
        }

        log::debug!(
            "Scanned vault {:?}: {} files, {} folders",
            root,
            files.len(),
            folders.len()
        );

        Ok(Self::build(root.to_path_buf(), files, folders))
    }

    /// Build an index from store paths of files. Folders are implied by the
    /// files' ancestors.
    pub fn from_files<I, S>(root: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let files: Vec<String> = files
            .into_iter()
            .map(|f| normalize_store_path(f.as_ref()))
            .filter(|f| !f.is_empty())
            .collect();
        Self::build(root.into(), files, Vec::new())
    }

    fn build(root: PathBuf, mut files: Vec<String>, mut folders: Vec<String>) -> Self {
        // Ancestors of every file are folders even if the listing omitted them
        for file in &files {
            let mut folder = parent_folder(file);
            while !folder.is_empty() {
                folders.push(folder.to_string());
                folder = parent_folder(folder);
            }
        }

        files.sort();
        files.dedup();
        folders.sort();
        folders.dedup();

        let mut children: IndexMap<String, Vec<String>> = IndexMap::new();
        for file in &files {
            children
                .entry(parent_folder(file).to_string())
                .or_default()
                .push(file.clone());
        }

        Self {
            root,
            files: files.into_iter().collect(),
            folders: folders.into_iter().collect(),
            children,
        }
    }

    /// The vault root on the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store path -> path on the store.
    pub fn absolute(&self, store_path: &str) -> PathBuf {
        if store_path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(store_path)
        }
    }

    /// All files, in lexical order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// All notes, in lexical order.
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.files().filter(|f| is_note_path(f))
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the vault has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether `path` resolves to an existing folder. The root always does.
    pub fn is_folder(&self, path: &str) -> bool {
        path.is_empty() || self.folders.contains(path)
    }

    /// Files directly inside `folder`, in listing order.
    pub fn files_in_folder(&self, folder: &str) -> &[String] {
        self.children
            .get(folder)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn is_hidden(store_path: &str) -> bool {
    store_path.split('/').any(|part| part.starts_with('.'))
}
