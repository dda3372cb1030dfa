//! Link destination resolution.
//!
//! Obsidian-style: a destination is tried as a path relative to the linking
//! note, then as a vault-absolute path, and finally as a bare file name
//! matched anywhere in the vault (shortest path wins).

use std::collections::HashMap;

use crate::path_utils::{file_name, join_store_path, normalize_store_path, parent_folder, split_extension};
use crate::vault::VaultIndex;

/// Resolves a cleaned link destination written in `source` to the store path
/// of the file it points at.
pub trait LinkResolver {
    /// `None` when nothing in the vault matches.
    fn resolve(&self, dest: &str, source: &str) -> Option<String>;
}

impl<F> LinkResolver for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn resolve(&self, dest: &str, source: &str) -> Option<String> {
        self(dest, source)
    }
}

/// [`LinkResolver`] over a [`VaultIndex`] snapshot.
#[derive(Debug, Clone, Default)]
pub struct VaultLinkResolver {
    files: Vec<String>,
    /// lowercase file name -> indices into `files`
    by_name: HashMap<String, Vec<usize>>,
}

impl VaultLinkResolver {
    /// Index every file of the vault by name.
    pub fn new(index: &VaultIndex) -> Self {
        let files: Vec<String> = index.files().map(str::to_string).collect();
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, file) in files.iter().enumerate() {
            by_name
                .entry(file_name(file).to_lowercase())
                .or_default()
                .push(i);
        }
        Self { files, by_name }
    }

    fn contains(&self, path: &str) -> bool {
        self.by_name
            .get(&file_name(path).to_lowercase())
            .is_some_and(|hits| hits.iter().any(|&i| self.files[i] == path))
    }

    /// `path` itself, or `path.md`, if either exists.
    fn exact(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        if self.contains(path) {
            return Some(path.to_string());
        }
        let with_md = format!("{}.md", path);
        self.contains(&with_md).then_some(with_md)
    }

    fn by_basename(&self, dest: &str, source_folder: &str) -> Option<String> {
        let name = file_name(dest);
        let key = match split_extension(name).1 {
            Some(_) => name.to_lowercase(),
            None => format!("{}.md", name.to_lowercase()),
        };
        let suffix = dest.contains('/').then(|| {
            let mut s = dest.to_lowercase();
            if split_extension(name).1.is_none() {
                s.push_str(".md");
            }
            s
        });

        self.by_name
            .get(&key)?
            .iter()
            .map(|&i| self.files[i].as_str())
            .filter(|candidate| match &suffix {
                Some(suffix) => {
                    let lower = candidate.to_lowercase();
                    lower == *suffix || lower.ends_with(&format!("/{}", suffix))
                }
                None => true,
            })
            .min_by(|a, b| {
                let a_local = parent_folder(a) == source_folder;
                let b_local = parent_folder(b) == source_folder;
                b_local
                    .cmp(&a_local)
                    .then(a.len().cmp(&b.len()))
                    .then(a.cmp(b))
            })
            .map(str::to_string)
    }
}

impl LinkResolver for VaultLinkResolver {
    fn resolve(&self, dest: &str, source: &str) -> Option<String> {
        let dest = dest.trim();
        if dest.is_empty() {
            return None;
        }
        let source_folder = parent_folder(source);

        if let Some(absolute) = dest.strip_prefix('/') {
            return self.exact(&normalize_store_path(absolute));
        }

        let relative = normalize_store_path(&join_store_path(source_folder, dest));
        self.exact(&relative)
            .or_else(|| self.exact(&normalize_store_path(dest)))
            .or_else(|| self.by_basename(dest, source_folder))
    }
}
