// ============================================================================
// InMemoryFileSystem - Available on all targets, including WASM
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error, ErrorKind, Result};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::FileSystem;

/// An in-memory vault.
///
/// Useful for hosts without a real filesystem and for testing. Paths are
/// stored normalized and vault-relative; the empty path is the vault root.
/// Listings come back in lexical order.
#[derive(Clone, Default)]
pub struct InMemoryFileSystem {
    /// Files stored as path -> bytes (notes and attachments alike)
    files: Arc<RwLock<BTreeMap<PathBuf, Vec<u8>>>>,
    /// Folders that exist (implicitly created when files are added)
    directories: Arc<RwLock<BTreeSet<PathBuf>>>,
}

impl InMemoryFileSystem {
    /// Create a new empty in-memory vault
    pub fn new() -> Self {
        Self::default()
    }

    /// Helper to normalize paths (remove . and .. components where possible)
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
                Component::ParentDir => {
                    components.pop();
                }
                c => components.push(c),
            }
        }
        components.iter().collect()
    }

    fn insert_parents(&self, path: &Path) {
        let mut dirs = self.directories.write().unwrap();
        let mut current = path;
        while let Some(parent) = current.parent() {
            if !parent.as_os_str().is_empty() {
                dirs.insert(parent.to_path_buf());
            }
            current = parent;
        }
    }

    fn is_root(path: &Path) -> bool {
        path.as_os_str().is_empty()
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read_binary(path)?;
        String::from_utf8(bytes).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_binary(path, content.as_bytes())
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        let normalized = Self::normalize_path(path);
        self.files
            .read()
            .unwrap()
            .get(&normalized)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("File not found: {:?}", path)))
    }

    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        let normalized = Self::normalize_path(path);
        if self.directories.read().unwrap().contains(&normalized) {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("A folder exists at {:?}", path),
            ));
        }

        self.insert_parents(&normalized);
        self.files
            .write()
            .unwrap()
            .insert(normalized, content.to_vec());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        let normalized = Self::normalize_path(path);
        match self.files.write().unwrap().remove(&normalized) {
            Some(_) => Ok(()),
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = Self::normalize_path(path);
        Self::is_root(&normalized)
            || self.files.read().unwrap().contains_key(&normalized)
            || self.directories.read().unwrap().contains(&normalized)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let normalized = Self::normalize_path(path);
        Self::is_root(&normalized) || self.directories.read().unwrap().contains(&normalized)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let normalized = Self::normalize_path(path);
        if Self::is_root(&normalized) {
            return Ok(());
        }
        if self.files.read().unwrap().contains_key(&normalized) {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("A file exists at {:?}", path),
            ));
        }

        self.insert_parents(&normalized);
        self.directories.write().unwrap().insert(normalized);
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        let normalized = Self::normalize_path(path);
        if Self::is_root(&normalized) || !self.is_dir(&normalized) {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Folder not found: {:?}", path),
            ));
        }
        if !self.list_files(&normalized)?.is_empty() {
            return Err(Error::new(
                ErrorKind::DirectoryNotEmpty,
                format!("Folder not empty: {:?}", path),
            ));
        }

        self.directories.write().unwrap().remove(&normalized);
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        let from_norm = Self::normalize_path(from);
        let to_norm = Self::normalize_path(to);

        if from_norm == to_norm {
            return Ok(());
        }

        // Validate existence and destination availability up-front.
        if !self.files.read().unwrap().contains_key(&from_norm) {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Source file not found: {:?}", from),
            ));
        }
        if self.exists(&to_norm) {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("Destination already exists: {:?}", to),
            ));
        }

        // Ensure destination parent folders exist.
        self.insert_parents(&to_norm);

        let mut files = self.files.write().unwrap();
        let content = files.remove(&from_norm).ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("Source file not found: {:?}", from),
            )
        })?;
        files.insert(to_norm, content);

        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let normalized = Self::normalize_path(dir);
        if !self.is_dir(&normalized) {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Folder not found: {:?}", dir),
            ));
        }

        let is_child = |path: &&PathBuf| path.parent() == Some(normalized.as_path());
        let mut result: Vec<PathBuf> = self
            .directories
            .read()
            .unwrap()
            .iter()
            .filter(is_child)
            .cloned()
            .collect();
        result.extend(self.files.read().unwrap().keys().filter(is_child).cloned());
        result.sort();
        Ok(result)
    }
}
