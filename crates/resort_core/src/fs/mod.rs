//! Filesystem abstraction module.
//!
//! This module provides the `FileSystem` trait for abstracting the store that
//! notes and attachments live in, allowing a real directory tree, an in-memory
//! vault for tests and embedders, or any host store behind the same API.
//!
//! The resort core itself is async-first and only talks to [`AsyncFileSystem`].
//! Synchronous stores are lifted with [`SyncToAsyncFs`].
//!
//! ```ignore
//! use resort_core::fs::{InMemoryFileSystem, SyncToAsyncFs};
//!
//! let vault = InMemoryFileSystem::new();
//! vault.write_file(Path::new("Docs/A.md"), "![[img.png]]")?;
//! let fs = SyncToAsyncFs::new(vault);
//! ```

mod async_fs;
mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod native;

pub use async_fs::{AsyncFileSystem, BoxFuture, SyncToAsyncFs};

#[cfg(test)]
pub(crate) use async_fs::block_on_test;
pub use memory::InMemoryFileSystem;
#[cfg(not(target_arch = "wasm32"))]
pub use native::RealFileSystem;

use std::io::Result;
use std::path::{Path, PathBuf};

/// Abstraction over the operations the resort flow needs from a store.
///
/// Send + Sync required for multi-threaded hosts.
pub trait FileSystem: Send + Sync {
    /// Reads the file content as UTF-8 text (for parsing notes)
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Creates or overwrites a text file, creating parent folders as needed
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Read binary file content
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        self.read_to_string(path).map(|s| s.into_bytes())
    }

    /// Creates or overwrites a binary file, creating parent folders as needed
    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Deletes a file
    fn delete_file(&self, path: &Path) -> Result<()>;

    /// Checks if a file or folder exists
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path is a folder
    fn is_dir(&self, path: &Path) -> bool;

    /// Checks if a path is a symlink. Stores without symlinks keep the default.
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    /// Creates a folder and all missing ancestors
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Removes an empty folder.
    ///
    /// Must error if the folder still has children.
    fn remove_dir(&self, path: &Path) -> Result<()>;

    /// Move/rename a file from `from` to `to`.
    ///
    /// Implementations should treat this as an atomic-ish move when possible,
    /// and should error if the source does not exist or if the destination already exists.
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// List the direct children (files and folders) of a folder
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Recursively list ALL files and folders below a folder
    fn list_all_files_recursive(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut all_entries = Vec::new();

        if let Ok(entries) = self.list_files(dir) {
            for entry in entries {
                all_entries.push(entry.clone());
                // Symlinked folders are listed but not entered, so links
                // back to an ancestor cannot loop
                if self.is_dir(&entry)
                    && !self.is_symlink(&entry)
                    && let Ok(subdir_entries) = self.list_all_files_recursive(&entry)
                {
                    all_entries.extend(subdir_entries);
                }
            }
        }

        Ok(all_entries)
    }
}

// Blanket implementation for references to FileSystem
impl<T: FileSystem> FileSystem for &T {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (*self).read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        (*self).write_file(path, content)
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        (*self).read_binary(path)
    }

    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        (*self).write_binary(path, content)
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        (*self).delete_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (*self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (*self).is_dir(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        (*self).is_symlink(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (*self).create_dir_all(path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        (*self).remove_dir(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        (*self).move_file(from, to)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (*self).list_files(dir)
    }
}
