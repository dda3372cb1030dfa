//! Async filesystem abstraction module.
//!
//! This module provides the `AsyncFileSystem` trait, the store interface the
//! resort core actually consumes. Host stores are usually asynchronous (folder
//! creation, renames and deletions are awaited one at a time), so every
//! operation the mover performs is a suspension point.
//!
//! ## Object safety
//!
//! `AsyncFileSystem` is object-safe so it can be used behind
//! `dyn AsyncFileSystem`. To enable this, all methods return boxed futures.

use std::future::Future;
use std::io::Result;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use super::FileSystem;

#[cfg(test)]
pub(crate) fn block_on_test<F: Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}

/// A boxed future for object-safe async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Async abstraction over the store.
///
/// Mirrors [`FileSystem`] with async methods.
///
/// # Example
///
/// ```ignore
/// use resort_core::fs::AsyncFileSystem;
///
/// async fn example(fs: &dyn AsyncFileSystem) {
///     if !fs.is_dir(Path::new("Docs/assets")).await {
///         fs.create_dir_all(Path::new("Docs/assets")).await.unwrap();
///     }
/// }
/// ```
pub trait AsyncFileSystem: Send + Sync {
    /// Reads the file content as a string.
    fn read_to_string<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<String>>;

    /// Creates or overwrites a text file.
    fn write_file<'a>(&'a self, path: &'a Path, content: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Deletes a file.
    fn delete_file<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>>;

    /// Checks if a file or folder exists.
    fn exists<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool>;

    /// Checks if a path is a folder.
    fn is_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool>;

    /// Checks if a path is a symlink.
    /// Returns false for non-existent paths or on stores without symlinks.
    fn is_symlink<'a>(&'a self, _path: &'a Path) -> BoxFuture<'a, bool> {
        Box::pin(async move { false })
    }

    /// Creates a folder and all missing ancestors.
    fn create_dir_all<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>>;

    /// Removes an empty folder. Errors if the folder has children.
    fn remove_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>>;

    /// Move/rename a file from `from` to `to`.
    ///
    /// Should error if the source does not exist or if the destination already exists.
    fn move_file<'a>(&'a self, from: &'a Path, to: &'a Path) -> BoxFuture<'a, Result<()>>;

    /// List the direct children (files and folders) of a folder.
    fn list_files<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<Vec<PathBuf>>>;

    /// Recursively list ALL files and folders below a folder.
    fn list_all_files_recursive<'a>(
        &'a self,
        dir: &'a Path,
    ) -> BoxFuture<'a, Result<Vec<PathBuf>>> {
        Box::pin(async move {
            let mut all_entries = Vec::new();

            if let Ok(entries) = self.list_files(dir).await {
                for entry in entries {
                    all_entries.push(entry.clone());
                    if self.is_dir(&entry).await
                        && !self.is_symlink(&entry).await
                        && let Ok(subdir_entries) = self.list_all_files_recursive(&entry).await
                    {
                        all_entries.extend(subdir_entries);
                    }
                }
            }

            Ok(all_entries)
        })
    }
}

// ============================================================================
// Adapter: Sync FileSystem -> AsyncFileSystem
// ============================================================================

/// Wrapper that adapts a synchronous `FileSystem` to `AsyncFileSystem`.
///
/// The operations complete immediately since the underlying implementation
/// is synchronous.
///
/// ```ignore
/// use resort_core::fs::{InMemoryFileSystem, SyncToAsyncFs, AsyncFileSystem};
///
/// let async_fs = SyncToAsyncFs::new(InMemoryFileSystem::new());
/// let exists = futures_lite::future::block_on(async_fs.exists(Path::new("Docs")));
/// ```
#[derive(Clone)]
pub struct SyncToAsyncFs<F: FileSystem> {
    inner: F,
}

impl<F: FileSystem> SyncToAsyncFs<F> {
    /// Create a new async wrapper around a synchronous filesystem.
    pub fn new(fs: F) -> Self {
        Self { inner: fs }
    }

    /// Get a reference to the inner synchronous filesystem.
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: FileSystem> AsyncFileSystem for SyncToAsyncFs<F> {
    fn read_to_string<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move { self.inner.read_to_string(path) })
    }

    fn write_file<'a>(&'a self, path: &'a Path, content: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.inner.write_file(path, content) })
    }

    fn delete_file<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.inner.delete_file(path) })
    }

    fn exists<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        Box::pin(async move { self.inner.exists(path) })
    }

    fn is_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        Box::pin(async move { self.inner.is_dir(path) })
    }

    fn is_symlink<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        Box::pin(async move { self.inner.is_symlink(path) })
    }

    fn create_dir_all<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.inner.create_dir_all(path) })
    }

    fn remove_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.inner.remove_dir(path) })
    }

    fn move_file<'a>(&'a self, from: &'a Path, to: &'a Path) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.inner.move_file(from, to) })
    }

    fn list_files<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<Vec<PathBuf>>> {
        Box::pin(async move { self.inner.list_files(dir) })
    }

    fn list_all_files_recursive<'a>(
        &'a self,
        dir: &'a Path,
    ) -> BoxFuture<'a, Result<Vec<PathBuf>>> {
        Box::pin(async move { self.inner.list_all_files_recursive(dir) })
    }
}

// Blanket implementation for references to AsyncFileSystem
impl<T: AsyncFileSystem + ?Sized> AsyncFileSystem for &T {
    fn read_to_string<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<String>> {
        (*self).read_to_string(path)
    }

    fn write_file<'a>(&'a self, path: &'a Path, content: &'a str) -> BoxFuture<'a, Result<()>> {
        (*self).write_file(path, content)
    }

    fn delete_file<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        (*self).delete_file(path)
    }

    fn exists<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        (*self).exists(path)
    }

    fn is_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        (*self).is_dir(path)
    }

    fn is_symlink<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        (*self).is_symlink(path)
    }

    fn create_dir_all<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        (*self).create_dir_all(path)
    }

    fn remove_dir<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        (*self).remove_dir(path)
    }

    fn move_file<'a>(&'a self, from: &'a Path, to: &'a Path) -> BoxFuture<'a, Result<()>> {
        (*self).move_file(from, to)
    }

    fn list_files<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<Vec<PathBuf>>> {
        (*self).list_files(dir)
    }

    fn list_all_files_recursive<'a>(
        &'a self,
        dir: &'a Path,
    ) -> BoxFuture<'a, Result<Vec<PathBuf>>> {
        (*self).list_all_files_recursive(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;

    #[test]
    fn test_sync_to_async_wrapper() {
        let sync_fs = InMemoryFileSystem::new();
        sync_fs.write_file(Path::new("Docs/A.md"), "# A").unwrap();

        let async_fs = SyncToAsyncFs::new(sync_fs);

        let content = block_on_test(async_fs.read_to_string(Path::new("Docs/A.md")));
        assert_eq!(content.unwrap(), "# A");
        assert!(block_on_test(async_fs.is_dir(Path::new("Docs"))));
        assert!(!block_on_test(async_fs.exists(Path::new("Docs/B.md"))));
    }

    #[test]
    fn test_async_move_and_remove_dir() {
        let async_fs = SyncToAsyncFs::new(InMemoryFileSystem::new());
        async_fs
            .inner()
            .write_binary(Path::new("old/img.png"), &[1, 2, 3])
            .unwrap();

        let moved =
            block_on_test(async_fs.move_file(Path::new("old/img.png"), Path::new("new/img.png")));
        assert!(moved.is_ok());
        assert!(block_on_test(async_fs.exists(Path::new("new/img.png"))));

        // The old folder is empty now and can go
        assert!(block_on_test(async_fs.remove_dir(Path::new("old"))).is_ok());
        assert!(!block_on_test(async_fs.is_dir(Path::new("old"))));
    }

    #[test]
    fn test_recursive_listing_through_reference() {
        let sync_fs = InMemoryFileSystem::new();
        sync_fs.write_file(Path::new("a/b/c.md"), "").unwrap();
        let async_fs = SyncToAsyncFs::new(sync_fs);
        let by_ref: &dyn AsyncFileSystem = &async_fs;

        let all = block_on_test(by_ref.list_all_files_recursive(Path::new(""))).unwrap();
        assert!(all.contains(&PathBuf::from("a")));
        assert!(all.contains(&PathBuf::from("a/b")));
        assert!(all.contains(&PathBuf::from("a/b/c.md")));
    }
}
