//! Executing approved moves.
//!
//! [`AttachmentMover::execute_moves`] relocates each selected attachment into
//! its destination folder, one after another. A file never gets renamed
//! unless the destination already holds a different file with the same
//! name, in which case the smallest free ` (n)` suffix is used. Source
//! folders left empty by a move are removed on a best-effort basis.
//!
//! Failures are per item: the batch always runs to completion and the
//! [`MoveReport`] says what happened to each selection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ResortError, Result};
use crate::fs::AsyncFileSystem;
use crate::path_utils::{file_name, join_store_path, normalize_store_path, parent_folder, split_extension};

/// One approved move: put the file at `source_path` into `destination_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveSelection {
    /// Store path of the attachment
    pub source_path: String,
    /// Store path of the folder to move it into
    pub destination_folder: String,
    /// File name of the attachment
    pub source_file_name: String,
}

impl MoveSelection {
    /// Select the file at `source_path` for moving into `destination_folder`.
    pub fn new(source_path: impl Into<String>, destination_folder: impl Into<String>) -> Self {
        let source_path = source_path.into();
        let source_file_name = file_name(&source_path).to_string();
        Self {
            source_path,
            destination_folder: destination_folder.into(),
            source_file_name,
        }
    }

    /// Where the file lands when nothing collides.
    pub fn destination_path(&self) -> String {
        join_store_path(
            &normalize_store_path(&self.destination_folder),
            &self.source_file_name,
        )
    }
}

/// A successful move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MovedAttachment {
    /// Store path before the move
    pub from: String,
    /// Store path after the move
    pub to: String,
}

/// A selection that could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveFailure {
    /// Store path of the attachment
    pub source_path: String,
    /// File name of the attachment
    pub file_name: String,
    /// What went wrong
    pub message: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveReport {
    /// Moves that happened, in selection order
    pub moved: Vec<MovedAttachment>,
    /// Sources whose destination was their current location
    pub skipped: Vec<String>,
    /// Selections that failed
    pub failures: Vec<MoveFailure>,
}

impl MoveReport {
    /// Number of files actually moved.
    pub fn success_count(&self) -> usize {
        self.moved.len()
    }

    /// Whether every attempted move succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pick a name for `desired` that is not taken in `listing`.
///
/// Returns `desired` unchanged when it is free, otherwise the smallest
/// positive `n` giving `"{stem} ({n}).{ext}"`.
///
/// # Example
/// ```
/// use resort_core::mover::next_free_name;
///
/// assert_eq!(next_free_name(&["img.png"], "img.png"), "img (1).png");
/// assert_eq!(next_free_name(&["img.png", "img (1).png"], "img.png"), "img (2).png");
/// assert_eq!(next_free_name(&["README"], "README"), "README (1)");
/// assert_eq!(next_free_name::<&str>(&[], "img.png"), "img.png");
/// ```
pub fn next_free_name<S: AsRef<str>>(listing: &[S], desired: &str) -> String {
    let taken = |name: &str| listing.iter().any(|entry| entry.as_ref() == name);
    if !taken(desired) {
        return desired.to_string();
    }

    let (stem, ext) = split_extension(desired);
    (1..)
        .map(|n| match ext {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        })
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| desired.to_string())
}

/// Runs move batches against a vault.
pub struct AttachmentMover<'a, FS: AsyncFileSystem + ?Sized> {
    fs: &'a FS,
    root: &'a Path,
}

enum Outcome {
    Moved(String),
    Skipped,
}

impl<'a, FS: AsyncFileSystem + ?Sized> AttachmentMover<'a, FS> {
    /// Create a mover for the vault at `root`.
    pub fn new(fs: &'a FS, root: &'a Path) -> Self {
        Self { fs, root }
    }

    fn absolute(&self, store_path: &str) -> PathBuf {
        if store_path.is_empty() {
            self.root.to_path_buf()
        } else {
            self.root.join(store_path)
        }
    }

    /// Execute `selections` in order.
    ///
    /// Never fails as a whole: each selection is attempted, and failures are
    /// logged and collected in the report.
    pub async fn execute_moves(&self, selections: &[MoveSelection]) -> MoveReport {
        let mut report = MoveReport::default();

        for selection in selections {
            let source = normalize_store_path(&selection.source_path);
            match self.move_one(&source, selection).await {
                Ok(Outcome::Moved(to)) => {
                    log::info!("Moved {} -> {}", source, to);
                    report.moved.push(MovedAttachment {
                        from: source.clone(),
                        to,
                    });
                    self.remove_if_empty(parent_folder(&source)).await;
                }
                Ok(Outcome::Skipped) => {
                    log::debug!("{} is already in {}", source, selection.destination_folder);
                    report.skipped.push(source);
                }
                Err(e) => {
                    log::error!("Failed to move {}: {}", selection.source_file_name, e);
                    report.failures.push(MoveFailure {
                        source_path: source,
                        file_name: selection.source_file_name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report
    }

    async fn move_one(&self, source: &str, selection: &MoveSelection) -> Result<Outcome> {
        let folder = normalize_store_path(&selection.destination_folder);
        let mut destination = join_store_path(&folder, &selection.source_file_name);
        if destination == source {
            return Ok(Outcome::Skipped);
        }

        let source_abs = self.absolute(source);
        if !self.fs.exists(&source_abs).await {
            return Err(ResortError::SourceMissing(source_abs));
        }

        let folder_abs = self.absolute(&folder);
        if self.fs.exists(&self.absolute(&destination)).await {
            let mut taken = self.folder_listing(&folder_abs).await?;
            // The store can match names the listing does not (case-insensitive
            // stores), so a name is only free once the store agrees
            loop {
                let name = next_free_name(&taken, &selection.source_file_name);
                destination = join_store_path(&folder, &name);
                if !self.fs.exists(&self.absolute(&destination)).await {
                    break;
                }
                taken.push(name);
            }
        }

        let destination_abs = self.absolute(&destination);

        self.fs
            .create_dir_all(&folder_abs)
            .await
            .map_err(|e| ResortError::FolderCreate {
                path: folder_abs.clone(),
                source: e,
            })?;

        self.fs
            .move_file(&source_abs, &destination_abs)
            .await
            .map_err(|e| match e.kind() {
                // Taken between the check above and the move
                ErrorKind::AlreadyExists => ResortError::DestinationOccupied(destination_abs.clone()),
                _ => ResortError::Move {
                    from: source_abs.clone(),
                    to: destination_abs.clone(),
                    source: e,
                },
            })?;

        Ok(Outcome::Moved(destination))
    }

    /// File names directly inside `folder_abs`.
    async fn folder_listing(&self, folder_abs: &Path) -> Result<Vec<String>> {
        let entries = self
            .fs
            .list_files(folder_abs)
            .await
            .map_err(|e| ResortError::FolderList {
                path: folder_abs.to_path_buf(),
                source: e,
            })?;

        Ok(entries
            .iter()
            .filter_map(|entry| entry.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    /// Best-effort removal of a folder emptied by a move. The vault root is
    /// never removed.
    async fn remove_if_empty(&self, folder: &str) {
        if folder.is_empty() {
            return;
        }

        let folder_abs = self.absolute(folder);
        match self.fs.list_files(&folder_abs).await {
            Ok(entries) if entries.is_empty() => {
                if let Err(e) = self.fs.remove_dir(&folder_abs).await {
                    log::debug!("Could not remove empty folder {}: {}", folder, e);
                } else {
                    log::debug!("Removed empty folder {}", folder);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileSystem, InMemoryFileSystem, SyncToAsyncFs, block_on_test};
    use std::io::{Error, ErrorKind};

    fn vault(files: &[(&str, &[u8])]) -> SyncToAsyncFs<InMemoryFileSystem> {
        let fs = InMemoryFileSystem::new();
        for (path, content) in files {
            fs.write_binary(Path::new(path), content).unwrap();
        }
        SyncToAsyncFs::new(fs)
    }

    fn run(fs: &SyncToAsyncFs<InMemoryFileSystem>, selections: &[MoveSelection]) -> MoveReport {
        block_on_test(AttachmentMover::new(fs, Path::new("")).execute_moves(selections))
    }

    #[test]
    fn test_next_free_name_skips_taken_suffixes() {
        let listing = ["x.png", "x (1).png", "x (3).png"];
        assert_eq!(next_free_name(&listing, "x.png"), "x (2).png");
        assert_eq!(next_free_name(&listing, "y.png"), "y.png");
        assert_eq!(next_free_name(&[".env"], ".env"), ".env (1)");
        assert_eq!(
            next_free_name(&["archive.tar.gz"], "archive.tar.gz"),
            "archive.tar (1).gz"
        );
    }

    #[test]
    fn test_move_into_new_folder_and_cleanup() {
        let fs = vault(&[("Docs/A/assets/img.png", &[1])]);

        let report = run(&fs, &[MoveSelection::new("Docs/A/assets/img.png", "Docs/B/assets")]);

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.moved[0].to, "Docs/B/assets/img.png");
        let inner = fs.inner();
        assert_eq!(inner.read_binary(Path::new("Docs/B/assets/img.png")).unwrap(), vec![1]);
        assert!(!inner.exists(Path::new("Docs/A/assets/img.png")));
        assert!(!inner.is_dir(Path::new("Docs/A/assets")));
        // Only the immediate source folder is cleaned up
        assert!(inner.is_dir(Path::new("Docs/A")));
    }

    #[test]
    fn test_collision_gets_suffix() {
        let fs = vault(&[
            ("Docs/A/assets/img.png", &[1]),
            ("Docs/B/assets/img.png", &[2]),
        ]);

        let report = run(&fs, &[MoveSelection::new("Docs/A/assets/img.png", "Docs/B/assets")]);

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.moved[0].to, "Docs/B/assets/img (1).png");
        let inner = fs.inner();
        assert_eq!(inner.read_binary(Path::new("Docs/B/assets/img.png")).unwrap(), vec![2]);
        assert_eq!(
            inner.read_binary(Path::new("Docs/B/assets/img (1).png")).unwrap(),
            vec![1]
        );
    }

    #[test]
    fn test_same_location_is_skipped() {
        let fs = vault(&[("Docs/B/assets/img.png", &[1])]);

        let report = run(&fs, &[MoveSelection::new("Docs/B/assets/img.png", "Docs/B/assets/")]);

        assert_eq!(report.success_count(), 0);
        assert_eq!(report.skipped, ["Docs/B/assets/img.png"]);
        assert!(report.is_success());
        assert!(fs.inner().exists(Path::new("Docs/B/assets/img.png")));
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let fs = vault(&[("a/one.png", &[1]), ("c/three.png", &[3])]);
        // A file where the destination folder should be
        fs.inner().write_file(Path::new("blocked"), "").unwrap();

        let report = run(
            &fs,
            &[
                MoveSelection::new("a/one.png", "dest"),
                MoveSelection::new("c/two.png", "dest"),
                MoveSelection::new("c/three.png", "blocked"),
                MoveSelection::new("c/three.png", "dest"),
            ],
        );

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].file_name, "two.png");
        assert!(report.failures[0].message.contains("no longer exists"));
        assert_eq!(report.failures[1].source_path, "c/three.png");
        assert!(fs.inner().exists(Path::new("dest/three.png")));
        assert!(!fs.inner().is_dir(Path::new("c")));
    }

    #[test]
    fn test_root_is_never_removed() {
        let fs = vault(&[("img.png", &[1])]);

        let report = run(&fs, &[MoveSelection::new("img.png", "Docs/assets")]);

        assert_eq!(report.success_count(), 1);
        assert!(fs.inner().is_dir(Path::new("")));
    }

    /// In-memory store with the quirks of some real ones.
    #[derive(Default)]
    struct QuirkyFs {
        inner: InMemoryFileSystem,
        /// `exists` ignores the case of the file name
        case_insensitive: bool,
        /// Every move fails with this kind
        move_error: Option<ErrorKind>,
    }

    impl FileSystem for QuirkyFs {
        fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
            self.inner.read_to_string(path)
        }
        fn write_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
            self.inner.write_file(path, content)
        }
        fn write_binary(&self, path: &Path, content: &[u8]) -> std::io::Result<()> {
            self.inner.write_binary(path, content)
        }
        fn delete_file(&self, path: &Path) -> std::io::Result<()> {
            self.inner.delete_file(path)
        }
        fn exists(&self, path: &Path) -> bool {
            if !self.case_insensitive {
                return self.inner.exists(path);
            }
            let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
                return self.inner.exists(path);
            };
            let name = name.to_string_lossy();
            self.inner.list_files(parent).is_ok_and(|entries| {
                entries.iter().any(|entry| {
                    entry
                        .file_name()
                        .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(&name))
                })
            })
        }
        fn is_dir(&self, path: &Path) -> bool {
            self.inner.is_dir(path)
        }
        fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
            self.inner.create_dir_all(path)
        }
        fn remove_dir(&self, path: &Path) -> std::io::Result<()> {
            self.inner.remove_dir(path)
        }
        fn move_file(&self, from: &Path, to: &Path) -> std::io::Result<()> {
            match self.move_error {
                Some(kind) => Err(Error::new(kind, "store refused the move")),
                None => self.inner.move_file(from, to),
            }
        }
        fn list_files(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
            self.inner.list_files(dir)
        }
    }

    fn run_quirky(fs: QuirkyFs, selection: MoveSelection) -> (SyncToAsyncFs<QuirkyFs>, MoveReport) {
        let fs = SyncToAsyncFs::new(fs);
        let report =
            block_on_test(AttachmentMover::new(&fs, Path::new("")).execute_moves(&[selection]));
        (fs, report)
    }

    #[test]
    fn test_move_error_is_reported() {
        let store = QuirkyFs {
            move_error: Some(ErrorKind::PermissionDenied),
            ..Default::default()
        };
        store.inner.write_binary(Path::new("a/img.png"), &[1]).unwrap();

        let (fs, report) = run_quirky(store, MoveSelection::new("a/img.png", "b"));

        assert_eq!(report.success_count(), 0);
        assert_eq!(report.failures[0].file_name, "img.png");
        assert!(report.failures[0].message.contains("store refused the move"));
        assert!(fs.inner().inner.exists(Path::new("a/img.png")));
    }

    #[test]
    fn test_destination_taken_during_move() {
        let store = QuirkyFs {
            move_error: Some(ErrorKind::AlreadyExists),
            ..Default::default()
        };
        store.inner.write_binary(Path::new("a/img.png"), &[1]).unwrap();

        let (_, report) = run_quirky(store, MoveSelection::new("a/img.png", "b"));

        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("already occupied"));
    }

    #[test]
    fn test_case_insensitive_collision_gets_suffix() {
        let store = QuirkyFs {
            case_insensitive: true,
            ..Default::default()
        };
        store.inner.write_binary(Path::new("a/img.png"), &[1]).unwrap();
        store
            .inner
            .write_binary(Path::new("Docs/B/assets/IMG.png"), &[2])
            .unwrap();

        let (fs, report) =
            run_quirky(store, MoveSelection::new("a/img.png", "Docs/B/assets"));

        assert!(report.is_success());
        assert_eq!(report.moved[0].to, "Docs/B/assets/img (1).png");
        let inner = &fs.inner().inner;
        assert_eq!(inner.read_binary(Path::new("Docs/B/assets/IMG.png")).unwrap(), vec![2]);
        assert_eq!(
            inner.read_binary(Path::new("Docs/B/assets/img (1).png")).unwrap(),
            vec![1]
        );
    }
}
