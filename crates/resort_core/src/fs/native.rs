//! Native filesystem implementation.
//!
//! Only available on non-WASM targets.

use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};

use super::FileSystem;

/// This is a simple filesystem implementation that simply maps to std::fs methods
#[derive(Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_binary(path, content.as_bytes())
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        // std::fs::remove_dir refuses non-empty folders
        fs::remove_dir(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Source file not found: {:?}", from),
            ));
        }
        if to.exists() {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("Destination already exists: {:?}", to),
            ));
        }

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::rename(from, to)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            files.push(entry.path());
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_fs_move_and_cleanup() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        let src = tmp.path().join("old/img.png");
        let dest = tmp.path().join("new/deeper/img.png");

        fs.write_binary(&src, &[7, 7]).unwrap();
        fs.move_file(&src, &dest).unwrap();

        assert!(!fs.exists(&src));
        assert_eq!(fs.read_binary(&dest).unwrap(), vec![7, 7]);
        assert!(fs.list_files(&tmp.path().join("old")).unwrap().is_empty());
        fs.remove_dir(&tmp.path().join("old")).unwrap();
        assert!(!fs.is_dir(&tmp.path().join("old")));
    }

    #[cfg(unix)]
    #[test]
    fn test_real_fs_recursive_listing_does_not_enter_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        fs.write_file(&tmp.path().join("Docs/A.md"), "").unwrap();
        let link = tmp.path().join("Docs/loop");
        std::os::unix::fs::symlink(tmp.path().join("Docs"), &link).unwrap();

        assert!(fs.is_symlink(&link));
        assert!(!fs.is_symlink(&tmp.path().join("Docs")));

        let all = fs.list_all_files_recursive(tmp.path()).unwrap();
        assert!(all.contains(&link));
        assert!(!all.contains(&link.join("A.md")));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_real_fs_remove_dir_refuses_non_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        fs.write_file(&tmp.path().join("a/note.md"), "x").unwrap();

        assert!(fs.remove_dir(&tmp.path().join("a")).is_err());
    }
}
