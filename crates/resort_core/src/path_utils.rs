//! Helpers for vault-relative store paths.
//!
//! Store paths are the stable keys notes and attachments are identified by:
//! `/`-separated, relative to the vault root, without a leading or trailing
//! `/`. The vault root itself is the empty string.

use std::path::Path;

/// Normalize a store path by resolving `.` and `..` components.
///
/// Backslashes are treated as separators and `..` never climbs above the
/// vault root.
///
/// # Example
/// ```
/// use resort_core::path_utils::normalize_store_path;
///
/// assert_eq!(normalize_store_path("Docs/./A/../B/img.png"), "Docs/B/img.png");
/// assert_eq!(normalize_store_path("/Docs/"), "Docs");
/// assert_eq!(normalize_store_path("../img.png"), "img.png");
/// ```
pub fn normalize_store_path(path: &str) -> String {
    let mut normalized: Vec<&str> = Vec::new();

    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                normalized.pop();
            }
            p => normalized.push(p),
        }
    }

    normalized.join("/")
}

/// Convert a filesystem path relative to the vault root into a store path.
pub fn store_path_from(path: &Path) -> String {
    normalize_store_path(&path.to_string_lossy())
}

/// Join a folder and a file name. The vault root (`""`) yields just the name.
///
/// # Example
/// ```
/// use resort_core::path_utils::join_store_path;
///
/// assert_eq!(join_store_path("Docs/B/assets", "img.png"), "Docs/B/assets/img.png");
/// assert_eq!(join_store_path("", "img.png"), "img.png");
/// ```
pub fn join_store_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// The folder containing `path`; `""` for files at the vault root.
pub fn parent_folder(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// The last component of `path`.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Split a file name into stem and extension.
///
/// Dot-files such as `.hidden` have no extension.
///
/// # Example
/// ```
/// use resort_core::path_utils::split_extension;
///
/// assert_eq!(split_extension("img.final.png"), ("img.final", Some("png")));
/// assert_eq!(split_extension("README"), ("README", None));
/// assert_eq!(split_extension(".hidden"), (".hidden", None));
/// ```
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Lowercased extension of the file at `path`, if any.
pub fn extension_lowercase(path: &str) -> Option<String> {
    split_extension(file_name(path)).1.map(str::to_lowercase)
}
