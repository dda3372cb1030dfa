//! Configuration types for resort.
//!
//! [`Config`] stores the vault location and the canonical attachment folder
//! policy. It is persisted as TOML (typically at
//! `~/.config/resort/config.toml` on Unix systems):
//!
//! ```toml
//! vault = "/home/user/notes"
//!
//! [attachments]
//! location = "same_folder"
//! folder_name = "${notename} (attachments)"
//! vault_folder = "attachments"
//! ```
//!
//! # Async-first Design
//!
//! Use `Config::load_from()` with an `AsyncFileSystem` to load config.
//! For synchronous contexts, use the `_sync` variants or the native
//! [`Config::load`] / [`Config::save`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ResortError, Result};
use crate::fs::AsyncFileSystem;
#[cfg(not(target_arch = "wasm32"))]
use crate::fs::{FileSystem, SyncToAsyncFs};
use crate::policy::FolderPolicy;

/// The parts of resort that the user can configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root folder of the vault
    #[serde(alias = "vault_dir")]
    pub vault: PathBuf,

    /// Where each note's attachments are expected to live
    #[serde(default)]
    pub attachments: FolderPolicy,
}

impl Config {
    /// Create a new config for the given vault with the default policy
    pub fn new(vault: PathBuf) -> Self {
        Self {
            vault,
            attachments: FolderPolicy::default(),
        }
    }

    /// Create a config with an explicit attachment policy
    pub fn with_policy(vault: PathBuf, attachments: FolderPolicy) -> Self {
        Self { vault, attachments }
    }

    // ========================================================================
    // AsyncFileSystem-based methods
    // ========================================================================

    /// Load config from a specific path using an AsyncFileSystem.
    pub async fn load_from<FS: AsyncFileSystem>(fs: &FS, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .await
            .map_err(|e| ResortError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path using an AsyncFileSystem.
    pub async fn save_to<FS: AsyncFileSystem>(&self, fs: &FS, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs.create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs.write_file(path, &contents)
            .await
            .map_err(|e| ResortError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(())
    }

    /// Load config from an AsyncFileSystem, returning a default if not found.
    pub async fn load_from_or_default<FS: AsyncFileSystem>(
        fs: &FS,
        path: &Path,
        vault: PathBuf,
    ) -> Self {
        match Self::load_from(fs, path).await {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default config ({})", e);
                Self::new(vault)
            }
        }
    }

    /// Sync wrapper for [`Config::load_from`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_sync<FS: FileSystem>(fs: FS, path: &Path) -> Result<Self> {
        futures_lite::future::block_on(Self::load_from(&SyncToAsyncFs::new(fs), path))
    }

    /// Sync wrapper for [`Config::save_to`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_sync<FS: FileSystem>(&self, fs: FS, path: &Path) -> Result<()> {
        futures_lite::future::block_on(self.save_to(&SyncToAsyncFs::new(fs), path))
    }
}

// ============================================================================
// Native-only implementation
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl Default for Config {
    fn default() -> Self {
        let vault = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notes");
        Self::new(vault)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Get the config file path (~/.config/resort/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("resort").join("config.toml"))
    }

    /// Load config from default location, or return default if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path).map_err(|e| ResortError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }

        Ok(Config::default())
    }

    /// Save config to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(ResortError::NoConfigDir)?;
        self.save_to_sync(crate::fs::RealFileSystem, &path)
    }

    /// Create and save a config for `vault`
    pub fn init(vault: PathBuf) -> Result<Self> {
        let config = Config::new(vault);
        config.save()?;
        Ok(config)
    }
}
