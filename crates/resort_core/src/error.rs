use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Unified error type for resort operations
#[derive(Debug, Error)]
pub enum ResortError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Mover errors
    #[error("Failed to create folder '{path}': {source}")]
    FolderCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move '{from}' to '{to}': {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to list folder '{path}': {source}")]
    FolderList {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source file '{0}' no longer exists")]
    SourceMissing(PathBuf),

    #[error("Destination '{0}' is already occupied")]
    DestinationOccupied(PathBuf),

    // Vault errors
    #[error("Vault not found at '{0}'")]
    VaultNotFound(PathBuf),

    // Serialization errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Config errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type alias for resort operations
pub type Result<T> = std::result::Result<T, ResortError>;

/// A serializable representation of ResortError for IPC (e.g., a desktop UI)
#[derive(Debug, Clone, Serialize)]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Associated path (if applicable)
    pub path: Option<PathBuf>,
}

impl From<&ResortError> for SerializableError {
    fn from(err: &ResortError) -> Self {
        let kind = match err {
            ResortError::Io(_) => "Io",
            ResortError::FileRead { .. } => "FileRead",
            ResortError::FileWrite { .. } => "FileWrite",
            ResortError::FolderCreate { .. } => "FolderCreate",
            ResortError::Move { .. } => "Move",
            ResortError::FolderList { .. } => "FolderList",
            ResortError::SourceMissing(_) => "SourceMissing",
            ResortError::DestinationOccupied(_) => "DestinationOccupied",
            ResortError::VaultNotFound(_) => "VaultNotFound",
            ResortError::Yaml(_) => "Yaml",
            ResortError::Json(_) => "Json",
            ResortError::ConfigParse(_) => "ConfigParse",
            ResortError::ConfigSerialize(_) => "ConfigSerialize",
            ResortError::NoConfigDir => "NoConfigDir",
        }
        .to_string();

        let path = match err {
            ResortError::FileRead { path, .. } => Some(path.clone()),
            ResortError::FileWrite { path, .. } => Some(path.clone()),
            ResortError::FolderCreate { path, .. } => Some(path.clone()),
            ResortError::Move { from, .. } => Some(from.clone()),
            ResortError::FolderList { path, .. } => Some(path.clone()),
            ResortError::SourceMissing(path) => Some(path.clone()),
            ResortError::DestinationOccupied(path) => Some(path.clone()),
            ResortError::VaultNotFound(path) => Some(path.clone()),
            _ => None,
        };

        Self {
            kind,
            message: err.to_string(),
            path,
        }
    }
}

impl From<ResortError> for SerializableError {
    fn from(err: ResortError) -> Self {
        SerializableError::from(&err)
    }
}

impl ResortError {
    /// Convert to a serializable representation for IPC
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }
}
