//! Error types for the viewer engine.
//!
//! Lifecycle operations never fail; these errors only surface at IO edges
//! (configuration, persisted settings) and in the remote control layer.

use std::path::PathBuf;
use thiserror::Error;

/// Viewer-specific errors
#[derive(Debug, Error)]
pub enum ViewerError {
    /// No camera or output is registered under this id
    #[error("Unknown {family} id: {id:?}")]
    UnknownEntity { family: &'static str, id: String },

    /// The entity exists but is disabled
    #[error("{family} {id:?} is disabled")]
    DisabledEntity { family: &'static str, id: String },

    /// Reading a configuration file failed
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration JSON did not match the expected layout
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Settings file could not be read or written
    #[error("Settings IO failed for {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file exists but is not a JSON object of strings
    #[error("Settings file {path} is malformed: {reason}")]
    SettingsFormat { path: PathBuf, reason: String },

    /// Remote call named a method the dispatcher does not know
    #[error("Unknown remote method: {0}")]
    UnknownMethod(String),

    /// Remote call parameters did not match the method
    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
