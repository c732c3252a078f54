use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur at the persistence boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The daemon's configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),
    /// Failed to create backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),
    /// The configuration file exists but is not the expected document shape.
    #[error("Malformed daemon configuration: {0}")]
    MalformedConfig(String),
    /// No profile with the requested name exists in the configuration.
    #[error("Profile '{profile}' not found in {config}")]
    ProfileNotFound {
        /// Requested profile name
        profile: String,
        /// Configuration file that was searched
        config: PathBuf,
    },
    /// Document serialization failed.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
