// Copyright 2026 karabiner-chord-compiler contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration write transaction with automatic backup
//!
//! Provides atomic replacement of the daemon's configuration file:
//! a timestamped backup is created before any modification, the new
//! content goes through a temp-file-then-rename write, and a failed
//! commit leaves the original file untouched.

use atomic_write_file::AtomicWriteFile;
use std::{fs, io::Write, path::PathBuf};

use crate::config::{ConfigError, ProfileWriter};

/// Atomic configuration write with a rollback point.
///
/// # Lifecycle
///
/// 1. `begin()` - creates a timestamped backup immediately
/// 2. Caller prepares the merged document in memory
/// 3. `commit()` - writes atomically, or `rollback()` - restores the backup
pub struct WriteTransaction<'a> {
    writer: &'a ProfileWriter,
    backup_path: Option<PathBuf>,
}

impl<'a> WriteTransaction<'a> {
    /// Begins a transaction by creating a timestamped backup, ensuring a
    /// rollback point exists before any modification is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if the current configuration cannot be read or
    /// the backup cannot be written.
    pub fn begin(writer: &'a ProfileWriter) -> Result<Self, ConfigError> {
        let backup_path = writer.create_timestamped_backup()?;

        Ok(Self {
            writer,
            backup_path: Some(backup_path),
        })
    }

    /// Commits by atomically writing the new content.
    ///
    /// Consumes the transaction, preventing accidental double-commits.
    /// On failure the original file is unchanged and the backup from
    /// `begin()` remains available.
    pub fn commit(self, new_content: &str) -> Result<(), ConfigError> {
        let mut file = AtomicWriteFile::options()
            .open(&self.writer.config_path)
            .map_err(|e| {
                ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e))
            })?;

        file.write_all(new_content.as_bytes())
            .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

        file.commit()
            .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

        Ok(())
    }

    /// Restores the configuration from the backup created by `begin()`.
    pub fn rollback(&self) -> Result<(), ConfigError> {
        let backup_path = self.backup_path.as_ref().ok_or_else(|| {
            ConfigError::BackupFailed("No backup available for rollback".to_string())
        })?;

        let backup_content = fs::read_to_string(backup_path)?;

        let mut file = AtomicWriteFile::options()
            .open(&self.writer.config_path)
            .map_err(|e| {
                ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e))
            })?;

        file.write_all(backup_content.as_bytes())
            .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

        file.commit()
            .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit: {}", e)))?;

        Ok(())
    }
}
