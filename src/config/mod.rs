//! Persistence boundary: writing compiled profiles into the daemon's
//! configuration.
//!
//! The compiler's full external behaviour is "read rule definitions,
//! write one document, exit". This module owns the write half:
//!
//! - **Document rendering**: deterministic serialization of the assembled
//!   profile (see `document`)
//! - **Profile merge**: the compiled rules replace the
//!   `complex_modifications.rules` of the named profile inside the
//!   daemon's `karabiner.json`; nothing else in the file is touched
//! - **Atomic writes**: temp-file-then-rename, with a timestamped backup
//!   taken first, so a structural failure never corrupts or replaces the
//!   previously persisted configuration
//!
//! # Example
//!
//! ```no_run
//! use karabiner_chord_compiler::config::ProfileWriter;
//! use karabiner_chord_compiler::rules::{build_profile, ProfileParams};
//!
//! let profile = build_profile(&ProfileParams::default())?;
//! let writer = ProfileWriter::new("/home/user/.config/karabiner/karabiner.json".into())?;
//! writer.install(&profile)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
mod error;
mod transaction;

pub use document::{render_rule_set, RuleSetDocument};
pub use error::ConfigError;
pub use transaction::WriteTransaction;

use crate::core::types::Profile;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

/// Writes compiled profiles into the daemon's configuration file with
/// safe atomic operations.
///
/// All writes go through the transaction API (backup, then atomic
/// replace); read access never requires one.
#[derive(Debug)]
pub struct ProfileWriter {
    /// Path to the daemon's configuration file.
    pub(crate) config_path: PathBuf,
    backup_dir: PathBuf,
}

impl ProfileWriter {
    /// Creates a writer for the given configuration file.
    ///
    /// Validates that the file exists and creates the backup directory
    /// next to it. A symlinked configuration gets a warning on stderr but
    /// is allowed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist and
    /// `ConfigError::BackupDirNotWritable` if the backup directory cannot
    /// be created.
    pub fn new(config_path: PathBuf) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }

        if config_path.read_link().is_ok() {
            eprintln!(
                "⚠ Warning: Config file is a symlink: {}",
                config_path.display()
            );
        }

        // Backup directory next to the config file,
        // e.g. ~/.config/karabiner/karabiner.json → ~/.config/karabiner/backups/
        let backup_dir = config_path
            .parent()
            .ok_or_else(|| {
                ConfigError::BackupDirNotWritable(PathBuf::from(
                    "Config file has no parent directory",
                ))
            })?
            .join("backups");

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir)
                .map_err(|_| ConfigError::BackupDirNotWritable(backup_dir.clone()))?;
        }

        if backup_dir.metadata()?.permissions().readonly() {
            return Err(ConfigError::BackupDirNotWritable(backup_dir));
        }

        Ok(Self {
            config_path,
            backup_dir,
        })
    }

    /// Reads the current configuration file content.
    pub fn read_config(&self) -> Result<String, ConfigError> {
        Ok(fs::read_to_string(&self.config_path)?)
    }

    /// Merges the compiled profile into the configuration and persists it
    /// atomically, taking a timestamped backup first.
    ///
    /// # Errors
    ///
    /// Fails without touching the configuration when the file is
    /// malformed, the named profile does not exist, or the write cannot
    /// complete.
    pub fn install(&self, profile: &Profile) -> Result<(), ConfigError> {
        let current = self.read_config()?;
        let merged = merge_profile(&current, profile, &self.config_path)?;

        let tx = WriteTransaction::begin(self)?;
        tx.commit(&merged)
    }

    pub(crate) fn create_timestamped_backup(&self) -> Result<PathBuf, ConfigError> {
        let content = fs::read_to_string(&self.config_path)?;

        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");

        let original_name = self
            .config_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ConfigError::BackupFailed("Config path has no file name".to_string()))?;

        let backup_filename = format!("{}.{}", original_name, timestamp);
        let backup_path = self.backup_dir.join(&backup_filename);

        fs::write(&backup_path, &content)
            .map_err(|e| ConfigError::BackupFailed(e.to_string()))?;

        Ok(backup_path)
    }
}

/// Replaces the named profile's `complex_modifications.rules` with the
/// compiled rules, leaving every other part of the document intact.
fn merge_profile(
    config_json: &str,
    profile: &Profile,
    config_path: &PathBuf,
) -> Result<String, ConfigError> {
    let mut root: serde_json::Value = serde_json::from_str(config_json)
        .map_err(|e| ConfigError::MalformedConfig(e.to_string()))?;

    let profiles = root
        .get_mut("profiles")
        .and_then(serde_json::Value::as_array_mut)
        .ok_or_else(|| ConfigError::MalformedConfig("missing 'profiles' array".to_string()))?;

    let entry = profiles
        .iter_mut()
        .find(|p| p.get("name").and_then(serde_json::Value::as_str) == Some(profile.name.as_str()))
        .ok_or_else(|| ConfigError::ProfileNotFound {
            profile: profile.name.clone(),
            config: config_path.clone(),
        })?;

    let entry_obj = entry.as_object_mut().ok_or_else(|| {
        ConfigError::MalformedConfig("profile entry is not an object".to_string())
    })?;

    let complex = entry_obj
        .entry("complex_modifications")
        .or_insert_with(|| serde_json::json!({}));
    let complex_obj = complex.as_object_mut().ok_or_else(|| {
        ConfigError::MalformedConfig("'complex_modifications' is not an object".to_string())
    })?;

    complex_obj.insert("rules".to_string(), document::rules_value(profile)?);

    let mut rendered = serde_json::to_string_pretty(&root)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ActionTarget, Manipulator, Rule, TriggerSpec};
    use tempfile::TempDir;

    /// Helper: a minimal daemon configuration with one profile.
    fn daemon_config() -> &'static str {
        r#"{
  "global": { "show_in_menu_bar": false },
  "profiles": [
    { "name": "Default", "selected": true, "virtual_hid_keyboard": { "keyboard_type_v2": "ansi" } }
  ]
}
"#
    }

    /// Helper: creates a temporary karabiner.json for testing.
    fn create_test_config() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("karabiner.json");
        fs::write(&config_path, daemon_config()).unwrap();
        (temp_dir, config_path)
    }

    fn test_profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            rules: vec![Rule {
                name: "Swap escape".to_string(),
                conditions: Vec::new(),
                manipulators: vec![Manipulator::new(
                    TriggerSpec::bare("caps_lock"),
                    ActionTarget::key("escape"),
                )],
            }],
        }
    }

    #[test]
    fn test_new_with_valid_config() {
        let (_temp_dir, config_path) = create_test_config();

        let writer = ProfileWriter::new(config_path.clone());
        assert!(writer.is_ok(), "Should create writer with valid config");

        let backup_dir = config_path.parent().unwrap().join("backups");
        assert!(backup_dir.exists(), "Backup directory should be created");
    }

    #[test]
    fn test_new_with_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.json");

        let result = ProfileWriter::new(config_path.clone());
        match result {
            Err(ConfigError::NotFound(path)) => assert_eq!(path, config_path),
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_install_merges_rules_into_named_profile() {
        let (_temp_dir, config_path) = create_test_config();
        let writer = ProfileWriter::new(config_path.clone()).unwrap();

        writer.install(&test_profile("Default")).unwrap();

        let merged: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();

        let rules = &merged["profiles"][0]["complex_modifications"]["rules"];
        assert_eq!(rules[0]["description"], "Swap escape");
        assert_eq!(
            rules[0]["manipulators"][0]["from"]["key_code"],
            "caps_lock"
        );

        // Untouched siblings survive the merge
        assert_eq!(merged["global"]["show_in_menu_bar"], false);
        assert_eq!(merged["profiles"][0]["selected"], true);
    }

    #[test]
    fn test_install_creates_backup() {
        let (_temp_dir, config_path) = create_test_config();
        let writer = ProfileWriter::new(config_path.clone()).unwrap();

        writer.install(&test_profile("Default")).unwrap();

        let backup_dir = config_path.parent().unwrap().join("backups");
        let backups: Vec<_> = fs::read_dir(&backup_dir).unwrap().collect();
        assert_eq!(backups.len(), 1, "Install should create one backup");

        // The backup holds the pre-install content
        let backup_path = backups[0].as_ref().unwrap().path();
        assert_eq!(fs::read_to_string(backup_path).unwrap(), daemon_config());
    }

    #[test]
    fn test_install_unknown_profile_leaves_config_untouched() {
        let (_temp_dir, config_path) = create_test_config();
        let writer = ProfileWriter::new(config_path.clone()).unwrap();

        let result = writer.install(&test_profile("Gaming"));
        match result {
            Err(ConfigError::ProfileNotFound { profile, .. }) => assert_eq!(profile, "Gaming"),
            other => panic!("Expected ProfileNotFound, got: {:?}", other),
        }

        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            daemon_config(),
            "Failed install must not modify the config"
        );
    }

    #[test]
    fn test_install_malformed_config_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("karabiner.json");
        fs::write(&config_path, "{ not json").unwrap();

        let writer = ProfileWriter::new(config_path).unwrap();
        let result = writer.install(&test_profile("Default"));
        assert!(matches!(result, Err(ConfigError::MalformedConfig(_))));
    }

    #[test]
    fn test_install_twice_is_idempotent() {
        let (_temp_dir, config_path) = create_test_config();
        let writer = ProfileWriter::new(config_path.clone()).unwrap();

        writer.install(&test_profile("Default")).unwrap();
        let first = fs::read_to_string(&config_path).unwrap();

        writer.install(&test_profile("Default")).unwrap();
        let second = fs::read_to_string(&config_path).unwrap();

        assert_eq!(first, second, "Identical input must produce identical output");
    }

    #[test]
    fn test_transaction_rollback_restores_original() {
        let (_temp_dir, config_path) = create_test_config();
        let writer = ProfileWriter::new(config_path.clone()).unwrap();

        let tx = WriteTransaction::begin(&writer).unwrap();
        tx.commit("{ \"profiles\": [] }\n").unwrap();
        assert_ne!(fs::read_to_string(&config_path).unwrap(), daemon_config());

        let tx = WriteTransaction::begin(&writer).unwrap();
        // First backup still holds the original; roll back to the newer one,
        // then verify the original via the older backup manually
        tx.rollback().unwrap();
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "{ \"profiles\": [] }\n"
        );
    }
}
