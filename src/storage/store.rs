use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SprintError};
use crate::model::{MemberDayEntry, SprintConfig};

/// The storage layer. All file I/O goes through here.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Create a Store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The .sprintcap directory path.
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".sprintcap")
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir().join("config.json")
    }

    pub fn entries_path(&self) -> PathBuf {
        self.data_dir().join("entries.json")
    }

    /// Check if .sprintcap/ exists.
    pub fn is_initialized(&self) -> bool {
        self.data_dir().exists()
    }

    /// Initialize .sprintcap/ with the given config and an empty entry list.
    pub fn init(&self, config: &SprintConfig) -> Result<()> {
        if self.is_initialized() {
            return Err(SprintError::AlreadyInitialized(
                self.data_dir().display().to_string(),
            ));
        }
        config.validate()?;

        fs::create_dir_all(self.data_dir())?;
        self.write_json(&self.config_path(), config)?;
        self.write_json(&self.entries_path(), &Vec::<MemberDayEntry>::new())?;
        debug!(dir = %self.data_dir().display(), "initialized store");
        Ok(())
    }

    /// Load and validate the sprint config.
    pub fn load_config(&self) -> Result<SprintConfig> {
        self.ensure_initialized()?;
        let data = fs::read_to_string(self.config_path())?;
        let config: SprintConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// The stored config, or the built-in default when not initialized.
    pub fn load_config_or_default(&self) -> Result<SprintConfig> {
        if self.is_initialized() {
            self.load_config()
        } else {
            Ok(SprintConfig::default())
        }
    }

    /// Stored schedule entries; a missing file means none.
    pub fn load_entries(&self) -> Result<Vec<MemberDayEntry>> {
        self.ensure_initialized()?;
        let path = self.entries_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        load_entries_file(&path)
    }

    // --- Helpers ---

    fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            Err(SprintError::NotInitialized)
        } else {
            Ok(())
        }
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Read a JSON array of member/day entries from any path.
pub fn load_entries_file(path: &Path) -> Result<Vec<MemberDayEntry>> {
    let data = fs::read_to_string(path)?;
    let entries: Vec<MemberDayEntry> = serde_json::from_str(&data)?;
    debug!(path = %path.display(), count = entries.len(), "loaded entries");
    Ok(entries)
}
