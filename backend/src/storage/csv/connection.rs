use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::breeding_repository::BreedingRepository;
use super::credential_repository::CredentialRepository;
use super::reminder_repository::ReminderRepository;
use crate::storage::traits::Connection;

pub const USERS_FILE: &str = "users.json";
pub const BREEDING_FILE: &str = "breeding_data.csv";
pub const BREEDING_SEQUENCE_FILE: &str = "breeding_sequence.yaml";
pub const REMINDERS_FILE: &str = "reminders.json";

/// CsvConnection owns the data directory and knows where each store lives
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// `~/Documents/Mice Breeding Manager`
    pub fn default_data_directory() -> Result<PathBuf> {
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        Ok(PathBuf::from(home_dir)
            .join("Documents")
            .join("Mice Breeding Manager"))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn users_file_path(&self) -> PathBuf {
        self.base_directory.join(USERS_FILE)
    }

    pub fn breeding_file_path(&self) -> PathBuf {
        self.base_directory.join(BREEDING_FILE)
    }

    pub fn breeding_sequence_file_path(&self) -> PathBuf {
        self.base_directory.join(BREEDING_SEQUENCE_FILE)
    }

    pub fn reminders_file_path(&self) -> PathBuf {
        self.base_directory.join(REMINDERS_FILE)
    }

    /// Replace `path` with `contents`: write a sibling temp file, then rename over the original
    pub fn write_atomically(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "data".to_string());
        let temp_path = path.with_file_name(format!("{}.tmp", file_name));

        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}

impl Connection for CsvConnection {
    type CredentialRepository = CredentialRepository;
    type BreedingRepository = BreedingRepository;
    type ReminderRepository = ReminderRepository;

    fn create_credential_repository(&self) -> Self::CredentialRepository {
        CredentialRepository::new(self.clone())
    }

    fn create_breeding_repository(&self) -> Self::BreedingRepository {
        BreedingRepository::new(self.clone())
    }

    fn create_reminder_repository(&self) -> Self::ReminderRepository {
        ReminderRepository::new(self.clone())
    }
}
