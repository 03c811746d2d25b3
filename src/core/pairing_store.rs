// Pairing persistence: keeps the paired endpoint across restarts

use crate::models::pairing::PairingConfig;
use std::path::PathBuf;

/// Error types for pairing persistence
#[derive(Debug, thiserror::Error)]
pub enum PairingStoreError {
    #[error("failed to read pairing file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write pairing file: {0}")]
    Write(#[source] std::io::Error),

    #[error("stored pairing is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type PairingStoreResult<T> = Result<T, PairingStoreError>;

/// JSON file storage for the pairing config
pub struct PairingStore {
    path: PathBuf,
}

impl PairingStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the user's home directory
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());

        let mut path = PathBuf::from(home);
        path.push(".handpad");
        path.push("pairing.json");
        path
    }

    /// Load the stored pairing; a missing file yields the defaults
    pub fn load(&self) -> PairingStoreResult<PairingConfig> {
        if !self.path.exists() {
            return Ok(PairingConfig::default());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(PairingStoreError::Read)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Persist the pairing, creating parent directories as needed
    pub fn save(&self, config: &PairingConfig) -> PairingStoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(PairingStoreError::Write)?;
        }
        let contents = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, contents).map_err(PairingStoreError::Write)?;
        Ok(())
    }
}
