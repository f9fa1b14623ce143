//! Client-persisted resume identifiers.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedIdentity {
    pub game_id: Uuid,
    pub player_id: Uuid,
}

pub trait IdentityStore: Send + Sync {
    fn load(&self) -> Result<Option<PersistedIdentity>, AppError>;
    fn save(&self, identity: &PersistedIdentity) -> Result<(), AppError>;
    /// Forget both identifiers.
    fn clear(&self) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    slot: Mutex<Option<PersistedIdentity>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<PersistedIdentity>, AppError> {
        Ok(*self.slot.lock())
    }

    fn save(&self, identity: &PersistedIdentity) -> Result<(), AppError> {
        *self.slot.lock() = Some(*identity);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Identifiers as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    /// A missing file means no identity. An unreadable document is logged and
    /// treated the same, so the client falls back to join/create.
    fn load(&self) -> Result<Option<PersistedIdentity>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::internal(format!(
                    "Failed to read identity file {}: {e}",
                    self.path.display()
                )))
            }
        };
        match serde_json::from_str(&raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt identity file");
                Ok(None)
            }
        }
    }

    fn save(&self, identity: &PersistedIdentity) -> Result<(), AppError> {
        let encoded = serde_json::to_string_pretty(identity)
            .map_err(|e| AppError::internal(format!("Failed to encode identity: {e}")))?;
        fs::write(&self.path, encoded).map_err(|e| {
            AppError::internal(format!(
                "Failed to write identity file {}: {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "Identity saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!(
                "Failed to remove identity file {}: {e}",
                self.path.display()
            ))),
        }
    }
}
