//! File-backed credential persistence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error};

use cutter_net::CredentialStore;

use crate::error::{Error, ErrorKind, Result};
use crate::RefreshTokenStore;

/// Credentials as written to disk.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub device_id: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub stored_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("device_id", &self.device_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("stored_at", &self.stored_at)
            .finish()
    }
}

impl StoredCredentials {
    /// Fresh credentials for a new device, without tokens.
    pub fn new_device() -> Self {
        Self {
            device_id: uuid::Uuid::new_v4().to_string(),
            access_token: None,
            refresh_token: None,
            stored_at: chrono::Utc::now(),
        }
    }
}

/// Credentials stored as one JSON file per key.
///
/// Keys become file names and may only contain ASCII letters, digits, `-`
/// and `_`; any other key is rejected with a `Config` error.
///
/// The store is bound to one active key: [`CredentialStore`] reads come
/// from an in-memory copy of that key's credentials, and token updates are
/// written through to disk.
#[derive(Debug)]
pub struct FileCredentialStore {
    base_path: PathBuf,
    key: String,
    current: RwLock<StoredCredentials>,
}

impl FileCredentialStore {
    /// Open the store at the default path, loading or creating `key`.
    ///
    /// Default path: `~/.cutter/credentials/`
    pub fn open(key: &str) -> Result<Self> {
        Self::open_at(default_credentials_dir()?, key)
    }

    /// Open the store at a custom path, loading or creating `key`.
    pub fn open_at(path: impl AsRef<Path>, key: &str) -> Result<Self> {
        let mut store = Self {
            base_path: path.as_ref().to_path_buf(),
            key: key.to_string(),
            current: RwLock::new(StoredCredentials::new_device()),
        };

        match store.load(key)? {
            Some(existing) => {
                debug!(key, "Loaded stored credentials");
                store.current = RwLock::new(existing);
            }
            None => {
                debug!(key, "No stored credentials, registering new device");
                let fresh = store.snapshot();
                store.save(key, &fresh)?;
            }
        }

        Ok(store)
    }

    /// The active key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// A copy of the active credentials.
    pub fn snapshot(&self) -> StoredCredentials {
        self.read().clone()
    }

    /// Save credentials under a key.
    pub fn save(&self, key: &str, credentials: &StoredCredentials) -> Result<()> {
        self.ensure_dir()?;

        let path = self.credentials_path(key)?;
        let mut stored = credentials.clone();
        stored.stored_at = chrono::Utc::now();

        let json = serde_json::to_string_pretty(&stored)?;

        // Readers only ever see a complete file.
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&staging, perms)?;
        }

        std::fs::rename(&staging, &path)?;

        Ok(())
    }

    /// Load credentials stored under a key.
    pub fn load(&self, key: &str) -> Result<Option<StoredCredentials>> {
        let path = self.credentials_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&path)?;
        let stored: StoredCredentials = serde_json::from_str(&json)?;

        Ok(Some(stored))
    }

    /// Delete credentials stored under a key.
    ///
    /// Deleting the active key also clears its tokens in memory.
    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.credentials_path(key)?;

        if path.exists() {
            std::fs::remove_file(&path)?;
        }

        if key == self.key {
            let mut current = self.write();
            current.access_token = None;
            current.refresh_token = None;
        }

        Ok(())
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.credentials_path(key)?.exists())
    }

    /// List all stored keys.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.base_path)? {
            let path = entry?.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    keys.push(stem.to_string_lossy().to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn update(&self, apply: impl FnOnce(&mut StoredCredentials)) {
        let snapshot = {
            let mut current = self.write();
            apply(&mut current);
            current.clone()
        };

        if let Err(err) = self.save(&self.key, &snapshot) {
            error!(
                key = %self.key,
                error = %err,
                "Failed to persist credentials, tokens will be lost on restart"
            );
        }
    }

    fn credentials_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(Error::new(ErrorKind::Config(format!(
                "invalid credentials key {:?}: use ASCII letters, digits, '-' or '_'",
                key
            ))));
        }

        Ok(self.base_path.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.base_path.exists() {
            std::fs::create_dir_all(&self.base_path)?;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, StoredCredentials> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoredCredentials> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for FileCredentialStore {
    fn device_id(&self) -> Option<String> {
        Some(self.read().device_id.clone())
    }

    fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    fn set_access_token(&self, token: String) {
        self.update(|credentials| credentials.access_token = Some(token));
    }
}

impl RefreshTokenStore for FileCredentialStore {
    fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    fn set_refresh_token(&self, token: String) {
        self.update(|credentials| credentials.refresh_token = Some(token));
    }
}

/// Get the default credentials directory.
pub fn default_credentials_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::new(ErrorKind::Config("Could not find home directory".to_string())))?;

    Ok(home.join(".cutter").join("credentials"))
}
