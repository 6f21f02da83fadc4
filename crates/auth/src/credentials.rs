//! In-memory credential store.
//!
//! Tokens are redacted in Debug output.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cutter_net::CredentialStore;

use crate::error::{Error, ErrorKind, Result};
use crate::RefreshTokenStore;

#[derive(Clone, Default)]
struct Secrets {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Thread-safe holder of the device id, access token and refresh token.
///
/// A random device id is generated when none is provided.
pub struct Keychain {
    device_id: String,
    secrets: RwLock<Secrets>,
}

impl std::fmt::Debug for Keychain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secrets = self.read();
        f.debug_struct("Keychain")
            .field("device_id", &self.device_id)
            .field(
                "access_token",
                &secrets.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "refresh_token",
                &secrets.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}

impl Keychain {
    /// Create an empty keychain with a freshly generated device id.
    pub fn new() -> Self {
        Self::with_device_id(uuid::Uuid::new_v4().to_string())
    }

    /// Create an empty keychain for a known device.
    pub fn with_device_id(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            secrets: RwLock::new(Secrets::default()),
        }
    }

    /// Set the access token.
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        self.write().access_token = Some(token.into());
        self
    }

    /// Set the refresh token.
    pub fn with_refresh_token(self, token: impl Into<String>) -> Self {
        self.write().refresh_token = Some(token.into());
        self
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `CUTTER_DEVICE_ID` (generated when unset),
    /// `CUTTER_ACCESS_TOKEN` and `CUTTER_REFRESH_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let device_id = match var("CUTTER_DEVICE_ID") {
            Some(id) if id.trim().is_empty() => {
                return Err(Error::new(ErrorKind::EnvVar("CUTTER_DEVICE_ID".to_string())))
            }
            Some(id) => id,
            None => uuid::Uuid::new_v4().to_string(),
        };

        let mut keychain = Self::with_device_id(device_id);
        if let Some(token) = var("CUTTER_ACCESS_TOKEN") {
            keychain = keychain.with_access_token(token);
        }
        if let Some(token) = var("CUTTER_REFRESH_TOKEN") {
            keychain = keychain.with_refresh_token(token);
        }

        Ok(keychain)
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Forget both tokens, keeping the device id.
    pub fn clear(&self) {
        *self.write() = Secrets::default();
    }

    fn read(&self) -> RwLockReadGuard<'_, Secrets> {
        self.secrets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Secrets> {
        self.secrets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for Keychain {
    fn device_id(&self) -> Option<String> {
        Some(self.device_id.clone())
    }

    fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    fn set_access_token(&self, token: String) {
        self.write().access_token = Some(token);
    }
}

impl RefreshTokenStore for Keychain {
    fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    fn set_refresh_token(&self, token: String) {
        self.write().refresh_token = Some(token);
    }
}
