//! Persisted session store.
//!
//! Three string keys survive restarts: the access token, the refresh token,
//! and the serialized user profile. A token in the store means a session is
//! active; nothing checks expiry locally.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use relab_core::UserProfile;
use secrecy::{ExposeSecret, SecretString};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Session keys for persisted authentication data.
pub mod keys {
    /// Bearer token sent with every gated request.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Stored on login, never used.
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// JSON-serialized [`relab_core::UserProfile`].
    pub const USER_DATA: &str = "user_data";
}

/// Value written by older clients when the login response had no user.
const UNDEFINED_SENTINEL: &str = "undefined";

/// Errors from the key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Backends
// =============================================================================

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// A JSON object in a single file.
///
/// The file and its parent directory are created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load for a write; an unparsable file is replaced.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.load() {
            Err(StoreError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt session file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    /// Write through a temp file in the same directory, then rename over the
    /// target. The temp file is created owner-only (0600 on unix), and the
    /// rename carries that mode over.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.load_for_write()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Typed access to the persisted session keys.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Session persisted in a JSON file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStore::new(path))
    }

    /// Session that lives only as long as the process.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// The stored access token.
    ///
    /// Unreadable storage reads as no token.
    #[must_use]
    pub fn get_token(&self) -> Option<SecretString> {
        self.read(keys::ACCESS_TOKEN)
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    /// The stored user profile.
    ///
    /// Missing values, the `"undefined"` sentinel, and malformed JSON all
    /// read as no user.
    #[must_use]
    pub fn get_user(&self) -> Option<UserProfile> {
        let raw = self.read(keys::USER_DATA)?;
        if raw == UNDEFINED_SENTINEL {
            return None;
        }
        serde_json::from_str(&raw)
            .inspect_err(|e| debug!(error = %e, "Ignoring malformed stored user"))
            .ok()
    }

    /// Persist a fresh session.
    ///
    /// With `user` set to `None` the previously stored profile is kept.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any key cannot be written.
    pub fn save(
        &self,
        access_token: &SecretString,
        refresh_token: &str,
        user: Option<&UserProfile>,
    ) -> Result<(), StoreError> {
        self.backend
            .set(keys::ACCESS_TOKEN, access_token.expose_secret())?;
        self.backend.set(keys::REFRESH_TOKEN, refresh_token)?;
        if let Some(user) = user {
            self.backend
                .set(keys::USER_DATA, &serde_json::to_string(user)?)?;
        }
        Ok(())
    }

    /// Remove every session key.
    ///
    /// # Errors
    ///
    /// Every key is attempted; returns the first `StoreError` encountered.
    pub fn clear(&self) -> Result<(), StoreError> {
        [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER_DATA]
            .into_iter()
            .map(|key| self.backend.remove(key))
            .fold(Ok(()), Result::and)
    }

    /// Raw access for callers that need a key outside the typed API.
    pub(crate) fn read(&self, key: &str) -> Option<String> {
        self.backend
            .get(key)
            .inspect_err(|e| debug!(key, error = %e, "Session storage unavailable"))
            .ok()
            .flatten()
    }
}
