//! # Session Storage
//!
//! A small string key/value store that survives restarts: the session
//! token, the logged-in user and the company profile.
//!
//! ```text
//! session.json
//! {
//!   "token": "eyJhbGciOi...",
//!   "user": "{\"id\":3,\"nom\":\"Diop\",...}",
//!   "entreprise_info": "{\"nom_entreprise\":\"Boutique Awa\",...}"
//! }
//! ```
//!
//! Values are strings; structured values are JSON-encoded by
//! [`SessionStorage::set_json`]. Every write rewrites the whole file
//! through a temporary file, so a crash never leaves a half-written file.
//! The in-memory map only changes once that write succeeded. Clones share
//! the same underlying map.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use gestock_core::CompanyProfile;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Bearer token of the current session.
pub const TOKEN_KEY: &str = "token";
/// JSON-encoded [`gestock_core::User`] of the current session.
pub const USER_KEY: &str = "user";
/// JSON-encoded [`CompanyProfile`].
pub const COMPANY_KEY: &str = "entreprise_info";

#[derive(Debug, Clone)]
pub struct SessionStorage {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
    path: Option<PathBuf>,
}

impl SessionStorage {
    /// Storage that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            path: None,
        }
    }

    /// Opens the file at `path`, starting empty when it does not exist.
    ///
    /// A file that cannot be parsed is ignored with a warning and will be
    /// overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(?path, error = %e, "Session file unreadable, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            debug!(?path, "No session file yet");
            BTreeMap::new()
        };

        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
            path: Some(path),
        })
    }

    /// Opens the storage configured in `config`, or an in-memory one when
    /// no location can be determined.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        match config.storage_path() {
            Some(path) => Self::open(path),
            None => {
                warn!("No storage location available, session will not persist");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // String API
    // =========================================================================

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) -> ClientResult<()> {
        let value = value.into();
        self.update(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
    }

    /// Sets several keys in one write: either all of them are stored or none.
    pub fn set_items(&self, items: &[(&str, String)]) -> ClientResult<()> {
        self.update(|entries| {
            for (key, value) in items {
                entries.insert(key.to_string(), value.clone());
            }
            true
        })
    }

    pub fn remove_item(&self, key: &str) -> ClientResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.update(|entries| {
            entries.clear();
            true
        })
    }

    // =========================================================================
    // Typed API
    // =========================================================================

    /// Reads and decodes a JSON value. A value that does not decode is
    /// treated as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Stored value does not decode");
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> ClientResult<()> {
        let encoded = serde_json::to_string(value)?;
        self.set_item(key, encoded)
    }

    // =========================================================================
    // Company Profile
    // =========================================================================

    pub fn company_profile(&self) -> Option<CompanyProfile> {
        self.get_json(COMPANY_KEY)
    }

    pub fn save_company_profile(&self, profile: &CompanyProfile) -> ClientResult<()> {
        self.set_json(COMPANY_KEY, profile)
    }

    pub fn clear_company_profile(&self) -> ClientResult<()> {
        self.remove_item(COMPANY_KEY)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies `change` to a copy of the entries, writes the copy, then
    /// swaps it in. A failed write leaves the visible entries untouched.
    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> ClientResult<()> {
        let mut entries = self.write();
        let mut next = entries.clone();
        if change(&mut next) {
            self.flush(&next)?;
            *entries = next;
        }
        Ok(())
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_vec_pretty(entries)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, encoded)
            .and_then(|_| std::fs::rename(&tmp, path))
            .map_err(|e| ClientError::Storage(format!("{}: {}", path.display(), e)))
    }
}
