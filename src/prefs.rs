//! Durable session preferences: theme and logged-in identity.
//!
//! One JSON file per key under the store directory. Values are read once
//! at open and cached behind a shared lock; clones of the store share the
//! cache, so a write is immediately visible to every reader in the
//! process. Last write wins, no transactions.

use crate::types::{Identity, ThemeMode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

const THEME_KEY: &str = "theme";
const USER_KEY: &str = "user";

#[derive(Default)]
struct Cached {
    theme: ThemeMode,
    identity: Option<Identity>,
}

#[derive(Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
    cache: Arc<RwLock<Cached>>,
}

impl PreferenceStore {
    /// Opens a store rooted at `dir`, reading persisted values. A missing
    /// or unparsable theme falls back to light; a missing or unparsable
    /// identity reads as guest.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let cache = Cached {
            theme: read_value(&dir, THEME_KEY).unwrap_or_default(),
            identity: read_value(&dir, USER_KEY),
        };
        Self {
            dir,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn open_default() -> Self {
        let dir = dirs::data_local_dir()
            .map(|data| data.join("newshub"))
            .unwrap_or_else(|| PathBuf::from("cache").join("newshub"));
        Self::open(dir)
    }

    pub fn theme(&self) -> ThemeMode {
        self.cache.read().expect("preference cache poisoned").theme
    }

    pub fn set_theme(&self, theme: ThemeMode) {
        self.cache.write().expect("preference cache poisoned").theme = theme;
        write_value(&self.dir, THEME_KEY, &theme);
    }

    pub fn identity(&self) -> Option<Identity> {
        self.cache
            .read()
            .expect("preference cache poisoned")
            .identity
            .clone()
    }

    pub fn set_identity(&self, identity: Identity) {
        write_value(&self.dir, USER_KEY, &identity);
        self.cache
            .write()
            .expect("preference cache poisoned")
            .identity = Some(identity);
    }

    /// Forgets the logged-in user. Navigation back to the login entry
    /// point is owned by the caller, not by the store.
    pub fn clear_identity(&self) {
        self.cache
            .write()
            .expect("preference cache poisoned")
            .identity = None;
        let path = key_path(&self.dir, USER_KEY);
        if path.exists() {
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!("failed to remove persisted identity: {err}");
            }
        }
    }
}

fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

fn read_value<T: DeserializeOwned>(dir: &Path, key: &str) -> Option<T> {
    let raw = fs::read_to_string(key_path(dir, key)).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Write failures are logged, not surfaced; the in-memory value stays
/// authoritative for the rest of the session.
fn write_value<T: Serialize>(dir: &Path, key: &str, value: &T) {
    if let Err(err) = fs::create_dir_all(dir) {
        tracing::warn!("failed to create preference directory: {err}");
        return;
    }
    match serde_json::to_string(value) {
        Ok(raw) => {
            if let Err(err) = fs::write(key_path(dir, key), raw) {
                tracing::warn!("failed to persist {key}: {err}");
            }
        }
        Err(err) => tracing::warn!("failed to serialize {key}: {err}"),
    }
}
