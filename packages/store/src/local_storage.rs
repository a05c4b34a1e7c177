//! # Browser localStorage store
//!
//! [`LocalStorageStore`] is the [`KeyValueStore`] used on the **web platform**.
//! It reads and writes `window.localStorage` through `web-sys`. Every call looks
//! the storage object up again; browsers can revoke access (private mode, quota),
//! and a missing storage simply behaves like an empty one.

use web_sys::Storage;

use crate::token::KeyValueStore;

/// `window.localStorage`-backed KeyValueStore for the web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match self.storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    tracing::warn!(key, "localStorage rejected write");
                }
            }
            None => tracing::warn!("localStorage unavailable"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}
