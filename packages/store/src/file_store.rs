//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is a [`KeyValueStore`] that keeps each key in its own file under
//! a base directory. It is used by native front-ends so that a login survives a
//! restart of the process.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>          # file containing the value, e.g. `fm_token`
//! ```
//!
//! Use [`dirs::data_dir()`](https://docs.rs/dirs) joined with `findme` for a
//! platform-appropriate base.

use std::path::PathBuf;

use crate::token::KeyValueStore;

/// Filesystem-backed KeyValueStore for native platforms.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!(base = %self.base.display(), "failed to create store directory: {}", e);
            return;
        }
        if let Err(e) = std::fs::write(self.entry_path(key), value) {
            tracing::warn!(key, "failed to write store entry: {}", e);
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(key, "failed to remove store entry: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenStore;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("findme_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = scratch_dir("reopen");

        let tokens = TokenStore::with_default_key(FileStore::new(dir.clone()));
        tokens.save("token-123");

        // Re-open from same directory
        let reopened = TokenStore::with_default_key(FileStore::new(dir.clone()));
        assert_eq!(reopened.load().as_deref(), Some("token-123"));

        reopened.clear();
        assert!(tokens.load().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unsafe_key_stays_inside_base() {
        let dir = scratch_dir("keys");
        let store = FileStore::new(dir.clone());

        store.set("../escape/key", "v");
        assert!(dir.join(".._escape_key").exists());
        assert_eq!(store.get("../escape/key").as_deref(), Some("v"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory_reads_empty() {
        let dir = scratch_dir("missing");
        let store = FileStore::new(dir);
        assert!(store.get("fm_token").is_none());
        store.remove("fm_token");
    }
}
