//! # Token persistence: a key-value capability bound to one key
//!
//! ## [`KeyValueStore`] trait
//!
//! Three synchronous methods, `get`/`set`/`remove`, over string keys and values.
//! Implementations live in sibling modules ([`crate::memory`], [`crate::file_store`],
//! [`crate::local_storage`]). They swallow their own I/O errors: an unreadable or
//! unwritable backend behaves like an empty one, so the session layer simply ends
//! up logged out instead of failing.
//!
//! ## [`TokenStore`]
//!
//! Wraps a [`KeyValueStore`] and a fixed storage key. The session store only ever
//! calls [`load`](TokenStore::load), [`save`](TokenStore::save) and
//! [`clear`](TokenStore::clear). Writes are last-writer-wins; one logical session
//! is active per client instance, so no locking is layered on top.

/// Storage key the bearer token is persisted under unless configured otherwise.
pub const DEFAULT_TOKEN_KEY: &str = "fm_token";

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// The persisted bearer token, stored under a single key.
#[derive(Clone, Debug)]
pub struct TokenStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Bind to [`DEFAULT_TOKEN_KEY`].
    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_TOKEN_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted token. Blank values count as absent.
    pub fn load(&self) -> Option<String> {
        self.store
            .get(&self.key)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn save(&self, token: &str) {
        tracing::debug!(key = %self.key, "persisting session token");
        self.store.set(&self.key, token);
    }

    pub fn clear(&self) {
        tracing::debug!(key = %self.key, "clearing persisted session token");
        self.store.remove(&self.key);
    }
}
