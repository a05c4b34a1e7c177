//! Platform-appropriate token store.
//!
//! - **Web** (WASM + `web` feature): `window.localStorage` via [`store::LocalStorageStore`]
//! - **Native**: one file per key under `session.data_dir` via [`store::FileStore`]
//! - WASM without `web`: in-memory only, the token does not survive a reload

use store::{KeyValueStore, TokenStore};

use crate::settings::Settings;

/// Token store bound to the configured storage key.
pub fn make_token_store(settings: &Settings) -> TokenStore<impl KeyValueStore> {
    let key = settings.session.storage_key.as_str();
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        TokenStore::new(store::LocalStorageStore, key)
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        TokenStore::new(store::MemoryStore::new(), key)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        TokenStore::new(store::FileStore::new(settings.session.data_dir.clone()), key)
    }
}
