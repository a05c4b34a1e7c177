//! Token persistence for the FindMe client.
//!
//! The session layer never touches a concrete storage backend. It goes through
//! [`KeyValueStore`], wrapped by [`TokenStore`] which binds the one fixed key the
//! bearer token lives under.

pub mod token;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageStore;

pub use token::{KeyValueStore, TokenStore, DEFAULT_TOKEN_KEY};
