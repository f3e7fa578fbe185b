//! # Client-side session persistence
//!
//! Holds the signed-in user's token and profile between page loads.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`kv`] | The synchronous [`KeyValueStore`] trait every backend implements |
//! | [`models`] | [`UserProfile`], [`Role`] and role-field normalization |
//! | [`session`] | [`SessionStore`], the token + user pair with its invariants |
//!
//! Backends: [`MemoryStore`] (tests, fallback), [`FileStore`] (desktop and
//! mobile) and, on `wasm32` with the `web` feature, [`LocalStore`] over the
//! browser's `localStorage`.

pub mod kv;
pub mod models;
pub mod session;

mod memory;
pub use memory::MemoryStore;

mod file_store;
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStore;

pub use kv::{KeyValueStore, StoreError};
pub use models::{Role, UserId, UserProfile};
pub use session::{SessionKeys, SessionStore};
