//! # `localStorage` key-value store: browser-side persistence
//!
//! [`LocalStore`] is the [`KeyValueStore`] used on the **web platform**. Slots
//! live in `window.localStorage`, so a session survives reloads and is shared
//! by every tab of the same origin.
//!
//! ## Connection management
//!
//! `LocalStore` is a zero-size handle that looks up `localStorage` on every
//! operation; the browser hands back the same `Storage` object each time.
//!
//! ## Error handling
//!
//! Reads degrade to "absent" when storage is unavailable (private mode,
//! disabled cookies). Writes report the failure, which lets
//! [`crate::SessionStore`] roll back a half-written session.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::kv::{KeyValueStore, StoreError};

/// `window.localStorage`-backed KeyValueStore for the web platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Storage(
        value
            .as_string()
            .unwrap_or_else(|| "localStorage rejected the write".to_string()),
    )
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Storage("localStorage is not available".to_string()))?;
        storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
