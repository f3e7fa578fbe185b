//! Storage trait shared by every session backend.

use thiserror::Error;

/// Errors raised while persisting a session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("refusing to save a session with an empty token")]
    EmptyToken,
    #[error("user record is not a valid profile: {0}")]
    InvalidUser(#[from] serde_json::Error),
}

/// A synchronous string key-value store.
///
/// Reads never fail: an unreadable slot is reported as absent. Writes surface
/// their error so callers can keep the token/user pair consistent.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}
