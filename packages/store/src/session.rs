//! # Session store
//!
//! [`SessionStore`] owns the two storage slots that make up a client session:
//! the bearer token and the serialised [`UserProfile`]. Both are written on
//! login, both are removed on logout, and a session only counts as active
//! when both can be read back.
//!
//! The store is a cheap handle around its backend; clone it to share the same
//! session between the HTTP client, the auth flow and the guards. There is no
//! locking across clones: the last write wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kv::{KeyValueStore, StoreError};
use crate::models::{normalize_user, Role, UserProfile};

/// Names of the two storage slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeys {
    #[serde(default = "default_token_key")]
    pub token_key: String,
    #[serde(default = "default_user_key")]
    pub user_key: String,
}

fn default_token_key() -> String {
    "authToken".to_string()
}

fn default_user_key() -> String {
    "user".to_string()
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            user_key: default_user_key(),
        }
    }
}

/// Token + user persisted through a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
    keys: SessionKeys,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S, keys: SessionKeys) -> Self {
        Self { storage, keys }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist a session from a raw backend user record.
    ///
    /// The role is normalized before writing. Replaces any existing session.
    pub fn save(&self, token: &str, user: &Value) -> Result<UserProfile, StoreError> {
        if token.is_empty() {
            return Err(StoreError::EmptyToken);
        }
        let profile = normalize_user(user)?;
        self.write(token, &profile)?;
        Ok(profile)
    }

    /// Persist a session for an already-normalized profile.
    pub fn save_profile(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        if token.is_empty() {
            return Err(StoreError::EmptyToken);
        }
        self.write(token, profile)
    }

    fn write(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let blob = serde_json::to_string(profile)?;
        self.storage.set(&self.keys.token_key, token)?;
        if let Err(e) = self.storage.set(&self.keys.user_key, &blob) {
            // Never leave a token without its user.
            self.storage.remove(&self.keys.token_key);
            return Err(e);
        }
        tracing::debug!(user_id = %profile.id, role = %profile.role, "session saved");
        Ok(())
    }

    /// Remove token and user. Safe to call when no session exists.
    pub fn clear(&self) {
        self.storage.remove(&self.keys.token_key);
        self.storage.remove(&self.keys.user_key);
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get(&self.keys.token_key)
            .filter(|t| !t.is_empty())
    }

    /// The stored user, or `None` when absent or unreadable.
    pub fn current(&self) -> Option<UserProfile> {
        let blob = self.storage.get(&self.keys.user_key)?;
        let parsed = serde_json::from_str::<Value>(&blob).and_then(|raw| normalize_user(&raw));
        match parsed {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("ignoring corrupt stored user: {}", e);
                None
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some() && self.current().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.token().is_some() && self.current().is_some_and(|u| u.role == Role::Admin)
    }
}
