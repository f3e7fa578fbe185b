//! # Client configuration: `client.toml`
//!
//! Where the backend lives, which storage slots hold the session, how the
//! static site is laid out and how long to wait before redirecting.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3000/api/v1"
//!
//! [session]
//! token_key = "authToken"
//! user_key = "user"
//!
//! [routes]
//! pages_dir = "pages"
//! login_page = "login.html"
//! register_page = "register.html"
//! landing_page = "index.html"
//!
//! [timing]
//! login_redirect_ms = 1000
//! logout_redirect_ms = 1000
//! session_expired_redirect_ms = 2000
//! guard_redirect_ms = 1500
//! ```
//!
//! Every section defaults, so a missing or empty file is equivalent to the
//! default configuration. On native targets [`ClientConfig::from_env`] also
//! honours `API_CLIENT_CONFIG` (path to a TOML file) and `API_BASE_URL`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use store::SessionKeys;
use thiserror::Error;

use crate::navigation::Routes;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level client configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionKeys,
    #[serde(default)]
    pub routes: Routes,
    #[serde(default)]
    pub timing: Timing,
}

/// Backend location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root every request path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:3000/api/v1".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Delays before redirects fire, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    #[serde(default = "default_login_redirect_ms")]
    pub login_redirect_ms: u64,
    #[serde(default = "default_logout_redirect_ms")]
    pub logout_redirect_ms: u64,
    #[serde(default = "default_session_expired_redirect_ms")]
    pub session_expired_redirect_ms: u64,
    #[serde(default = "default_guard_redirect_ms")]
    pub guard_redirect_ms: u64,
}

fn default_login_redirect_ms() -> u64 {
    1000
}

fn default_logout_redirect_ms() -> u64 {
    1000
}

fn default_session_expired_redirect_ms() -> u64 {
    2000
}

fn default_guard_redirect_ms() -> u64 {
    1500
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            login_redirect_ms: default_login_redirect_ms(),
            logout_redirect_ms: default_logout_redirect_ms(),
            session_expired_redirect_ms: default_session_expired_redirect_ms(),
            guard_redirect_ms: default_guard_redirect_ms(),
        }
    }
}

impl Timing {
    pub fn login_redirect(&self) -> Duration {
        Duration::from_millis(self.login_redirect_ms)
    }

    pub fn logout_redirect(&self) -> Duration {
        Duration::from_millis(self.logout_redirect_ms)
    }

    pub fn session_expired_redirect(&self) -> Duration {
        Duration::from_millis(self.session_expired_redirect_ms)
    }

    pub fn guard_redirect(&self) -> Duration {
        Duration::from_millis(self.guard_redirect_ms)
    }
}

impl ClientConfig {
    /// Create a config pointing at the given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Builder method to set the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Builder method to set the session storage slots.
    pub fn with_session_keys(mut self, keys: SessionKeys) -> Self {
        self.session = keys;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "client.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&text)?)
    }

    /// Configuration from `.env` and the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match std::env::var("API_CLIENT_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        if let Ok(base_url) = std::env::var("API_BASE_URL") {
            config.api.base_url = base_url;
        }
        Ok(config)
    }
}
