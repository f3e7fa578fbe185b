//! Request bodies and the backend's response envelope.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// `{ success, data?, message? }`, the shape most endpoints answer with.
///
/// The client never requires it; use [`crate::ApiClient::send_json`] with
/// `Envelope<T>` where an endpoint is known to follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
