//! Error taxonomy of the client layer.
//!
//! The `Display` text of each variant is what the user is shown.

use store::StoreError;
use thiserror::Error;

use crate::navigation::RedirectIntent;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to the server. Please check your connection.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// No response reached the client.
    #[error("{msg}", msg = NETWORK_ERROR_MESSAGE)]
    Network { detail: String },

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend rejected the token. The session has already been cleared;
    /// `redirect` is set when the user was notified and should go to login.
    #[error("{message}")]
    Unauthorized {
        message: String,
        redirect: Option<RedirectIntent>,
    },

    /// The response body was not JSON.
    #[error("{msg}", msg = INVALID_RESPONSE_MESSAGE)]
    Parse { status: u16, detail: String },

    /// Success status, but a required field was missing.
    #[error("Unexpected response from server (missing {0}).")]
    MalformedResponse(&'static str),

    #[error("You need to be logged in to do that.")]
    NotAuthenticated,

    #[error("could not encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// HTTP status, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::Parse { status, .. } => Some(*status),
            ClientError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Redirect the UI should follow for this error.
    pub fn redirect(&self) -> Option<&RedirectIntent> {
        match self {
            ClientError::Unauthorized { redirect, .. } => redirect.as_ref(),
            _ => None,
        }
    }

    /// Whether the client already showed the user a notice for this error.
    pub fn already_notified(&self) -> bool {
        self.redirect().is_some()
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }
}
