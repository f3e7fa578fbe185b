use serde::Serialize;
use serde_json::Value;
use store::{KeyValueStore, SessionStore, StoreError, UserProfile};

use crate::client::ApiClient;
use crate::error::{ClientError, GENERIC_ERROR_MESSAGE};
use crate::models::{Credentials, Registration};
use crate::navigation::{is_local_target, RedirectIntent, REDIRECT_PARAM};
use crate::notify::NoticeKind;
use crate::transport::Transport;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const PROFILE_PATH: &str = "/auth/profile";

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful! Welcome!";
pub const LOGOUT_MESSAGE: &str = "You have been logged out.";
pub const PROFILE_UPDATED_MESSAGE: &str = "Profile updated.";

/// A freshly established session and where to go next.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub user: UserProfile,
    pub redirect: RedirectIntent,
}

/// Result of re-validating the stored session against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCheck {
    /// The backend still accepts the token; the stored user was refreshed.
    Valid(UserProfile),
    /// Nothing stored, the backend was not contacted.
    NoSession,
    /// The check failed and the session was cleared.
    Invalidated { redirect: Option<RedirectIntent> },
}

impl SessionCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SessionCheck::Valid(_))
    }

    pub fn redirect(&self) -> Option<&RedirectIntent> {
        match self {
            SessionCheck::Invalidated { redirect } => redirect.as_ref(),
            _ => None,
        }
    }
}

/// Login, registration, logout and profile refresh on top of an [`ApiClient`].
#[derive(Clone)]
pub struct AuthFlow<T, S> {
    client: ApiClient<T, S>,
}

impl<T: Transport, S: KeyValueStore> AuthFlow<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<T, S> {
        &self.client
    }

    pub fn session(&self) -> &SessionStore<S> {
        self.client.session()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.session().current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_active()
    }

    pub fn is_admin(&self) -> bool {
        self.session().is_admin()
    }

    /// Sign in. Goes to the page's `redirect` parameter afterwards when it
    /// names a local page, otherwise to the landing page.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, ClientError> {
        let payload = self.client.post(LOGIN_PATH, credentials).await?;
        let user = self.establish(&payload)?;
        tracing::info!(user_id = %user.id, role = %user.role, "logged in");
        self.client
            .notifier()
            .notify(LOGIN_SUCCESS_MESSAGE, NoticeKind::Success);

        let location = self.client.page().location();
        let to = location
            .query_param(REDIRECT_PARAM)
            .filter(|target| is_local_target(target))
            .unwrap_or_else(|| self.client.routes().landing_url(&location));
        Ok(AuthOutcome {
            user,
            redirect: RedirectIntent::new(to, self.client.timing().login_redirect()),
        })
    }

    /// Create an account and sign in. Always goes to the landing page.
    pub async fn register(&self, registration: &Registration) -> Result<AuthOutcome, ClientError> {
        let payload = self.client.post(REGISTER_PATH, registration).await?;
        let user = self.establish(&payload)?;
        tracing::info!(user_id = %user.id, "registered");
        self.client
            .notifier()
            .notify(REGISTER_SUCCESS_MESSAGE, NoticeKind::Success);

        let location = self.client.page().location();
        Ok(AuthOutcome {
            user,
            redirect: RedirectIntent::new(
                self.client.routes().landing_url(&location),
                self.client.timing().login_redirect(),
            ),
        })
    }

    /// Forget the session locally. The backend keeps no server-side session.
    pub fn logout(&self) -> RedirectIntent {
        self.session().clear();
        tracing::info!("logged out");
        self.client.notifier().notify(LOGOUT_MESSAGE, NoticeKind::Info);

        let location = self.client.page().location();
        RedirectIntent::new(
            self.client.routes().landing_url(&location),
            self.client.timing().logout_redirect(),
        )
    }

    /// Re-validate the stored session with `GET /auth/profile`.
    ///
    /// Any failure clears the session: an unreachable backend is treated the
    /// same as a rejected token.
    pub async fn refresh_from_server(&self) -> SessionCheck {
        let Some(token) = self.session().token() else {
            return SessionCheck::NoSession;
        };
        if !self.session().is_active() {
            return SessionCheck::NoSession;
        }

        let result = match self.client.get(PROFILE_PATH).await {
            Ok(payload) => self.store_profile(&token, &payload),
            Err(e) => Err(e),
        };
        match result {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "session still valid");
                SessionCheck::Valid(user)
            }
            Err(e) => {
                match &e {
                    ClientError::Network { detail } => {
                        tracing::warn!("profile check could not reach the backend: {}", detail)
                    }
                    ClientError::Unauthorized { .. } | ClientError::Api { .. } => {
                        tracing::info!("profile check rejected: {}", e)
                    }
                    other => tracing::warn!("profile check failed: {}", other),
                }
                self.session().clear();
                SessionCheck::Invalidated {
                    redirect: e.redirect().cloned(),
                }
            }
        }
    }

    /// `PUT /auth/profile`, keeping the current token.
    pub async fn update_profile<B: Serialize + ?Sized>(
        &self,
        changes: &B,
    ) -> Result<UserProfile, ClientError> {
        let token = self.session().token().ok_or(ClientError::NotAuthenticated)?;
        if !self.session().is_active() {
            return Err(ClientError::NotAuthenticated);
        }

        let payload = self.client.put(PROFILE_PATH, changes).await?;
        let user = self.store_profile(&token, &payload)?;
        self.client
            .notifier()
            .notify(PROFILE_UPDATED_MESSAGE, NoticeKind::Success);
        Ok(user)
    }

    /// Persist the `{ user, token }` pair of a login/register response.
    fn establish(&self, payload: &Value) -> Result<UserProfile, ClientError> {
        ensure_success(payload)?;
        let body = payload_body(payload);
        let user = body
            .get("user")
            .filter(|u| u.is_object())
            .ok_or(ClientError::MalformedResponse("user"))?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::MalformedResponse("token"))?;
        save_user(self.session(), token, user)
    }

    /// Persist the user of a profile response under an existing token.
    fn store_profile(&self, token: &str, payload: &Value) -> Result<UserProfile, ClientError> {
        ensure_success(payload)?;
        let body = payload_body(payload);
        let user = body
            .get("user")
            .filter(|u| u.is_object())
            .unwrap_or(body);
        if !user.is_object() {
            return Err(ClientError::MalformedResponse("user"));
        }
        save_user(self.session(), token, user)
    }
}

/// A 2xx answer that still says `success: false` is a failure.
fn ensure_success(payload: &Value) -> Result<(), ClientError> {
    if payload.get("success").and_then(Value::as_bool) == Some(false) {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_ERROR_MESSAGE);
        return Err(ClientError::Api {
            status: 200,
            message: message.to_string(),
        });
    }
    Ok(())
}

/// The `data` object of an envelope, or the payload itself.
fn payload_body(payload: &Value) -> &Value {
    payload
        .get("data")
        .filter(|d| d.is_object())
        .unwrap_or(payload)
}

fn save_user<S: KeyValueStore>(
    session: &SessionStore<S>,
    token: &str,
    user: &Value,
) -> Result<UserProfile, ClientError> {
    session.save(token, user).map_err(|e| match e {
        StoreError::InvalidUser(_) => ClientError::MalformedResponse("user"),
        other => ClientError::Store(other),
    })
}
