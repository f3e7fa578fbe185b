//! Session context and hooks for the UI.

use std::rc::Rc;

use api::{AuthOutcome, ClientConfig, ClientError, NoticeKind, Notifier, SessionCheck, UserProfile};
use dioxus::prelude::*;

use crate::browser::follow;
use crate::platform::{make_auth, Auth};
use crate::toast::{ToastHost, ToastNotifier, ToastQueue};

/// Session state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    /// True until the stored session has been checked with the backend.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn signed_in(user: UserProfile) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    /// State to show after a failed call, or `None` when it stays as is.
    /// A 401 means the client already dropped the stored session.
    pub fn after_error(&self, err: &ClientError) -> Option<Self> {
        (err.status() == Some(401) && self.user.is_some()).then(Self::signed_out)
    }
}

/// Get the current session state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Get the auth flow shared by the whole app.
pub fn use_auth() -> Auth {
    use_context::<Auth>()
}

/// Provider component that owns the client, the session state and the toasts.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn SessionProvider(config: ClientConfig, children: Element) -> Element {
    let toasts = use_signal(ToastQueue::default);
    use_context_provider(|| toasts);

    let auth = use_hook(|| make_auth(&config, Rc::new(ToastNotifier::new(toasts))));
    use_context_provider(|| auth.clone());

    // Show what is stored right away, then confirm it with the backend
    let mut session = use_signal(|| SessionState {
        user: auth.current_user(),
        loading: true,
    });
    use_context_provider(|| session);

    let _ = use_resource(move || {
        let auth = auth.clone();
        async move {
            let check = auth.refresh_from_server().await;
            if let Some(intent) = check.redirect() {
                follow(intent.clone());
            }
            session.set(match check {
                SessionCheck::Valid(user) => SessionState::signed_in(user),
                _ => SessionState::signed_out(),
            });
        }
    });

    rsx! {
        {children}
        ToastHost {}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let auth = use_auth();
    let mut session = use_session();

    let onclick = move |_| {
        let intent = auth.logout();
        session.set(SessionState::signed_out());
        follow(intent);
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}

/// Text to show for a failed call, or `None` when the client already told
/// the user (an expired session).
pub fn error_notice(err: &ClientError) -> Option<String> {
    if err.already_notified() {
        None
    } else {
        Some(err.to_string())
    }
}

/// Publish a successful login or registration and follow its redirect.
pub fn complete_sign_in(outcome: AuthOutcome, mut session: Signal<SessionState>) {
    session.set(SessionState::signed_in(outcome.user));
    follow(outcome.redirect);
}

/// Show the one notification a failed call deserves, sign the view out when
/// the backend rejected the session and follow any redirect it carries.
pub fn report_error(err: &ClientError, notifier: &dyn Notifier, mut session: Signal<SessionState>) {
    if let Some(message) = error_notice(err) {
        notifier.notify(&message, NoticeKind::Error);
    }
    let next = session.peek().after_error(err);
    if let Some(next) = next {
        session.set(next);
    }
    if let Some(intent) = err.redirect() {
        follow(intent.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::RedirectIntent;
    use std::time::Duration;

    #[test]
    fn test_error_notice() {
        let network = ClientError::Network {
            detail: "refused".to_string(),
        };
        assert_eq!(
            error_notice(&network).as_deref(),
            Some("Unable to connect to the server. Please check your connection.")
        );

        let bad_login = ClientError::Unauthorized {
            message: "Invalid email or password".to_string(),
            redirect: None,
        };
        assert_eq!(error_notice(&bad_login).as_deref(), Some("Invalid email or password"));

        let expired = ClientError::Unauthorized {
            message: "jwt expired".to_string(),
            redirect: Some(RedirectIntent::new("login.html", Duration::from_secs(2))),
        };
        assert_eq!(error_notice(&expired), None);
    }

    fn user() -> UserProfile {
        serde_json::from_value(serde_json::json!({"id": 1, "email": "a@b.com"})).unwrap()
    }

    #[test]
    fn test_unauthorized_signs_out() {
        let state = SessionState::signed_in(user());

        // No redirect on the landing page, the view still has to drop the user
        let expired = ClientError::Unauthorized {
            message: "jwt expired".to_string(),
            redirect: None,
        };
        assert_eq!(state.after_error(&expired), Some(SessionState::signed_out()));

        let expired_elsewhere = ClientError::Unauthorized {
            message: "jwt expired".to_string(),
            redirect: Some(RedirectIntent::new("login.html", Duration::from_secs(2))),
        };
        assert_eq!(state.after_error(&expired_elsewhere), Some(SessionState::signed_out()));
    }

    #[test]
    fn test_other_errors_keep_session() {
        let state = SessionState::signed_in(user());
        let network = ClientError::Network {
            detail: "refused".to_string(),
        };
        let forbidden = ClientError::Api {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(state.after_error(&network), None);
        assert_eq!(state.after_error(&forbidden), None);

        let expired = ClientError::Unauthorized {
            message: "jwt expired".to_string(),
            redirect: None,
        };
        assert_eq!(SessionState::signed_out().after_error(&expired), None);
    }
}
