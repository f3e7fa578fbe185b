//! Dioxus bindings for the review-site client: toasts, redirects and the
//! session context every page reads from.

mod browser;
pub use browser::{enforce, follow, BrowserPage};

mod platform;
pub use platform::{make_auth, platform_store, Auth, PlatformStore};

mod session;
pub use session::{
    complete_sign_in, error_notice, report_error, use_auth, use_session, LogoutButton, SessionProvider,
    SessionState,
};

mod toast;
pub use toast::{use_toasts, Toast, ToastHost, ToastNotifier, ToastQueue, TOAST_LIFETIME};
