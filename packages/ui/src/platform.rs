//! Shared client constructor for all platforms.
//!
//! Returns an [`api::AuthFlow`] backed by the appropriate [`store::KeyValueStore`]:
//! - **Web** (WASM + `web` feature): `localStorage` via [`store::LocalStore`]
//! - **Desktop / Mobile** (native): filesystem via [`store::FileStore`]

use std::rc::Rc;

use api::{ApiClient, AuthFlow, ClientConfig, Notifier, ReqwestTransport};

use crate::browser::BrowserPage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStore = store::FileStore;

/// The auth flow type every view works with.
pub type Auth = AuthFlow<ReqwestTransport, PlatformStore>;

/// Storage for the session on the current platform.
pub fn platform_store() -> PlatformStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStore::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        store::FileStore::new(session_dir())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn session_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("restaurant-reviews")
        .join("session")
}

#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
fn session_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("session")
}

/// Create a platform-appropriate auth flow reporting through `notifier`.
pub fn make_auth(config: &ClientConfig, notifier: Rc<dyn Notifier>) -> Auth {
    let client = ApiClient::new(
        config,
        ReqwestTransport::new(),
        platform_store(),
        notifier,
        Rc::new(BrowserPage),
    );
    AuthFlow::new(client)
}
