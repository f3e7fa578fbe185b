//! Page location and redirects for the running app.
//!
//! - **Web** (WASM): reads and sets `window.location`
//! - **Desktop / Mobile** (native): there is no address bar; the location is
//!   the root page and redirects are only logged

use std::time::Duration;

use api::{Access, PageContext, PageLocation, RedirectIntent};
use dioxus::prelude::*;

/// [`PageContext`] backed by the browser's current location.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserPage;

impl PageContext for BrowserPage {
    fn location(&self) -> PageLocation {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let location = window.location();
                let path = location.pathname().unwrap_or_else(|_| "/".to_string());
                let query = location.search().unwrap_or_default();
                return PageLocation::new(path, query);
            }
        }
        PageLocation::new("/", "")
    }
}

/// Execute a redirect once its delay has elapsed. There is no way to cancel it.
pub fn follow(intent: RedirectIntent) {
    spawn(async move {
        sleep(intent.after).await;
        navigate(&intent.to);
    });
}

/// Follow the redirect of a denied [`Access`]. Returns whether the guarded
/// action may go ahead.
pub fn enforce(access: Access) -> bool {
    match access {
        Access::Granted => true,
        Access::Denied(intent) => {
            follow(intent);
            false
        }
    }
}

pub(crate) async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

fn navigate(to: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(to) {
                tracing::error!("Failed to navigate to {}: {:?}", to, e);
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::info!("redirect to {}", to);
    }
}
