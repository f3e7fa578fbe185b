//! Synchronous page guards.
//!
//! A guard answers immediately from the stored session; the redirect it asks
//! for is carried in [`Access::Denied`] and runs later, so callers can bail
//! out of the guarded action right away.

use std::rc::Rc;

use store::{KeyValueStore, SessionStore};

use crate::config::Timing;
use crate::navigation::{PageContext, RedirectIntent, Routes};
use crate::notify::{NoticeKind, Notifier};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";
pub const ADMIN_REQUIRED_MESSAGE: &str = "Access denied. Admin privileges required.";

/// Result of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(RedirectIntent),
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }

    pub fn redirect(&self) -> Option<&RedirectIntent> {
        match self {
            Access::Granted => None,
            Access::Denied(intent) => Some(intent),
        }
    }
}

/// Access checks against a shared session.
#[derive(Clone)]
pub struct AccessGuard<S> {
    session: SessionStore<S>,
    notifier: Rc<dyn Notifier>,
    page: Rc<dyn PageContext>,
    routes: Routes,
    timing: Timing,
}

impl<S: KeyValueStore> AccessGuard<S> {
    pub fn new(
        session: SessionStore<S>,
        notifier: Rc<dyn Notifier>,
        page: Rc<dyn PageContext>,
        routes: Routes,
        timing: Timing,
    ) -> Self {
        Self {
            session,
            notifier,
            page,
            routes,
            timing,
        }
    }

    /// Deny anonymous visitors and send them to login, returning afterwards
    /// to the page they were on.
    pub fn require_authenticated(&self) -> Access {
        if self.session.is_active() {
            return Access::Granted;
        }
        let location = self.page.location();
        tracing::debug!(page = %location.path, "anonymous visitor sent to login");
        self.notifier.notify(LOGIN_REQUIRED_MESSAGE, NoticeKind::Warning);
        Access::Denied(RedirectIntent::new(
            self.routes.login_url_returning_to(&location),
            self.timing.guard_redirect(),
        ))
    }

    /// Deny everyone but signed-in admins. Non-admins go to the landing page.
    pub fn require_admin(&self) -> Access {
        let access = self.require_authenticated();
        if !access.is_granted() {
            return access;
        }
        if self.session.is_admin() {
            return Access::Granted;
        }
        let location = self.page.location();
        self.notifier.notify(ADMIN_REQUIRED_MESSAGE, NoticeKind::Error);
        Access::Denied(RedirectIntent::new(
            self.routes.landing_url(&location),
            self.timing.guard_redirect(),
        ))
    }
}
