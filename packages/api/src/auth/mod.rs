//! Session lifecycle and access checks.
//!
//! Anonymous → `login`/`register` → Authenticated → `logout` or any 401 →
//! Anonymous.

mod flow;
mod guard;

pub use flow::{
    AuthFlow, AuthOutcome, SessionCheck, LOGIN_PATH, LOGIN_SUCCESS_MESSAGE, LOGOUT_MESSAGE,
    PROFILE_PATH, PROFILE_UPDATED_MESSAGE, REGISTER_PATH, REGISTER_SUCCESS_MESSAGE,
};
pub use guard::{Access, AccessGuard, ADMIN_REQUIRED_MESSAGE, LOGIN_REQUIRED_MESSAGE};
