//! # API crate: REST client and session layer for the review site
//!
//! Everything a page needs to talk to the backend and know who is signed in.
//! View code only depends on the contracts here; rendering, toasts and actual
//! navigation are supplied by the caller through two seams, [`Notifier`] and
//! [`PageContext`], and by executing the [`RedirectIntent`]s this crate hands
//! back.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`]: builds requests, attaches the bearer token, classifies responses, expires the session on 401 |
//! | [`transport`] | [`Transport`] seam and the `reqwest`-backed [`ReqwestTransport`] |
//! | [`auth`] | [`AuthFlow`] (login, register, logout, profile refresh/update) and [`AccessGuard`] |
//! | [`navigation`] | [`PageLocation`], [`Routes`] and [`RedirectIntent`] |
//! | [`notify`] | [`Notifier`] seam and the headless [`TracingNotifier`] |
//! | [`config`] | [`ClientConfig`], loaded from TOML and the environment |
//! | [`models`] | Request bodies and the backend's response envelope |
//! | [`error`] | [`ClientError`] taxonomy |

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::{Access, AccessGuard, AuthFlow, AuthOutcome, SessionCheck};
pub use client::{ApiClient, RequestDescriptor};
pub use config::{ClientConfig, ConfigError, Timing};
pub use error::ClientError;
pub use models::{Credentials, Envelope, Registration};
pub use navigation::{PageContext, PageLocation, RedirectIntent, Routes};
pub use notify::{NoticeKind, Notifier, TracingNotifier};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport, TransportError};

pub use store::{KeyValueStore, MemoryStore, Role, SessionKeys, SessionStore, UserProfile};
