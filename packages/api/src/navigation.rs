//! # Page locations, site routes and redirect intents
//!
//! The site is a set of static pages: the landing page sits at the root and
//! every other page, including login and register, lives under a `pages/`
//! directory. Links are relative, so where the login or landing page is
//! depends on where the current page sits:
//!
//! | Current page | Login | Landing |
//! |--------------|-------|---------|
//! | `/index.html`, `/` | `pages/login.html` | `index.html` |
//! | `/pages/restaurant.html` | `login.html` | `../index.html` |
//!
//! Navigation itself belongs to the UI layer. This crate only describes it as
//! a [`RedirectIntent`], which the caller executes after the given delay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Query parameter the login page reads its return target from.
pub const REDIRECT_PARAM: &str = "redirect";

/// The page currently shown, as path and raw query string (without `?`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub path: String,
    pub query: String,
}

impl PageLocation {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            path: path.into(),
            query: query.trim_start_matches('?').to_string(),
        }
    }

    /// Split `"/pages/x.html?id=3#top"` into path and query.
    pub fn parse(path_and_query: &str) -> Self {
        let without_fragment = path_and_query
            .split_once('#')
            .map_or(path_and_query, |(head, _)| head);
        match without_fragment.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(without_fragment, ""),
        }
    }

    /// Decoded value of the first occurrence of `name` in the query string.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query
            .split('&')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key)? == name).then(|| decode_component(value))?
            })
            .next()
    }

    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

/// Source of the current page location.
pub trait PageContext {
    fn location(&self) -> PageLocation;
}

/// A fixed location, used for server-side rendering and in tests.
impl PageContext for PageLocation {
    fn location(&self) -> PageLocation {
        self.clone()
    }
}

/// Navigate to `to` once `after` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectIntent {
    pub to: String,
    pub after: Duration,
}

impl RedirectIntent {
    pub fn new(to: impl Into<String>, after: Duration) -> Self {
        Self {
            to: to.into(),
            after,
        }
    }
}

/// Page names of the static site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routes {
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,
    #[serde(default = "default_login_page")]
    pub login_page: String,
    #[serde(default = "default_register_page")]
    pub register_page: String,
    #[serde(default = "default_landing_page")]
    pub landing_page: String,
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_login_page() -> String {
    "login.html".to_string()
}

fn default_register_page() -> String {
    "register.html".to_string()
}

fn default_landing_page() -> String {
    "index.html".to_string()
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            login_page: default_login_page(),
            register_page: default_register_page(),
            landing_page: default_landing_page(),
        }
    }
}

impl Routes {
    /// Whether `location` sits under the pages directory.
    pub fn is_nested(&self, location: &PageLocation) -> bool {
        location.path.contains(&format!("/{}/", self.pages_dir))
    }

    pub fn is_auth_page(&self, location: &PageLocation) -> bool {
        let name = location.file_name();
        name == self.login_page || name == self.register_page
    }

    pub fn is_landing_page(&self, location: &PageLocation) -> bool {
        if self.is_nested(location) {
            return false;
        }
        let name = location.file_name();
        name.is_empty() || name == self.landing_page
    }

    pub fn login_url(&self, location: &PageLocation) -> String {
        if self.is_nested(location) {
            self.login_page.clone()
        } else {
            format!("{}/{}", self.pages_dir, self.login_page)
        }
    }

    /// Login URL that sends the user back to `location` afterwards.
    pub fn login_url_returning_to(&self, location: &PageLocation) -> String {
        format!(
            "{}?{}={}",
            self.login_url(location),
            REDIRECT_PARAM,
            urlencoding::encode(&location.path_and_query())
        )
    }

    pub fn landing_url(&self, location: &PageLocation) -> String {
        if self.is_nested(location) {
            format!("../{}", self.landing_page)
        } else {
            self.landing_page.clone()
        }
    }
}

/// Only same-site targets are followed after login: no scheme and no
/// protocol-relative `//host` form. Browsers drop tabs and newlines from
/// URLs and read `\` as `/`, so the check runs on the normalized form.
pub fn is_local_target(target: &str) -> bool {
    let target: String = target
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .map(|c| if c == '\\' { '/' } else { c })
        .collect();
    if target.is_empty() || target.starts_with("//") {
        return false;
    }
    if target.starts_with('/') {
        return true;
    }
    match target.find(':') {
        Some(colon) => target[..colon].contains(['/', '?', '#']),
        None => true,
    }
}
