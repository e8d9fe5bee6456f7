//! Current-page location, query parameters and redirect targets.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards read the current path to build a `?redirect=` login link, and the
//! login flow reads that parameter back to return the user where they were.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use std::cell::RefCell;

use url::{Url, form_urlencoded};

/// Name of the query parameter carrying the post-login destination.
pub const REDIRECT_PARAM: &str = "redirect";

/// Stand-in origin used to resolve redirect targets.
const REDIRECT_BASE_ORIGIN: &str = "https://storefront.invalid/";

pub trait Location {
    /// Path plus query string, e.g. `/cart.html?step=2`.
    fn path_and_query(&self) -> String;

    /// Navigate the page to `href`.
    fn assign(&self, href: &str);

    /// Query string including the leading `?`, or empty.
    fn search(&self) -> String {
        let current = self.path_and_query();
        current.find('?').map(|i| current[i..].to_owned()).unwrap_or_default()
    }

    /// First value of query parameter `name`, decoded.
    fn query_param(&self, name: &str) -> Option<String> {
        query_param(&self.search(), name)
    }
}

/// First value of `name` in a query string (leading `?` optional).
/// A bare key (`?debug`) yields `Some("")`.
#[must_use]
pub fn query_param(search: &str, name: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Login view link that returns to `current` after sign-in.
#[must_use]
pub fn login_redirect_href(login_path: &str, current: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(REDIRECT_PARAM, current)
        .finish();
    format!("{login_path}?{query}")
}

/// Accept only same-site absolute paths as redirect destinations.
///
/// URL parsers drop tabs and newlines anywhere in the input, so any control
/// or whitespace character is refused outright. The remaining path must also
/// resolve back onto the page's own origin.
#[must_use]
pub fn safe_redirect_target(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    if raw.chars().any(|c| c.is_ascii_control() || c.is_ascii_whitespace()) {
        return None;
    }
    if !raw.starts_with('/') || raw.starts_with("//") || raw.starts_with("/\\") {
        return None;
    }

    let base = Url::parse(REDIRECT_BASE_ORIGIN).ok()?;
    let resolved = base.join(raw).ok()?;
    (resolved.origin() == base.origin()).then_some(raw)
}

// =============================================================================
// IN-MEMORY LOCATION
// =============================================================================

/// Location that records navigation instead of performing it.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    current: RefCell<String>,
    history: RefCell<Vec<String>>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(path_and_query: &str) -> Self {
        Self { current: RefCell::new(path_and_query.to_owned()), history: RefCell::new(Vec::new()) }
    }

    /// Every href passed to [`Location::assign`], oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Location for MemoryLocation {
    fn path_and_query(&self) -> String {
        self.current.borrow().clone()
    }

    fn assign(&self, href: &str) {
        tracing::info!(%href, "navigate");
        self.history.borrow_mut().push(href.to_owned());
        *self.current.borrow_mut() = href.to_owned();
    }
}
