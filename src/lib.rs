//! CartFlow storefront client: session cache, access guards and the
//! identity-dependent page chrome.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page keeps one in-memory answer to "who is signed in", synchronized
//! with the server through `GET {api}/user/info`. Guards gate protected
//! actions on it and the navbar re-renders whenever it changes. The server
//! remains the authority for every access decision.
//!
//! The same core runs in two hosts: the browser (`hydrate`) on `fetch`,
//! `setTimeout` and `window.location`, and natively (`native`) on `reqwest`
//! with a virtual clock, which backs the `cartflow` CLI and the tests.

pub mod app;
pub mod config;
pub mod net;
pub mod state;
pub mod util;
#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
