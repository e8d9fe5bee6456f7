//! Networking: wire types, the request primitive and its transports.
//!
//! SYSTEM CONTEXT
//! ==============
//! `request` is the generic authenticated call every higher layer uses,
//! `api` wraps the account endpoints, and `types` defines the envelope and
//! identity schema. `http` (native) and `browser` (hydrate) are the two
//! concrete transports.

pub mod api;
#[cfg(feature = "hydrate")]
pub mod browser;
#[cfg(feature = "native")]
pub mod http;
pub mod request;
pub mod types;
