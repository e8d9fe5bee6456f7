//! Client-side helpers built on top of the session cache.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards, navigation rendering, notices, scheduling and location access are
//! kept free of DOM types so they run natively under test. `browser` holds
//! the hydrate-only adapters that bind them to the page.

#[cfg(feature = "hydrate")]
pub mod browser;
pub mod format;
pub mod guard;
pub mod location;
pub mod nav;
pub mod notify;
pub mod schedule;
