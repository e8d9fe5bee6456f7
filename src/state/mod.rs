//! Page-lifetime client state.

pub mod session;
