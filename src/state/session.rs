//! The page's single notion of who is signed in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards, the navigation adapter and the page controller all share one
//! [`SessionCache`]. Only [`SessionCache::refresh`] and
//! [`SessionCache::clear`] write the slot.
//!
//! DESIGN
//! ======
//! The slot always reflects the most recently *completed* refresh or clear.
//! Concurrent refreshes are not coalesced: each makes its own round trip and
//! whichever response lands last wins, even if a later-started refresh
//! already applied. Nothing is held borrowed across an `.await`, so each
//! store is atomic with respect to other flows.
//!
//! ERROR HANDLING
//! ==============
//! A failed refresh (logical or transport) collapses the session to none and
//! never propagates. Transport failures are already reported at `warn` by the
//! request client, so the cache only traces them at `debug`.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::net::api;
use crate::net::request::RequestClient;
use crate::net::types::Identity;

type Listener = Rc<dyn Fn(Option<&Identity>)>;

struct Inner {
    client: RequestClient,
    api_base: String,
    slot: RefCell<Option<Rc<Identity>>>,
    listeners: RefCell<Vec<Listener>>,
    started: Cell<u64>,
    applied: Cell<u64>,
}

/// Cheap-to-clone handle on the shared session slot.
#[derive(Clone)]
pub struct SessionCache {
    inner: Rc<Inner>,
}

impl SessionCache {
    /// Empty cache; nothing is fetched until [`SessionCache::refresh`].
    #[must_use]
    pub fn new(client: RequestClient, api_base: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(Inner {
                client,
                api_base: api_base.into(),
                slot: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                started: Cell::new(0),
                applied: Cell::new(0),
            }),
        }
    }

    /// Current snapshot. Never suspends.
    #[must_use]
    pub fn get(&self) -> Option<Rc<Identity>> {
        self.inner.slot.borrow().clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner.slot.borrow().is_some()
    }

    /// Ask the server who is signed in and store the answer.
    ///
    /// Resolves `true` when an identity was stored, `false` otherwise.
    pub async fn refresh(&self) -> bool {
        let seq = self.inner.started.get() + 1;
        self.inner.started.set(seq);
        tracing::debug!(seq, "session refresh started");

        let identity = match api::fetch_user_info(&self.inner.client, &self.inner.api_base).await {
            Ok(envelope) if envelope.success => {
                if envelope.data.is_none() {
                    tracing::warn!(seq, "session refresh succeeded without identity data");
                }
                envelope.data
            }
            Ok(envelope) => {
                tracing::debug!(seq, message = envelope.message_or(""), "no active session");
                None
            }
            Err(e) => {
                tracing::debug!(seq, error = %e, "session refresh failed");
                None
            }
        };

        if seq < self.inner.applied.get() {
            tracing::debug!(seq, newer = self.inner.applied.get(), "out-of-order refresh overwrote newer result");
        }
        self.inner.applied.set(self.inner.applied.get().max(seq));

        let signed_in = identity.is_some();
        self.store(identity.map(Rc::new));
        signed_in
    }

    /// Forget the current identity.
    pub fn clear(&self) {
        self.store(None);
    }

    /// Run `listener` after every completed refresh and every clear.
    pub fn subscribe(&self, listener: impl Fn(Option<&Identity>) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn store(&self, identity: Option<Rc<Identity>>) {
        let previous = self.inner.slot.replace(identity.clone());
        match (&previous, &identity) {
            (None, Some(current)) => tracing::info!(username = %current.username, "signed in"),
            (Some(prev), None) => tracing::info!(username = %prev.username, "signed out"),
            _ => {}
        }

        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(identity.as_deref());
        }
    }
}
