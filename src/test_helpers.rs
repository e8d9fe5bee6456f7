//! Test doubles shared by the unit test modules.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::app::Storefront;
use crate::config::ClientConfig;
use crate::net::request::{HttpRequest, Transport};
use crate::net::types::{Identity, RequestError, Role};
use crate::util::location::MemoryLocation;
use crate::util::notify::{Notice, NoticeSink};
use crate::util::schedule::VirtualClock;

// =============================================================================
// TRANSPORTS
// =============================================================================

/// Answers requests from a queue of canned replies, recording every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<String, RequestError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn reply_json(&self, value: Value) {
        self.replies.borrow_mut().push_back(Ok(value.to_string()));
    }

    pub fn reply_raw(&self, body: &str) {
        self.replies.borrow_mut().push_back(Ok(body.to_owned()));
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(RequestError::Network(message.to_owned())));
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request recorded")
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, RequestError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Network("no scripted reply".into())))
    }
}

/// Holds each request open until the test releases its gate, so tests decide
/// the order in which concurrent round trips complete.
#[derive(Default)]
pub struct GatedTransport {
    gates: RefCell<VecDeque<oneshot::Receiver<Result<String, RequestError>>>>,
    calls: RefCell<usize>,
}

impl GatedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Register the next request's gate. Gates are consumed in request order.
    pub fn gate(&self) -> oneshot::Sender<Result<String, RequestError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for GatedTransport {
    async fn send(&self, _request: HttpRequest) -> Result<String, RequestError> {
        *self.calls.borrow_mut() += 1;
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(RequestError::Network("gate dropped".into()))),
            None => Err(RequestError::Network("no gate registered".into())),
        }
    }
}

// =============================================================================
// NOTICE SINK
// =============================================================================

#[derive(Default)]
pub struct RecordingSink {
    pub shown: RefCell<Vec<Notice>>,
    pub dismissed: RefCell<Vec<u64>>,
}

impl RecordingSink {
    pub fn texts(&self) -> Vec<String> {
        self.shown.borrow().iter().map(|n| n.text.clone()).collect()
    }
}

impl NoticeSink for RecordingSink {
    fn show(&self, notice: &Notice) {
        self.shown.borrow_mut().push(notice.clone());
    }

    fn dismiss(&self, id: u64) {
        self.dismissed.borrow_mut().push(id);
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn alice() -> Identity {
    Identity::new("alice", Role::User)
}

pub fn bob() -> Identity {
    Identity::new("bob", Role::Admin)
}

pub fn identity_reply(identity: &Identity) -> Value {
    json!({ "success": true, "data": identity })
}

pub fn not_logged_in_reply() -> Value {
    json!({ "success": false, "message": "not logged in" })
}

/// A fully wired page on a virtual clock and in-memory location.
pub struct Harness {
    pub storefront: Storefront,
    pub clock: Rc<VirtualClock>,
    pub location: Rc<MemoryLocation>,
    pub sink: Rc<RecordingSink>,
}

pub fn harness(transport: Rc<dyn Transport>, href: &str) -> Harness {
    let clock = Rc::new(VirtualClock::new());
    let location = Rc::new(MemoryLocation::new(href));
    let sink = Rc::new(RecordingSink::default());
    let storefront = Storefront::new(
        ClientConfig::default(),
        transport,
        clock.clone(),
        location.clone(),
        sink.clone(),
    );
    Harness { storefront, clock, location, sink }
}
