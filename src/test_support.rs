//! In-memory doubles for the browser seams plus a wired [`Harness`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::net::resource::{ObjectUrlError, ObjectUrls};
use crate::net::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::net::types::User;
use crate::state::session::Session;
use crate::util::navigation::Navigator;
use crate::util::storage::{KeyValueStore, MemoryStorage, StorageError};

pub const KEY: &str = "cms_session";

// =============================================================
// Transport
// =============================================================

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl MockTransport {
    pub fn push(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    pub fn push_network_error(&self, message: &str) {
        self.responses.borrow_mut().push_back(Err(TransportError(message.to_owned())));
    }

    /// The next send waits until the returned sender fires or is dropped.
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            if gate.await.is_err() {
                return Err(TransportError("gate dropped".to_owned()));
            }
        }
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no mock response".to_owned())))
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("application/json".to_owned()),
        body: body.to_string().into_bytes(),
    }
}

pub fn bytes_response(status: u16, content_type: &str, body: &[u8]) -> HttpResponse {
    HttpResponse { status, content_type: Some(content_type.to_owned()), body: body.to_vec() }
}

// =============================================================
// Navigation / object URLs / storage
// =============================================================

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_owned());
    }
}

/// Hands out `blob:test/{n}` and tracks which are still live.
#[derive(Default)]
pub struct CountingObjectUrls {
    created: Cell<usize>,
    live: RefCell<Vec<String>>,
    revoked: RefCell<Vec<String>>,
    fail_next: Cell<bool>,
}

impl CountingObjectUrls {
    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn live(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.borrow().clone()
    }

    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }
}

impl ObjectUrls for CountingObjectUrls {
    fn create(&self, _bytes: &[u8], _content_type: Option<&str>) -> Result<String, ObjectUrlError> {
        if self.fail_next.replace(false) {
            return Err(ObjectUrlError("refused".to_owned()));
        }
        let n = self.created.get() + 1;
        self.created.set(n);
        let url = format!("blob:test/{n}");
        self.live.borrow_mut().push(url.clone());
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        self.live.borrow_mut().retain(|u| u != url);
        self.revoked.borrow_mut().push(url.to_owned());
    }
}

/// Storage whose writes always fail (quota exceeded, private mode).
#[derive(Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
}

impl KeyValueStore for FailingStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("quota exceeded".to_owned()))
    }

    fn remove_item(&self, key: &str) {
        self.inner.remove_item(key);
    }
}

pub fn sample_user() -> User {
    User {
        id: "42".to_owned(),
        email: "editor@shop.test".to_owned(),
        name: "Eddie Editor".to_owned(),
        role: "EDITOR".to_owned(),
        avatar: Some("eddie.png".to_owned()),
    }
}

// =============================================================
// Harness
// =============================================================

pub struct Harness {
    pub storage: Rc<MemoryStorage>,
    pub transport: Rc<MockTransport>,
    pub navigator: Rc<RecordingNavigator>,
    pub urls: Rc<CountingObjectUrls>,
    pub context: AppContext,
}

impl Harness {
    /// Fully wired context over fresh doubles; not hydrated yet.
    pub fn new() -> Self {
        let config = ClientConfig {
            api_base: "http://api.test".to_owned(),
            session_key: KEY.to_owned(),
            login_route: "/login".to_owned(),
            ..ClientConfig::default()
        };
        let storage = Rc::new(MemoryStorage::new());
        let transport = Rc::new(MockTransport::default());
        let navigator = Rc::new(RecordingNavigator::default());
        let urls = Rc::new(CountingObjectUrls::default());
        let context = AppContext::new(config, storage.clone(), transport.clone(), navigator.clone(), urls.clone());
        Self { storage, transport, navigator, urls, context }
    }

    /// Empty storage, hydrated.
    pub fn hydrated() -> Self {
        let h = Self::new();
        h.context.store.hydrate();
        h
    }

    /// `session` persisted under [`KEY`], then hydrated.
    pub fn with_session(session: &Session) -> Self {
        let h = Self::new();
        h.storage.set_item(KEY, &session.to_blob().unwrap()).unwrap();
        h.context.store.hydrate();
        h
    }
}
