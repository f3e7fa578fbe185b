//! Test doubles: a scripted transport and a notifier that records notices.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;
use store::MemoryStore;

use crate::auth::AuthFlow;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::navigation::PageLocation;
use crate::notify::{NoticeKind, Notifier};
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

type Scripted = Result<ApiResponse, TransportError>;

/// Answers requests from a queue and remembers what was sent.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Scripted>>>,
    sent: Rc<RefCell<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn reply(&self, status: u16, body: Value) {
        self.reply_raw(status, &body.to_string());
    }

    pub fn reply_raw(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(ApiResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::Unreachable("connection refused".to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Unreachable("no scripted reply".to_string())))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<(String, NoticeKind)>>,
}

impl RecordingNotifier {
    pub fn take(&self) -> Vec<(String, NoticeKind)> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        self.notices.borrow_mut().push((message.to_string(), kind));
    }
}

/// A client wired to in-memory doubles, as seen from one page.
pub struct Harness {
    pub transport: ScriptedTransport,
    pub storage: MemoryStore,
    pub notices: Rc<RecordingNotifier>,
    pub page: PageLocation,
    pub client: ApiClient<ScriptedTransport, MemoryStore>,
}

impl Harness {
    pub fn at(page: &str) -> Self {
        Self::build(ClientConfig::default(), PageLocation::parse(page))
    }

    pub fn with_base(self, base_url: &str) -> Self {
        Self::build(ClientConfig::new(base_url), self.page)
    }

    fn build(config: ClientConfig, page: PageLocation) -> Self {
        let transport = ScriptedTransport::default();
        let storage = MemoryStore::new();
        let notices = Rc::new(RecordingNotifier::default());
        let client = ApiClient::new(
            &config,
            transport.clone(),
            storage.clone(),
            notices.clone(),
            Rc::new(page.clone()),
        );
        Self {
            transport,
            storage,
            notices,
            page,
            client,
        }
    }

    pub fn flow(&self) -> AuthFlow<ScriptedTransport, MemoryStore> {
        AuthFlow::new(self.client.clone())
    }

    pub fn sign_in(&self, token: &str, user: Value) {
        self.client
            .session()
            .save(token, &user)
            .expect("test session should save");
    }
}
