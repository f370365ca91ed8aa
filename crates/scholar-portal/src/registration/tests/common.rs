use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::PortalApi;
use crate::domain::DocumentFile;
use crate::forms::RegistrationForm;
use crate::registration::RegistrationOrchestrator;
use crate::status::MemoryStatusSink;
use crate::transport::{ApiRequest, HttpTransport, Method, RawResponse, TransportError};

pub(super) const BASE: &str = "http://portal.test";
pub(super) const STORAGE: &str = "https://storage.test/uploads";

pub(super) fn api_url(path: &str) -> String {
    format!("{BASE}{path}")
}

pub(super) fn storage_url(document_id: u32) -> String {
    format!("{STORAGE}/{document_id}")
}

type Reply = Result<RawResponse, TransportError>;

struct Route {
    method: Method,
    url: String,
    replies: VecDeque<Reply>,
}

/// Fake transport answering from per-route reply queues and recording every request.
///
/// The last reply on a route repeats once the queue is down to one entry.
/// Unknown routes answer `404 {"detail": "Not Found"}`.
#[derive(Default)]
pub(super) struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<ApiRequest>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedTransport {
    /// Append a reply to a route's queue.
    pub(super) fn on(self, method: Method, url: &str, reply: RawResponse) -> Self {
        self.push(method, url, Ok(reply), false);
        self
    }

    /// Replace a route's queue with a single reply.
    pub(super) fn respond(self, method: Method, url: &str, reply: RawResponse) -> Self {
        self.push(method, url, Ok(reply), true);
        self
    }

    pub(super) fn fail(self, method: Method, url: &str, error: TransportError) -> Self {
        self.push(method, url, Err(error), true);
        self
    }

    /// Hold the first request until the gate is notified.
    pub(super) fn gated(self, gate: Arc<Notify>) -> Self {
        *self.gate.lock().expect("gate mutex") = Some(gate);
        self
    }

    fn push(&self, method: Method, url: &str, reply: Reply, replace: bool) {
        let mut routes = self.routes.lock().expect("routes mutex");
        match routes
            .iter_mut()
            .find(|route| route.method == method && route.url == url)
        {
            Some(route) => {
                if replace {
                    route.replies.clear();
                }
                route.replies.push_back(reply);
            }
            None => routes.push(Route {
                method,
                url: url.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
    }

    pub(super) fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().expect("calls mutex").clone()
    }

    pub(super) fn call_log(&self) -> Vec<(Method, String)> {
        self.calls()
            .into_iter()
            .map(|request| (request.method, request.url))
            .collect()
    }

    pub(super) fn count(&self, method: Method, url: &str) -> usize {
        self.calls()
            .iter()
            .filter(|request| request.method == method && request.url == url)
            .count()
    }

    pub(super) fn last_call_to(&self, method: Method, url: &str) -> ApiRequest {
        self.calls()
            .into_iter()
            .rev()
            .find(|request| request.method == method && request.url == url)
            .unwrap_or_else(|| panic!("no {method} call to {url}"))
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let (method, url) = (request.method, request.url.clone());
        self.calls.lock().expect("calls mutex").push(request);

        let gate = self.gate.lock().expect("gate mutex").take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut routes = self.routes.lock().expect("routes mutex");
        let Some(route) = routes
            .iter_mut()
            .find(|route| route.method == method && route.url == url)
        else {
            return Ok(RawResponse::new(404, r#"{"detail": "Not Found"}"#));
        };

        if route.replies.len() > 1 {
            route.replies.pop_front().expect("queue has replies")
        } else {
            route
                .replies
                .front()
                .cloned()
                .expect("route has at least one reply")
        }
    }
}

/// Portal and storage answering a complete, successful registration.
pub(super) fn happy_transport() -> ScriptedTransport {
    ScriptedTransport::default()
        .on(
            Method::Post,
            &api_url("/api/auth/register"),
            RawResponse::new(
                200,
                r#"{"id": 1, "email": "ada@example.com", "full_name": "Ada Lovelace", "role": "client"}"#,
            ),
        )
        .on(
            Method::Post,
            &api_url("/api/auth/login"),
            RawResponse::new(
                200,
                r#"{"access_token": "tok-123", "refresh_token": "ref-456", "token_type": "bearer"}"#,
            ),
        )
        .on(
            Method::Post,
            &api_url("/api/applicants/"),
            RawResponse::new(
                200,
                r#"{"applicant_id": 7, "bundle_id": 11, "first_name": "Ada", "last_name": "Lovelace", "status": "pending"}"#,
            ),
        )
        .on(
            Method::Post,
            &api_url("/api/bundles/11/documents/initiate"),
            RawResponse::new(
                200,
                format!(
                    r#"{{"document_id": 21, "upload_url": "{}", "key": "uploads/1/transcript-key", "content_type": "application/pdf"}}"#,
                    storage_url(21)
                ),
            ),
        )
        .on(
            Method::Post,
            &api_url("/api/bundles/11/documents/initiate"),
            RawResponse::new(
                200,
                format!(
                    r#"{{"document_id": 22, "upload_url": "{}", "key": "uploads/1/degree-key", "content_type": "image/png"}}"#,
                    storage_url(22)
                ),
            ),
        )
        .on(Method::Put, &storage_url(21), RawResponse::new(200, ""))
        .on(Method::Put, &storage_url(22), RawResponse::new(200, ""))
        .on(
            Method::Post,
            &api_url("/api/documents/21/complete"),
            RawResponse::new(200, r#"{"status": "ok", "document_id": 21}"#),
        )
        .on(
            Method::Post,
            &api_url("/api/documents/22/complete"),
            RawResponse::new(200, r#"{"status": "ok", "document_id": 22}"#),
        )
}

pub(super) fn transcript() -> DocumentFile {
    DocumentFile::new(
        Some("transcript.pdf".to_string()),
        Some("application/pdf".to_string()),
        b"%PDF-1.7 transcript".to_vec(),
    )
}

pub(super) fn degree() -> DocumentFile {
    DocumentFile::new(
        Some("degree.png".to_string()),
        Some("image/png".to_string()),
        b"\x89PNG degree".to_vec(),
    )
}

pub(super) fn form() -> RegistrationForm {
    RegistrationForm {
        first_name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        confirm_email: "ada@example.com".to_string(),
        password: "analytical-engine".to_string(),
        latest_education: "BSc Mathematics".to_string(),
        transcript: Some(transcript()),
        degree: Some(degree()),
    }
}

pub(super) type TestOrchestrator =
    RegistrationOrchestrator<Arc<ScriptedTransport>, MemoryStatusSink>;

pub(super) fn orchestrator(
    transport: ScriptedTransport,
) -> (
    TestOrchestrator,
    Arc<ScriptedTransport>,
    Arc<MemoryStatusSink>,
) {
    let transport = Arc::new(transport);
    let sink = Arc::new(MemoryStatusSink::default());
    let api = PortalApi::new(BASE, transport.clone());
    (
        RegistrationOrchestrator::new(api, sink.clone()),
        transport,
        sink,
    )
}

pub(super) fn status_messages(sink: &MemoryStatusSink) -> Vec<String> {
    sink.statuses()
        .into_iter()
        .map(|(message, _)| message)
        .collect()
}
