//! In-process stand-in for the portal API and its object storage.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{post, put};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct StoredApplicant {
    pub id: u32,
    pub bundle_id: u32,
    pub owner: String,
    pub first_name: String,
    pub last_name: String,
    pub latest_education: String,
}

#[derive(Debug, Clone)]
pub struct IssuedTicket {
    pub document_id: u32,
    pub bundle_id: u32,
    pub filename: String,
    pub content_type: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub document_id: u32,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Everything the fake portal has accepted so far.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub accounts: Vec<Account>,
    pub tokens: Vec<(String, String)>,
    pub applicants: Vec<StoredApplicant>,
    pub tickets: Vec<IssuedTicket>,
    pub objects: Vec<StoredObject>,
    pub completed: Vec<(u32, String)>,
    pub reject_storage: bool,
}

pub struct FakePortal {
    storage_base: Mutex<String>,
    ledger: Mutex<Ledger>,
}

impl FakePortal {
    pub fn new(storage_base: &str) -> Arc<Self> {
        Arc::new(Self {
            storage_base: Mutex::new(storage_base.to_string()),
            ledger: Mutex::new(Ledger::default()),
        })
    }

    pub fn ledger(&self) -> Ledger {
        self.lock().clone()
    }

    pub fn reject_storage(&self) {
        self.lock().reject_storage = true;
    }

    /// Issue a token for an existing account without going through login.
    pub fn issue_token(&self, email: &str, token: &str) {
        self.lock()
            .tokens
            .push((token.to_string(), email.to_string()));
    }

    pub fn revoke_tokens(&self) {
        self.lock().tokens.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("ledger mutex")
    }

    fn storage_base(&self) -> String {
        self.storage_base.lock().expect("storage mutex").clone()
    }
}

pub fn router(portal: Arc<FakePortal>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route(
            "/api/applicants/",
            post(create_applicant).get(list_applicants),
        )
        .route("/api/bundles/:bundle_id/documents/initiate", post(initiate))
        .route("/api/documents/:document_id/complete", post(complete))
        .route("/storage/:document_id", put(store_object))
        .with_state(portal)
}

/// Serve the fake portal on an ephemeral local port and return its base URL.
pub async fn spawn(portal: Arc<FakePortal>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    *portal.storage_base.lock().expect("storage mutex") = base.clone();

    let app = router(portal);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake portal");
    });
    base
}

type Reply = (StatusCode, Json<Value>);

fn detail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "detail": message })))
}

fn signed_in_email(ledger: &Ledger, headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    ledger
        .tokens
        .iter()
        .find(|(issued, _)| issued == token)
        .map(|(_, email)| email.clone())
}

fn text(body: &Value, field: &str) -> String {
    body[field].as_str().unwrap_or_default().to_string()
}

async fn register(State(portal): State<Arc<FakePortal>>, Json(body): Json<Value>) -> Reply {
    let account = Account {
        email: text(&body, "email"),
        full_name: text(&body, "full_name"),
        password: text(&body, "password"),
    };
    let mut ledger = portal.lock();
    if ledger.accounts.iter().any(|known| known.email == account.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let reply = json!({
        "id": ledger.accounts.len() + 1,
        "email": account.email,
        "full_name": account.full_name,
        "role": "client",
    });
    ledger.accounts.push(account);
    (StatusCode::OK, Json(reply))
}

#[derive(Deserialize)]
struct LoginFields {
    username: String,
    password: String,
}

async fn login(State(portal): State<Arc<FakePortal>>, Form(fields): Form<LoginFields>) -> Reply {
    let mut ledger = portal.lock();
    let known = ledger
        .accounts
        .iter()
        .any(|account| account.email == fields.username && account.password == fields.password);
    if !known {
        return detail(StatusCode::BAD_REQUEST, "Incorrect email or password");
    }
    let token = format!("tok-{}", ledger.tokens.len() + 1);
    ledger.tokens.push((token.clone(), fields.username));
    (
        StatusCode::OK,
        Json(json!({ "access_token": token, "token_type": "bearer" })),
    )
}

async fn create_applicant(
    State(portal): State<Arc<FakePortal>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut ledger = portal.lock();
    let Some(owner) = signed_in_email(&ledger, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    };
    let id = ledger.applicants.len() as u32 + 1;
    let applicant = StoredApplicant {
        id,
        bundle_id: 100 + id,
        owner,
        first_name: text(&body, "first_name"),
        last_name: text(&body, "last_name"),
        latest_education: text(&body, "latest_education"),
    };
    let reply = json!({
        "applicant_id": applicant.id,
        "bundle_id": applicant.bundle_id,
        "first_name": applicant.first_name,
        "last_name": applicant.last_name,
        "status": "Pending",
    });
    ledger.applicants.push(applicant);
    (StatusCode::OK, Json(reply))
}

async fn list_applicants(State(portal): State<Arc<FakePortal>>, headers: HeaderMap) -> Reply {
    let ledger = portal.lock();
    let Some(owner) = signed_in_email(&ledger, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    };
    let entries: Vec<Value> = ledger
        .applicants
        .iter()
        .filter(|applicant| applicant.owner == owner)
        .map(|applicant| {
            json!({
                "id": applicant.id,
                "first_name": applicant.first_name,
                "last_name": applicant.last_name,
                "latest_education": applicant.latest_education,
                "status": "Pending",
                "created_at": "2025-03-04T09:30:00",
            })
        })
        .collect();
    (StatusCode::OK, Json(Value::Array(entries)))
}

#[derive(Deserialize)]
struct InitiateQuery {
    filename: String,
    content_type: String,
}

async fn initiate(
    State(portal): State<Arc<FakePortal>>,
    Path(bundle_id): Path<u32>,
    Query(query): Query<InitiateQuery>,
    headers: HeaderMap,
) -> Reply {
    let storage_base = portal.storage_base();
    let mut ledger = portal.lock();
    let Some(owner) = signed_in_email(&ledger, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    };
    let owns_bundle = ledger
        .applicants
        .iter()
        .any(|applicant| applicant.bundle_id == bundle_id && applicant.owner == owner);
    if !owns_bundle {
        return detail(StatusCode::NOT_FOUND, "Bundle not found");
    }

    let document_id = 500 + ledger.tickets.len() as u32 + 1;
    let ticket = IssuedTicket {
        document_id,
        bundle_id,
        key: format!("bundles/{bundle_id}/{document_id}/{}", query.filename),
        filename: query.filename,
        content_type: query.content_type,
    };
    let reply = json!({
        "document_id": ticket.document_id,
        "upload_url": format!("{storage_base}/storage/{document_id}"),
        "key": ticket.key,
        "content_type": ticket.content_type,
    });
    ledger.tickets.push(ticket);
    (StatusCode::OK, Json(reply))
}

async fn store_object(
    State(portal): State<Arc<FakePortal>>,
    Path(document_id): Path<u32>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let mut ledger = portal.lock();
    if ledger.reject_storage {
        return StatusCode::FORBIDDEN;
    }
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    ledger.objects.push(StoredObject {
        document_id,
        content_type,
        bytes: body.to_vec(),
    });
    StatusCode::OK
}

async fn complete(
    State(portal): State<Arc<FakePortal>>,
    Path(document_id): Path<u32>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut ledger = portal.lock();
    if signed_in_email(&ledger, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let key = text(&body, "key");
    let Some(ticket) = ledger
        .tickets
        .iter()
        .find(|ticket| ticket.document_id == document_id)
    else {
        return detail(StatusCode::NOT_FOUND, "Document not found");
    };
    if ticket.key != key {
        return detail(StatusCode::BAD_REQUEST, "Key does not match document");
    }
    if !ledger
        .objects
        .iter()
        .any(|object| object.document_id == document_id)
    {
        return detail(StatusCode::BAD_REQUEST, "Uploaded object not found in S3");
    }
    ledger.completed.push((document_id, key));
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "document_id": document_id })),
    )
}
