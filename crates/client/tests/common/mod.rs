//! In-process directory service for black-box tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::mpsc;

use shds_auth::Screen;
use shds_client::{
    HttpDirectory, IdToken, Identity, Navigator, Notice, PortalContext, SessionStore, SessionWriter,
    TOKEN_HEADER,
};

#[derive(Default)]
pub struct MockState {
    /// token -> `/users/me` body
    pub users: HashMap<String, Value>,
    pub students: Vec<Value>,
    pub hits: AtomicUsize,
    pub last_body: Mutex<Option<Value>>,
    pub last_query: Mutex<Option<HashMap<String, String>>>,
}

impl MockState {
    pub fn with_user(mut self, token: &str, me: Value) -> Self {
        self.users.insert(token.to_string(), me);
        self
    }

    pub fn with_students(mut self, students: Vec<Value>) -> Self {
        self.students = students;
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<&Value, Response> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|t| self.users.get(t))
            .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid or missing token"))
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    match state.authorize(&headers) {
        Ok(user) => Json(user.clone()).into_response(),
        Err(resp) => resp,
    }
}

async fn students(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    match state.authorize(&headers) {
        Ok(_) => Json(state.students.clone()).into_response(),
        Err(resp) => resp,
    }
}

async fn student_docs(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(resp) = state.authorize(&headers) {
        return resp;
    }
    *state.last_query.lock().unwrap() = Some(query.clone());
    let wanted = query.get("id").cloned().unwrap_or_default();
    if wanted == "broken" {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Collection unavailable");
    }
    let docs: Vec<Value> = state
        .students
        .iter()
        .filter(|s| s["id"] == wanted.as_str())
        .cloned()
        .collect();
    Json(docs).into_response()
}

async fn invites(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = state.authorize(&headers) {
        return resp;
    }
    *state.last_body.lock().unwrap() = Some(body.clone());
    if body["email"].as_str().unwrap_or_default().starts_with("fail") {
        return detail(StatusCode::BAD_GATEWAY, "Email delivery failed");
    }
    Json(json!({ "id": "inv1", "token": "tok123" })).into_response()
}

async fn setup(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = state.authorize(&headers) {
        return resp;
    }
    *state.last_body.lock().unwrap() = Some(body.clone());
    match body["inviteToken"].as_str() {
        Some("-1") => Json(json!({
            "uid": "u",
            "roles": body["roles"].clone(),
            "branchId": body["branchId"].clone(),
            "message": "User setup complete"
        }))
        .into_response(),
        Some("staff-invite") => {
            Json(json!({ "roles": ["staff"], "branchId": "b1" })).into_response()
        }
        Some("empty-body") => StatusCode::OK.into_response(),
        _ => detail(StatusCode::BAD_REQUEST, "Invite not found or already used"),
    }
}

pub struct TestServer {
    pub base_url: String,
    pub state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(state: MockState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/users/me", get(me))
            .route("/users/setup", post(setup))
            .route("/users/invites", post(invites))
            .route("/students", get(students))
            .route("/collections/students", get(student_docs))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    pub fn directory(&self) -> HttpDirectory {
        HttpDirectory::new(&shds_client::ClientConfig::new(self.base_url.clone())).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A portal wired to a test server, with notifications captured.
pub struct Harness {
    pub ctx: PortalContext,
    pub writer: SessionWriter,
    pub notices: mpsc::UnboundedReceiver<Notice>,
}

impl Harness {
    /// Signed in with `token` (or signed out when `None`), starting on `start`.
    pub fn new(server: &TestServer, token: Option<&str>, start: Screen) -> Self {
        let (writer, reader) = SessionStore::channel();
        match token {
            Some(token) => writer.sign_in(
                Identity {
                    uid: "u1".to_string(),
                    email: Some("user@example.org".to_string()),
                    display_name: None,
                },
                IdToken::new(token),
            ),
            None => writer.sign_out(),
        }
        let (tx, notices) = mpsc::unbounded_channel();
        let ctx = PortalContext::new(
            Arc::new(server.directory()),
            reader,
            Navigator::new(start),
            Arc::new(tx),
        );
        Self { ctx, writer, notices }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut out = Vec::new();
        while let Ok(n) = self.notices.try_recv() {
            out.push(n);
        }
        out
    }
}
