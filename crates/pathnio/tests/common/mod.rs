//! A scripted stand-in for the Pathnio backend.
//!
//! Responses are registered per method and path (optionally with a query).
//! Every request is recorded so tests can assert on headers and bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::Value;

use pathnio::models::{TokenPair, User};
use pathnio::{ApiBase, ApiClient, RecordingNavigator, Session};

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Debug, Default)]
struct Inner {
    routes: HashMap<(String, String), (u16, Value)>,
    requests: Vec<Recorded>,
}

#[derive(Debug, Clone, Default)]
pub struct Backend {
    inner: Arc<Mutex<Inner>>,
}

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method target` with `status` and a JSON body. `Value::Null`
    /// sends an empty body.
    pub fn on(&self, method: &str, target: &str, status: u16, body: Value) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), target.to_string()), (status, body));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    /// Serve on an ephemeral local port and return the origin.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut inner = backend.inner.lock().unwrap();
    inner.requests.push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let full = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    let route = inner
        .routes
        .get(&(method.to_string(), full))
        .or_else(|| inner.routes.get(&(method.to_string(), uri.path().to_string())))
        .cloned();

    match route {
        Some((status, Value::Null)) => StatusCode::from_u16(status).unwrap().into_response(),
        Some((status, body)) => (StatusCode::from_u16(status).unwrap(), Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Not found."})),
        )
            .into_response(),
    }
}

/// A client for `origin` over an in-memory session.
pub fn client(origin: &str) -> (ApiClient, Arc<RecordingNavigator>) {
    client_with_session(origin, Session::in_memory())
}

pub fn client_with_session(origin: &str, session: Session) -> (ApiClient, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::new(ApiBase::new(origin).unwrap(), session, navigator.clone());
    (client, navigator)
}

pub fn sample_user() -> User {
    serde_json::from_value(sample_user_json()).unwrap()
}

pub fn sample_user_json() -> Value {
    serde_json::json!({
        "id": 7,
        "username": "fleetmgr",
        "email": "fleet@example.com",
        "full_name": "Fleet Manager",
        "company_name": "Demo Co.",
        "is_staff": true
    })
}

pub fn sample_profile_json() -> Value {
    serde_json::json!({
        "full_name": "Fleet Manager",
        "email": "fleet@example.com",
        "phone": "09120000000",
        "role": "manager",
        "company_name": "Demo Co."
    })
}

/// Fill every session key.
pub fn sign_in(session: &Session, access: &str) {
    session
        .store_tokens(&TokenPair::new(access, Some("refresh-token".to_string())))
        .unwrap();
    session.store_user(&sample_user()).unwrap();
}
