//! Mock dashboard backend for black-box tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use adlens_core::config::ApiConfig;
use adlens_core::{ApiClient, Navigator, Session, SessionLifecycle};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;

pub const TOKEN_SECRET: &[u8] = b"backend-only-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    Ok,
    Unauthorized,
    ServerError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// New token in the JSON body
    Body,
    /// New token via Set-Cookie on `/`, empty body
    SetCookie,
    /// New token via Set-Cookie with no Path, so it lands on `/api`
    SetCookieDefaultPath,
    /// 401
    Fail,
    /// Hands back a token that is already expired
    Stale,
}

pub struct Backend {
    profile_mode: Mutex<ProfileMode>,
    refresh_mode: Mutex<RefreshMode>,
    pub fresh_token: String,
    pub profile_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    last_cookie: Mutex<Option<String>>,
}

impl Backend {
    pub fn set_profile_mode(&self, mode: ProfileMode) {
        *self.profile_mode.lock().unwrap() = mode;
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Cookie header of the most recent request
    pub fn last_cookie(&self) -> Option<String> {
        self.last_cookie.lock().unwrap().clone()
    }

    fn record_cookie(&self, headers: &HeaderMap) {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        *self.last_cookie.lock().unwrap() = cookie;
    }
}

pub struct TestServer {
    pub base_url: String,
    pub backend: Arc<Backend>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(profile_mode: ProfileMode, refresh_mode: RefreshMode) -> Self {
        let backend = Arc::new(Backend {
            profile_mode: Mutex::new(profile_mode),
            refresh_mode: Mutex::new(refresh_mode),
            fresh_token: mint_token(Duration::hours(1), "li-fresh", "u-fresh"),
            profile_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            last_cookie: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/user-profile", get(user_profile))
            .route("/api/refresh-token", post(refresh_token))
            .route("/api/ad-accounts", get(ad_accounts))
            .with_state(Arc::clone(&backend));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            backend,
            handle,
        }
    }

    /// Client, session, and lifecycle wired the way the TUI wires them
    pub fn lifecycle(&self) -> SessionLifecycle {
        let mut config = ApiConfig::default();
        config.base_url = self.base_url.clone();
        config.timeout_secs = 5;

        let api = ApiClient::new(config, Session::new(), Navigator::new()).unwrap();
        SessionLifecycle::new(api)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn mint_token(expires_in: Duration, linkedin_id: &str, user_id: &str) -> String {
    let claims = json!({
        "exp": (Utc::now() + expires_in).timestamp(),
        "linkedinId": linkedin_id,
        "userId": user_id,
    });

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TOKEN_SECRET),
    )
    .expect("failed to encode jwt")
}

async fn user_profile(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.profile_calls.fetch_add(1, Ordering::SeqCst);
    backend.record_cookie(&headers);

    let mode = *backend.profile_mode.lock().unwrap();
    match mode {
        ProfileMode::Ok => Json(json!({
            "email": "ada@example.com",
            "accountId": 508123456,
            "userId": "u-profile",
        }))
        .into_response(),
        ProfileMode::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        ProfileMode::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response()
        }
    }
}

async fn refresh_token(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    backend.record_cookie(&headers);

    let mode = *backend.refresh_mode.lock().unwrap();
    match mode {
        RefreshMode::Body => Json(json!({ "accessToken": backend.fresh_token })).into_response(),
        RefreshMode::SetCookie => (
            StatusCode::NO_CONTENT,
            [(
                header::SET_COOKIE,
                format!("accessToken={}; Path=/; HttpOnly", backend.fresh_token),
            )],
        )
            .into_response(),
        RefreshMode::SetCookieDefaultPath => (
            StatusCode::NO_CONTENT,
            [(
                header::SET_COOKIE,
                format!("accessToken={}; HttpOnly", backend.fresh_token),
            )],
        )
            .into_response(),
        RefreshMode::Fail => StatusCode::UNAUTHORIZED.into_response(),
        RefreshMode::Stale => Json(json!({
            "accessToken": mint_token(-Duration::minutes(1), "li-stale", "u-stale"),
        }))
        .into_response(),
    }
}

async fn ad_accounts(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.record_cookie(&headers);
    Json(json!([
        { "id": "508123456", "name": "Brand Awareness" },
        { "id": "508999999", "name": "Lead Gen EMEA" },
    ]))
    .into_response()
}
