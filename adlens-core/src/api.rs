//! Dashboard backend API client
//!
//! Every request goes out through one `reqwest::Client` whose cookie store
//! holds the credentials, so the session cookies ride along without any
//! per-request header handling.
//!
//! A 401 on any call outside the entry view ends the session on the spot:
//! - session marked unauthenticated
//! - both session cookies expired
//! - location moved to the entry view
//!
//! On the entry view a 401 is just returned, which keeps an unauthenticated
//! entry page from redirecting to itself forever.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ApiConfig, ConfigError};
use crate::credentials::{ACCESS_TOKEN_COOKIE, CookieCredentials, REFRESH_TOKEN_COOKIE};
use crate::router::{Navigator, View};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Not authorized")]
    Unauthorized,

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid API configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Profile returned by the user-profile endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub account_id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub linkedin_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
}

/// Body of a refresh response.
///
/// Backends that set the new cookie themselves reply with an empty or
/// unrelated body; both fields are optional for that reason.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// API client bound to one session
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<ApiConfig>,
    credentials: CookieCredentials,
    session: Session,
    navigator: Navigator,
}

impl ApiClient {
    /// Build the client and its cookie store from config
    pub fn new(
        config: ApiConfig,
        session: Session,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let scope = config.cookie_scope()?;
        let credentials = CookieCredentials::empty(scope);

        let http = Client::builder()
            .cookie_provider(credentials.store())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            credentials,
            session,
            navigator,
        })
    }

    pub fn credentials(&self) -> &CookieCredentials {
        &self.credentials
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch the signed-in user's profile
    pub async fn user_profile(&self) -> Result<UserProfile, ApiError> {
        self.get_json(&self.config.profile_path).await
    }

    /// Ask the backend for a fresh access token.
    ///
    /// Tokens carried in the response body are written to the store here;
    /// `Set-Cookie` headers have already been applied by the store.
    pub async fn refresh_token(&self) -> Result<RefreshResponse, ApiError> {
        let resp = self
            .send(self.http.request(Method::POST, self.url(&self.config.refresh_path)))
            .await?;

        let body = resp.bytes().await?;
        let refreshed: RefreshResponse = if body.is_empty() {
            RefreshResponse::default()
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Refresh body is not a token payload");
                RefreshResponse::default()
            })
        };

        if let Some(ref token) = refreshed.access_token {
            self.credentials.write(ACCESS_TOKEN_COOKIE, token);
        }
        if let Some(ref token) = refreshed.refresh_token {
            self.credentials.write(REFRESH_TOKEN_COOKIE, token);
        }

        Ok(refreshed)
    }

    /// GET a JSON resource relative to the API base
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.http.get(self.url(path))).await?;
        Ok(resp.json().await?)
    }

    /// POST a JSON body and decode a JSON reply
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self.send(self.http.post(self.url(path)).json(body)).await?;
        Ok(resp.json().await?)
    }

    /// End the session locally: clear state and cookies, go to the entry
    /// view.
    pub fn force_logout(&self) {
        self.session.clear();
        self.credentials.clear_all();
        self.navigator.replace(View::Index);
    }

    // Private helpers

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = req.send().await?;
        self.check_status(resp).await
    }

    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        match resp.status() {
            s if s.is_success() => Ok(resp),
            StatusCode::UNAUTHORIZED => {
                let location = self.navigator.current();
                if !location.is_entry() {
                    tracing::warn!(
                        url = %resp.url(),
                        from = location.name(),
                        "Request unauthorized, forcing logout"
                    );
                    self.force_logout();
                }
                Err(ApiError::Unauthorized)
            }
            s => {
                let body = resp.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: s.as_u16(),
                    body,
                })
            }
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
