//! Cookie-held session credentials
//!
//! The access and refresh tokens live in the HTTP client's cookie store, the
//! same store that attaches them to every API request. This module is the only
//! code that reads or writes those cookies directly.
//!
//! A browser keeps cookies across page loads; a terminal client has to
//! persist them itself, so the two session cookies can be snapshotted to a
//! small TOML file and restored on the next start.

use std::path::{Path, PathBuf};
use std::sync::{Arc, MutexGuard, PoisonError};

use cookie::Cookie;
use cookie_store::CookieStore;
use reqwest::Url;
use reqwest_cookie_store::CookieStoreMutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Duration;

/// Cookie holding the short-lived access token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie holding the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Failed to access credentials file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse credentials file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize credentials: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Data directory not found")]
    NoDirFound,
}

/// On-disk form of the two session cookies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredCredentials {
    /// Default snapshot location
    pub fn default_path() -> Result<PathBuf, CredentialsError> {
        dirs::data_dir()
            .map(|p| p.join("adlens").join("credentials.toml"))
            .ok_or(CredentialsError::NoDirFound)
    }

    /// Load a snapshot; a missing file is an empty snapshot
    pub fn load_from(path: &Path) -> Result<Self, CredentialsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CredentialsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Cookie interface over the store shared with the API client
#[derive(Debug, Clone)]
pub struct CookieCredentials {
    store: Arc<CookieStoreMutex>,
    scope: Url,
}

impl CookieCredentials {
    /// `scope` is the API base URL; cookies are read as a request to it would
    /// send them.
    pub fn new(store: Arc<CookieStoreMutex>, scope: Url) -> Self {
        Self { store, scope }
    }

    /// Credentials over a fresh, empty store
    pub fn empty(scope: Url) -> Self {
        Self::new(Arc::new(CookieStoreMutex::new(CookieStore::default())), scope)
    }

    /// The store to install on the HTTP client
    pub fn store(&self) -> Arc<CookieStoreMutex> {
        Arc::clone(&self.store)
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_COOKIE)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_COOKIE)
    }

    /// Read a cookie by name. Empty values count as absent.
    ///
    /// The backend may set the same name on more than one path; the most
    /// specific path wins, as it would in the request's Cookie header order.
    pub fn read(&self, name: &str) -> Option<String> {
        let store = self.lock();
        store
            .matches(&self.scope)
            .into_iter()
            .filter(|c| c.name() == name && !c.value().is_empty())
            .max_by_key(|c| AsRef::<str>::as_ref(&c.path).len())
            .map(|c| c.value().to_string())
    }

    /// Replace every cookie called `name` with a single one on `/`
    pub fn write(&self, name: &str, value: &str) {
        let mut store = self.lock();
        expire_named(&mut store, name, &self.scope);

        let cookie = Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .build();
        if let Err(e) = store.insert_raw(&cookie, &self.scope) {
            tracing::warn!(cookie = name, error = %e, "Cookie rejected by store");
        }
    }

    /// Expire a cookie on every path it is set on
    pub fn clear(&self, name: &str) {
        expire_named(&mut self.lock(), name, &self.scope);
    }

    pub fn clear_all(&self) {
        self.clear(ACCESS_TOKEN_COOKIE);
        self.clear(REFRESH_TOKEN_COOKIE);
    }

    pub fn snapshot(&self) -> StoredCredentials {
        StoredCredentials {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
        }
    }

    /// Write every token present in the snapshot into the store
    pub fn restore(&self, stored: &StoredCredentials) {
        if let Some(ref token) = stored.access_token {
            self.write(ACCESS_TOKEN_COOKIE, token);
        }
        if let Some(ref token) = stored.refresh_token {
            self.write(REFRESH_TOKEN_COOKIE, token);
        }
    }

    fn lock(&self) -> MutexGuard<'_, CookieStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn expire_named(store: &mut CookieStore, name: &str, scope: &Url) {
    let paths: Vec<String> = store
        .iter_any()
        .filter(|c| c.name() == name)
        .map(|c| AsRef::<str>::as_ref(&c.path).to_string())
        .collect();

    for path in paths {
        let expired = Cookie::build((name.to_string(), String::new()))
            .path(path)
            .max_age(Duration::ZERO)
            .build();
        // Err(Expired) just means there was nothing left to remove
        let _ = store.insert_raw(&expired, scope);
    }
}
