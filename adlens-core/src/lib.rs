//! adlens-core: client-side session handling for the adlens ad analytics
//! dashboard
//!
//! This crate provides:
//! - Session token inspection (structure and expiry, no signature checks)
//! - Shared session state and the lifecycle that fills it
//! - Backend API client that ends the session on 401
//! - Views, navigation guard, and the selected ad account
//! - Labels for campaign-change fields and metrics

pub mod api;
pub mod config;
pub mod credentials;
pub mod labels;
pub mod lifecycle;
pub mod router;
pub mod session;
pub mod store;
pub mod token;

pub use api::{ApiClient, ApiError, UserProfile};
pub use config::Config;
pub use credentials::{CookieCredentials, StoredCredentials};
pub use lifecycle::{SessionLifecycle, SessionOutcome, UnauthenticatedReason};
pub use router::{Navigator, Router, View};
pub use session::{Session, SessionState};
pub use store::AdAccountStore;

/// Default port of the dashboard backend in development
pub const DEFAULT_API_PORT: u16 = 8000;
