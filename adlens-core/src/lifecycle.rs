//! Session lifecycle
//!
//! One pass turns whatever is in the cookie jar into a definite answer:
//!
//! ```text
//! NoToken ───────────────────────────────────────────► Unauthenticated
//! ValidToken ── profile ok ──► Authenticated
//!            └─ profile err ─► Unauthenticated (access cookie cleared)
//! ExpiredToken ──► Refreshing ── ok ──► (read token again)
//!                             └─ err ─► Unauthenticated (cookies cleared)
//! ```
//!
//! Every failure ends in `Unauthenticated`; nothing escapes as an error.
//! A pass refreshes at most `max_refresh_attempts` times (one by default),
//! so a backend that keeps handing out stale tokens cannot loop it.

use crate::api::{ApiClient, UserProfile};
use crate::credentials::ACCESS_TOKEN_COOKIE;
use crate::router::View;
use crate::session::SessionProfile;
use crate::token;

/// Intermediate and terminal states of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    NoToken,
    ValidToken(String),
    ExpiredToken,
    Refreshing,
    Authenticated,
    Unauthenticated(UnauthenticatedReason),
}

impl LifecycleState {
    fn label(&self) -> &'static str {
        match self {
            LifecycleState::NoToken => "no_token",
            LifecycleState::ValidToken(_) => "valid_token",
            LifecycleState::ExpiredToken => "expired_token",
            LifecycleState::Refreshing => "refreshing",
            LifecycleState::Authenticated => "authenticated",
            LifecycleState::Unauthenticated(_) => "unauthenticated",
        }
    }
}

/// Why a pass ended without a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// No access cookie
    NoToken,
    /// Profile fetch failed for a token that looked usable
    ProfileRejected,
    /// The refresh endpoint failed
    RefreshFailed,
    /// Still expired after the allowed refreshes
    RefreshExhausted,
}

/// Result of [`SessionLifecycle::check_auth_status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Authenticated,
    Unauthenticated(UnauthenticatedReason),
}

impl SessionOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionOutcome::Authenticated)
    }
}

/// Drives the session through one lifecycle pass at a time
#[derive(Debug, Clone)]
pub struct SessionLifecycle {
    api: ApiClient,
    max_refresh_attempts: u32,
}

impl SessionLifecycle {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            max_refresh_attempts: 1,
        }
    }

    #[must_use]
    pub fn with_max_refresh_attempts(mut self, attempts: u32) -> Self {
        self.max_refresh_attempts = attempts;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Current value of the authentication flag
    pub fn is_logged_in(&self) -> bool {
        self.api.session().is_logged_in()
    }

    /// Network-free first guess: a cookie is present and not expired.
    ///
    /// The guess can only lower the flag. Raising it is left to a full pass,
    /// which fills the profile in the same update.
    pub fn set_initial_auth_state(&self) -> bool {
        let plausible = self
            .api
            .credentials()
            .access_token()
            .is_some_and(|t| !token::is_expired(&t));
        if !plausible {
            self.api.session().set_authenticated(false);
        }
        plausible
    }

    /// Run one full pass and apply the outcome to the session
    pub async fn check_auth_status(&self) -> SessionOutcome {
        let mut refreshes = 0;
        let mut state = self.read_token();

        loop {
            tracing::debug!(state = state.label(), "Session lifecycle");

            state = match state {
                LifecycleState::NoToken => {
                    LifecycleState::Unauthenticated(UnauthenticatedReason::NoToken)
                }
                LifecycleState::ValidToken(access_token) => {
                    self.resolve_profile(&access_token).await
                }
                LifecycleState::ExpiredToken => {
                    if refreshes >= self.max_refresh_attempts {
                        self.api.credentials().clear_all();
                        LifecycleState::Unauthenticated(UnauthenticatedReason::RefreshExhausted)
                    } else {
                        refreshes += 1;
                        LifecycleState::Refreshing
                    }
                }
                LifecycleState::Refreshing => match self.api.refresh_token().await {
                    Ok(_) => self.read_token(),
                    Err(e) => {
                        tracing::warn!(error = %e, "Token refresh failed");
                        self.api.credentials().clear_all();
                        LifecycleState::Unauthenticated(UnauthenticatedReason::RefreshFailed)
                    }
                },
                LifecycleState::Authenticated => {
                    tracing::info!("Session authenticated");
                    return SessionOutcome::Authenticated;
                }
                LifecycleState::Unauthenticated(reason) => {
                    tracing::info!(reason = ?reason, "Session unauthenticated");
                    self.api.session().clear();
                    return SessionOutcome::Unauthenticated(reason);
                }
            };
        }
    }

    /// User-initiated logout
    pub fn logout(&self) {
        tracing::info!("Logging out");
        self.api.force_logout();
    }

    // Private helpers

    fn read_token(&self) -> LifecycleState {
        match self.api.credentials().access_token() {
            None => LifecycleState::NoToken,
            Some(t) if token::is_expired(&t) => LifecycleState::ExpiredToken,
            Some(t) => LifecycleState::ValidToken(t),
        }
    }

    async fn resolve_profile(&self, access_token: &str) -> LifecycleState {
        // Non-JWT tokens carry no identity; the profile fetch decides
        let claims = token::decode_claims(access_token).ok();

        match self.api.user_profile().await {
            Ok(profile) => {
                self.api.session().establish(merge_profile(
                    profile,
                    claims.as_ref().and_then(|c| c.linkedin_id.clone()),
                    claims.as_ref().and_then(|c| c.user_id.clone()),
                ));
                LifecycleState::Authenticated
            }
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::warn!("Profile fetch rejected the session token");
                } else {
                    tracing::error!(error = %e, "Error retrieving user profile");
                }
                self.api.credentials().clear(ACCESS_TOKEN_COOKIE);
                LifecycleState::Unauthenticated(UnauthenticatedReason::ProfileRejected)
            }
        }
    }
}

/// Token claims win for identity fields; the profile fills the gaps
fn merge_profile(
    profile: UserProfile,
    linkedin_id: Option<String>,
    user_id: Option<String>,
) -> SessionProfile {
    SessionProfile {
        email: profile.email,
        account_id: profile.account_id,
        linkedin_id: linkedin_id.or(profile.linkedin_id).unwrap_or_default(),
        user_id: user_id.or(profile.user_id).unwrap_or_default(),
    }
}

/// View the app should open on once a pass has finished
pub fn landing_view(outcome: &SessionOutcome, requested: View) -> View {
    if outcome.is_authenticated() {
        requested
    } else {
        View::Index
    }
}
