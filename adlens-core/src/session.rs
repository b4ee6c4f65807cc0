//! Shared session state
//!
//! One `Session` is constructed at startup and handed to everything that
//! needs to read or change the authentication flag. Clones share the same
//! state, and every write is visible to every clone immediately.

use std::sync::Arc;

use tokio::sync::watch;

/// Authentication flag plus the handful of profile fields the views show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub email: String,
    pub account_id: String,
    pub linkedin_id: String,
    pub user_id: String,
}

/// Profile fields gathered during one lifecycle pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionProfile {
    pub email: String,
    pub account_id: String,
    pub linkedin_id: String,
    pub user_id: String,
}

/// Handle to the client-wide session state
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Current value of the authentication flag
    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().authenticated
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Set the authentication flag, leaving profile fields alone
    pub fn set_authenticated(&self, authenticated: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.authenticated != authenticated;
            state.authenticated = authenticated;
            changed
        });
    }

    /// Write a freshly fetched profile and mark the session authenticated.
    ///
    /// Fields and flag change in a single update, so no reader can observe
    /// `authenticated == true` next to fields from an earlier pass.
    pub fn establish(&self, profile: SessionProfile) {
        self.state.send_replace(SessionState {
            authenticated: true,
            email: profile.email,
            account_id: profile.account_id,
            linkedin_id: profile.linkedin_id,
            user_id: profile.user_id,
        });
    }

    /// Drop back to the unauthenticated default
    pub fn clear(&self) {
        self.state.send_if_modified(|state| {
            if *state == SessionState::default() {
                return false;
            }
            *state = SessionState::default();
            true
        });
    }

    /// Receiver that wakes on every change, for views that redraw on logout
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
