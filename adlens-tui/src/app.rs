//! Application state and logic

use adlens_core::credentials::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use adlens_core::labels::ChangeCategory;
use adlens_core::lifecycle::landing_view;
use adlens_core::{
    AdAccountStore, ApiClient, Config, Navigator, Router, Session, SessionLifecycle,
    SessionOutcome, SessionState, StoredCredentials, UnauthenticatedReason, View,
};
use tokio::sync::watch;

/// Application result for main loop
pub enum AppResult {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Main application struct
pub struct App {
    pub config: Config,
    pub lifecycle: SessionLifecycle,
    pub router: Router,
    pub accounts: AdAccountStore,

    /// Latest session state seen by the UI
    pub session: SessionState,
    session_rx: watch::Receiver<SessionState>,

    /// Result of the most recent lifecycle pass
    pub outcome: Option<SessionOutcome>,

    pub input_mode: InputMode,
    pub command_input: String,
    pub status_message: Option<(String, StatusLevel)>,

    /// Highlighted category on the history view
    pub category_cursor: usize,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let session = Session::new();
        let navigator = Navigator::new();

        let api = ApiClient::new(config.api.clone(), session.clone(), navigator.clone())?;
        let lifecycle = SessionLifecycle::new(api)
            .with_max_refresh_attempts(config.session.max_refresh_attempts);
        let router = Router::new(session.clone(), navigator);
        let session_rx = session.subscribe();

        Ok(Self {
            config,
            lifecycle,
            router,
            accounts: AdAccountStore::new(),
            session: session.snapshot(),
            session_rx,
            outcome: None,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: None,
            category_cursor: 0,
        })
    }

    fn api(&self) -> &ApiClient {
        self.lifecycle.api()
    }

    /// Fill the cookie jar from the saved snapshot, then from the
    /// environment. Environment values win.
    pub fn seed_credentials(&self) {
        let credentials = self.api().credentials();

        if self.config.session.persist_credentials {
            let stored =
                StoredCredentials::default_path().and_then(|p| StoredCredentials::load_from(&p));
            match stored {
                Ok(stored) => credentials.restore(&stored),
                Err(e) => tracing::warn!(error = %e, "Could not load saved credentials"),
            }
        }

        for (var, cookie) in [
            ("ADLENS_ACCESS_TOKEN", ACCESS_TOKEN_COOKIE),
            ("ADLENS_REFRESH_TOKEN", REFRESH_TOKEN_COOKIE),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    tracing::debug!(var, "Seeding cookie from environment");
                    credentials.write(cookie, &value);
                }
            }
        }
    }

    /// Run a lifecycle pass and land on a view the outcome allows
    pub async fn check_session(&mut self) {
        let outcome = self.lifecycle.check_auth_status().await;

        let landed = landing_view(&outcome, self.router.current());
        self.router.push(landed);

        let (msg, level) = match &outcome {
            SessionOutcome::Authenticated => {
                let email = self.api().session().snapshot().email;
                (format!("Signed in as {}", email), StatusLevel::Success)
            }
            SessionOutcome::Unauthenticated(reason) => {
                (describe(*reason).to_string(), StatusLevel::Warning)
            }
        };
        self.set_status(msg, level);
        self.outcome = Some(outcome);
        self.sync_session();
    }

    /// Pick up session changes made outside the UI (forced logout, etc.)
    pub fn tick(&mut self) {
        if self.session_rx.has_changed().unwrap_or(false) {
            let was_authenticated = self.session.authenticated;
            self.sync_session();
            if was_authenticated && !self.session.authenticated {
                self.set_status("Session ended", StatusLevel::Warning);
            }
        }
    }

    fn sync_session(&mut self) {
        self.session = self.session_rx.borrow_and_update().clone();
    }

    /// Guarded navigation
    pub fn navigate(&mut self, target: View) {
        let landed = self.router.push(target);
        if landed != target {
            let msg = format!("Sign in to open {}", target.name());
            self.set_status(msg, StatusLevel::Warning);
        } else {
            self.clear_status();
        }
    }

    pub fn navigate_path(&mut self, path: &str) {
        match View::from_path(path) {
            Some(view) => self.navigate(view),
            None => self.set_status(format!("No view at {}", path), StatusLevel::Error),
        }
    }

    pub fn current_view(&self) -> View {
        self.router.current()
    }

    /// Cycle through the views in order
    pub fn next_view(&mut self) {
        let current = self.current_view();
        let idx = View::ALL.iter().position(|v| *v == current).unwrap_or(0);
        self.navigate(View::ALL[(idx + 1) % View::ALL.len()]);
    }

    /// Scope the views to the signed-in user's own ad account
    pub fn select_profile_account(&mut self) {
        if self.session.account_id.is_empty() {
            self.set_status("No ad account on this profile", StatusLevel::Warning);
            return;
        }
        let account_id = self.session.account_id.clone();
        self.select_account(&account_id);
    }

    pub fn select_account(&mut self, account_id: &str) {
        self.accounts.select(account_id);
        self.set_status(format!("Ad account {}", account_id), StatusLevel::Info);
    }

    pub fn logout(&mut self) {
        self.lifecycle.logout();
        self.accounts.clear();
        self.outcome = Some(SessionOutcome::Unauthenticated(UnauthenticatedReason::NoToken));
        self.sync_session();
        self.set_status("Signed out", StatusLevel::Info);
    }

    pub fn selected_category(&self) -> ChangeCategory {
        ChangeCategory::ALL[self.category_cursor % ChangeCategory::ALL.len()]
    }

    pub fn category_down(&mut self) {
        if self.category_cursor + 1 < ChangeCategory::ALL.len() {
            self.category_cursor += 1;
        }
    }

    pub fn category_up(&mut self) {
        self.category_cursor = self.category_cursor.saturating_sub(1);
    }

    /// Save the session cookies for the next run
    pub fn persist_credentials(&self) {
        if !self.config.session.persist_credentials {
            return;
        }

        let snapshot = self.api().credentials().snapshot();
        if let Err(e) = StoredCredentials::default_path().and_then(|p| snapshot.save_to(&p)) {
            tracing::warn!(error = %e, "Could not save credentials");
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>, level: StatusLevel) {
        self.status_message = Some((msg.into(), level));
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

/// Status line text for an unauthenticated outcome
pub fn describe(reason: UnauthenticatedReason) -> &'static str {
    match reason {
        UnauthenticatedReason::NoToken => "Not signed in",
        UnauthenticatedReason::ProfileRejected => "Session rejected by the server",
        UnauthenticatedReason::RefreshFailed => "Session expired and could not be renewed",
        UnauthenticatedReason::RefreshExhausted => "Session expired",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out_navigation_stays_on_index() {
        let mut app = App::new(Config::default()).unwrap();

        app.navigate(View::Profile);

        assert_eq!(app.current_view(), View::Index);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));
    }

    #[test]
    fn test_unknown_path_is_reported() {
        let mut app = App::new(Config::default()).unwrap();

        app.navigate_path("/billing");

        assert_eq!(app.current_view(), View::Index);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Error))));
    }

    #[test]
    fn test_select_account_requires_profile() {
        let mut app = App::new(Config::default()).unwrap();

        app.select_profile_account();
        assert_eq!(app.accounts.selected(), None);

        app.select_account("508123456");
        assert_eq!(app.accounts.selected().as_deref(), Some("508123456"));
    }

    #[test]
    fn test_category_cursor_is_bounded() {
        let mut app = App::new(Config::default()).unwrap();

        app.category_up();
        assert_eq!(app.selected_category(), ChangeCategory::Budget);

        for _ in 0..10 {
            app.category_down();
        }
        assert_eq!(app.selected_category(), ChangeCategory::Creatives);
    }
}
