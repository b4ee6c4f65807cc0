//! Views, the current location, and the navigation guard
//!
//! The dashboard has three views. `Index` is the entry view: it is the only
//! one reachable without a session, and every forced logout lands there.

use std::sync::{Arc, PoisonError, RwLock};

use crate::session::Session;

/// Dashboard views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// Entry view (sign-in and account picker)
    #[default]
    Index,
    /// Campaign change history
    History,
    /// Signed-in user profile
    Profile,
}

impl View {
    pub const ALL: [View; 3] = [View::Index, View::History, View::Profile];

    pub fn path(self) -> &'static str {
        match self {
            View::Index => "/",
            View::History => "/history",
            View::Profile => "/profile",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            View::Index => "Index",
            View::History => "History",
            View::Profile => "Profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        Self::ALL
            .into_iter()
            .find(|view| view.path().trim_end_matches('/') == trimmed)
    }

    pub fn is_entry(self) -> bool {
        self == View::Index
    }
}

/// Shared current location, read by the API client to decide on redirects
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Arc<RwLock<View>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `view` unconditionally. Navigation that should respect the
    /// session goes through [`Router::push`].
    pub fn replace(&self, view: View) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = view;
    }
}

/// Decide where a navigation attempt actually lands.
///
/// Reads the flag once and never suspends; whatever the last lifecycle pass
/// decided is what counts.
pub fn guard(session: &Session, target: View) -> View {
    if !session.is_logged_in() && !target.is_entry() {
        tracing::debug!(view = target.name(), "Not signed in, redirecting to entry view");
        View::Index
    } else {
        target
    }
}

/// Guarded navigation over a shared location
#[derive(Debug, Clone)]
pub struct Router {
    session: Session,
    navigator: Navigator,
}

impl Router {
    pub fn new(session: Session, navigator: Navigator) -> Self {
        Self { session, navigator }
    }

    /// Navigate to `target`, or to the entry view if the guard refuses.
    /// Returns the view that was actually entered.
    pub fn push(&self, target: View) -> View {
        let resolved = guard(&self.session, target);
        self.navigator.replace(resolved);
        resolved
    }

    /// Navigate by path; unknown paths leave the location unchanged
    pub fn push_path(&self, path: &str) -> Option<View> {
        View::from_path(path).map(|view| self.push(view))
    }

    pub fn current(&self) -> View {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionProfile;

    fn signed_in() -> Session {
        let session = Session::new();
        session.establish(SessionProfile::default());
        session
    }

    #[test]
    fn test_paths() {
        assert_eq!(View::from_path("/"), Some(View::Index));
        assert_eq!(View::from_path("/history"), Some(View::History));
        assert_eq!(View::from_path("/profile/"), Some(View::Profile));
        assert_eq!(View::from_path("/settings"), None);
        for view in View::ALL {
            assert_eq!(View::from_path(view.path()), Some(view));
        }
    }

    #[test]
    fn test_guard_redirects_signed_out_users() {
        let session = Session::new();
        for view in View::ALL {
            assert_eq!(guard(&session, view), View::Index);
        }
    }

    #[test]
    fn test_guard_allows_signed_in_users() {
        let session = signed_in();
        for view in View::ALL {
            assert_eq!(guard(&session, view), view);
        }
    }

    #[test]
    fn test_push_moves_location() {
        let session = signed_in();
        let router = Router::new(session.clone(), Navigator::new());

        assert_eq!(router.push(View::History), View::History);
        assert_eq!(router.current(), View::History);

        session.set_authenticated(false);
        assert_eq!(router.push(View::Profile), View::Index);
        assert_eq!(router.current(), View::Index);
    }

    #[test]
    fn test_guard_does_not_recheck_session() {
        // a stale flag still admits the user; only a lifecycle pass changes it
        let session = signed_in();
        let router = Router::new(session, Navigator::new());
        assert_eq!(router.push(View::Profile), View::Profile);
    }

    #[test]
    fn test_push_unknown_path() {
        let router = Router::new(signed_in(), Navigator::new());
        router.push(View::History);
        assert_eq!(router.push_path("/nowhere"), None);
        assert_eq!(router.current(), View::History);
    }

    #[test]
    fn test_navigator_is_shared() {
        let navigator = Navigator::new();
        let other = navigator.clone();
        navigator.replace(View::Profile);
        assert_eq!(other.current(), View::Profile);
    }
}
