//! Route guard for admin views.
//!
//! A presence check only: the guard never talks to the API. A token the API would reject
//! still gets the view; the first authenticated call then takes the session-expired path.

use super::routes::{Route, LOGIN_PATH};
use super::session::Session;

/// Outcome of guarding a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Render the requested route.
    Allow(Route),
    /// Render nothing from the request; go to `redirect` instead.
    Deny { redirect: &'static str },
}

/// Decide whether `route` may render with the current session.
pub fn check(route: Route, session: &Session) -> Access {
    if route.is_protected() && !session.is_present() {
        tracing::debug!("No session token; redirecting {} to login", route.path());
        return Access::Deny {
            redirect: LOGIN_PATH,
        };
    }
    Access::Allow(route)
}
