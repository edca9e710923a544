//! Route guards.

use super::routes::{Access, Route};
use crate::session::SessionSnapshot;

/// What the router does with a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Show the route
    Allow(Route),
    /// Session checks still running; show a loading state, do not redirect
    Loading,
    /// Replace the navigation with another route
    Redirect(Route),
}

/// Decide whether `route` may be shown for the given session state.
pub fn resolve(route: Route, session: &SessionSnapshot) -> Guard {
    let access = route.access();
    if access == Access::Public {
        return Guard::Allow(route);
    }
    if session.loading {
        return Guard::Loading;
    }

    match access {
        Access::Public => Guard::Allow(route),
        Access::GuestOnly if session.is_authenticated() => Guard::Redirect(Route::Dashboard),
        Access::GuestOnly => Guard::Allow(route),
        Access::AdminGuestOnly if session.is_admin() => Guard::Redirect(Route::AdminDashboard),
        Access::AdminGuestOnly => Guard::Allow(route),
        Access::User if session.is_authenticated() => Guard::Allow(route),
        Access::User => Guard::Redirect(Route::Login),
        Access::Admin if session.is_admin() => Guard::Allow(route),
        Access::Admin => Guard::Redirect(Route::AdminLogin),
    }
}

/// Follow redirects until a route is allowed or still loading.
pub fn navigate(path: &str, session: &SessionSnapshot) -> Guard {
    let mut route = Route::parse(path);
    // Redirect targets never redirect again, so one hop suffices in practice.
    for _ in 0..Route::ALL.len() {
        match resolve(route, session) {
            Guard::Redirect(next) => route = next,
            settled => return settled,
        }
    }
    Guard::Redirect(route)
}
