//! Navigation surface and the role guard in front of each dashboard.

use std::fmt;

use crate::session::{Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Dashboard(Role),
}

impl Route {
    /// Landing route after logging in as `role`.
    pub fn for_role(role: Role) -> Self {
        Route::Dashboard(role)
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Signup => "/signup",
            Route::Dashboard(Role::User) => "/dashboard/user",
            Route::Dashboard(Role::Admin) => "/dashboard/admin",
            Route::Dashboard(Role::StoreOwner) => "/dashboard/owner",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        match normalized {
            "/" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/dashboard/user" => Some(Route::Dashboard(Role::User)),
            "/dashboard/admin" => Some(Route::Dashboard(Role::Admin)),
            "/dashboard/owner" => Some(Route::Dashboard(Role::StoreOwner)),
            _ => None,
        }
    }

    pub fn is_dashboard(self) -> bool {
        matches!(self, Route::Dashboard(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decides where a navigation to `requested` actually lands.
///
/// Login and signup are always reachable. A dashboard needs a token and a
/// matching role; a session for another role lands on its own dashboard and
/// anything else goes back to login.
pub fn guard(requested: Route, session: &Session) -> Route {
    let Route::Dashboard(wanted) = requested else {
        return requested;
    };
    if !session.has_token() {
        return Route::Login;
    }
    match session.role {
        Some(role) if role == wanted => requested,
        Some(role) => Route::for_role(role),
        None => Route::Login,
    }
}

/// Route to show on startup for a persisted session.
pub fn initial_route(session: &Session) -> Route {
    match session.role {
        Some(role) if session.has_token() => Route::for_role(role),
        _ => Route::Login,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in [
            Route::Login,
            Route::Signup,
            Route::Dashboard(Role::User),
            Route::Dashboard(Role::Admin),
            Route::Dashboard(Role::StoreOwner),
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(
            Route::from_path("/dashboard/admin/"),
            Some(Route::Dashboard(Role::Admin))
        );
        assert_eq!(Route::from_path("/dashboard/store_owner"), None);
    }

    #[test]
    fn test_guard_allows_matching_role() {
        let session = Session::new("t", Role::Admin);
        let admin = Route::Dashboard(Role::Admin);
        assert_eq!(guard(admin, &session), admin);
    }

    #[test]
    fn test_guard_redirects_other_role_to_own_dashboard() {
        let session = Session::new("t", Role::User);
        assert_eq!(
            guard(Route::Dashboard(Role::Admin), &session),
            Route::Dashboard(Role::User)
        );
    }

    #[test]
    fn test_guard_without_token_goes_to_login() {
        let session = Session {
            token: None,
            role: Some(Role::Admin),
        };
        assert_eq!(guard(Route::Dashboard(Role::Admin), &session), Route::Login);
        assert_eq!(
            guard(Route::Dashboard(Role::User), &Session::default()),
            Route::Login
        );
    }

    #[test]
    fn test_public_routes_always_reachable() {
        assert_eq!(guard(Route::Signup, &Session::default()), Route::Signup);
        assert_eq!(
            guard(Route::Login, &Session::new("t", Role::User)),
            Route::Login
        );
    }

    #[test]
    fn test_initial_route() {
        assert_eq!(initial_route(&Session::default()), Route::Login);
        assert_eq!(
            initial_route(&Session::new("t", Role::StoreOwner)),
            Route::Dashboard(Role::StoreOwner)
        );
    }
}
