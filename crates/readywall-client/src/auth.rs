//! Login, logout and the route guard

use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::session::{Credentials, Session, TokenStore};
use std::fmt;
use tracing::{debug, info};

/// Screens of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in screen
    Login,
    /// Counts and recent leads
    Dashboard,
    /// Leads
    Leads,
    /// Products
    Products,
    /// Blog posts
    Blogs,
    /// Customer inquiries
    Messages,
    /// Registered users
    Users,
}

impl Route {
    /// Every route
    pub const ALL: [Self; 7] = [
        Self::Login,
        Self::Dashboard,
        Self::Leads,
        Self::Products,
        Self::Blogs,
        Self::Messages,
        Self::Users,
    ];

    /// URL path of the screen
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/",
            Self::Leads => "/leads",
            Self::Products => "/products",
            Self::Blogs => "/blogs",
            Self::Messages => "/messages",
            Self::Users => "/users",
        }
    }

    /// Route for a URL path
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Whether the screen needs a session
    pub const fn requires_session(self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What to do with a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the requested screen
    Render(Route),
    /// Show another screen instead
    Redirect(Route),
}

/// Gate in front of every protected screen
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGuard;

impl SessionGuard {
    /// Render `route` when it is public or a token is present; otherwise
    /// redirect to the login screen
    pub fn check(route: Route, session: Option<&Session>) -> RouteDecision {
        if !route.requires_session() || session.is_some_and(Session::is_authenticated) {
            RouteDecision::Render(route)
        } else {
            debug!(%route, "no session, redirecting to login");
            RouteDecision::Redirect(Route::Login)
        }
    }
}

/// Exchange credentials for a token and persist the session
///
/// Nothing is stored unless the gateway accepts the credentials.
///
/// # Errors
///
/// Returns the gateway's error, or a storage error if the session cannot be saved.
pub async fn login(
    gateway: &Gateway,
    store: &dyn TokenStore,
    credentials: &Credentials,
) -> GatewayResult<Session> {
    let session = gateway.login(credentials).await?;
    store.save(&session).await?;
    info!(email = %credentials.email, "admin signed in");
    Ok(session)
}

/// Forget the stored session
///
/// # Errors
///
/// Returns an error if the stored session cannot be removed.
pub async fn logout(store: &dyn TokenStore) -> readywall_core::Result<()> {
    store.clear().await?;
    info!("admin signed out");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Route::Dashboard)]
    #[case(Route::Leads)]
    #[case(Route::Products)]
    #[case(Route::Blogs)]
    #[case(Route::Messages)]
    #[case(Route::Users)]
    fn test_protected_routes_redirect_without_token(#[case] route: Route) {
        assert_eq!(
            SessionGuard::check(route, None),
            RouteDecision::Redirect(Route::Login)
        );
        assert_eq!(
            SessionGuard::check(route, Some(&Session::anonymous())),
            RouteDecision::Redirect(Route::Login)
        );
        assert_eq!(
            SessionGuard::check(route, Some(&Session::new("tok", None))),
            RouteDecision::Render(route)
        );
    }

    #[test]
    fn test_login_route_always_renders() {
        assert_eq!(
            SessionGuard::check(Route::Login, None),
            RouteDecision::Render(Route::Login)
        );
    }

    #[rstest]
    #[case("/", Some(Route::Dashboard))]
    #[case("", Some(Route::Dashboard))]
    #[case("/leads/", Some(Route::Leads))]
    #[case("/messages", Some(Route::Messages))]
    #[case("/settings", None)]
    fn test_route_from_path(#[case] path: &str, #[case] expected: Option<Route>) {
        assert_eq!(Route::from_path(path), expected);
    }

    #[tokio::test]
    async fn test_logout_clears_store() {
        let store = MemoryTokenStore::with_session(Session::new("tok", None));

        logout(&store).await.unwrap();

        assert!(store.load().await.unwrap().is_none());
    }
}
