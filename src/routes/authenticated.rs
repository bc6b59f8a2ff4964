use crate::models::ViewId;
use crate::routes::{RouteAccess, RouteDef};

/// Authenticated Route Module
///
/// Views for any signed-in user. The guard only checks that a token is
/// present; the backend rejects stale tokens on the first API call the view
/// makes.
pub fn authenticated_routes() -> Vec<RouteDef> {
    vec![
        // /userdashboard
        // Reservations and parking history. Also the fallback target for
        // non-admins hitting admin views, so it must not be admin-only.
        RouteDef::new("/userdashboard", "UserDashboard", ViewId::UserDashboard)
            .with_access(RouteAccess::AUTHENTICATED),
        // /profile
        RouteDef::new("/profile", "Profile", ViewId::Profile)
            .with_access(RouteAccess::AUTHENTICATED),
    ]
}
