use crate::models::ViewId;
use crate::routes::RouteDef;

/// Public Route Module
///
/// Views reachable without a token: the landing page and the two gateway
/// forms. None of these carry capability flags.
pub fn public_routes() -> Vec<RouteDef> {
    vec![
        // /
        // Landing page with lot availability highlights.
        RouteDef::new("/", "home", ViewId::Home),
        // /login
        // Target of guard rule 1. Must stay public or every redirect would loop.
        RouteDef::new("/login", "login", ViewId::Login),
        // /register
        RouteDef::new("/register", "register", ViewId::Register),
    ]
}
