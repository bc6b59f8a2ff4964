//! Navigation guard: decides, before every route transition, whether the
//! destination view may be shown for the stored credentials.
//!
//! The guard is a UX convenience, not a security boundary. It checks token
//! presence only; the backend validates the token on first use.

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::credentials::CredentialReaderState;
use crate::models::{CredentialState, NavigationDecision};
use crate::routes::RouteDef;

/// GuardPaths
///
/// The two redirect targets. `fallback` is where an authenticated non-admin
/// lands instead of an admin view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    pub login: String,
    pub fallback: String,
}

impl GuardPaths {
    pub fn new(login: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            fallback: fallback.into(),
        }
    }
}

impl From<&AppConfig> for GuardPaths {
    fn from(config: &AppConfig) -> Self {
        Self::new(config.login_path.clone(), config.fallback_path.clone())
    }
}

/// decide
///
/// Ordered rules, first match wins:
/// 1. requires auth without a token goes to login;
/// 2. admin-only without a token or without admin rights goes to the fallback;
/// 3. everything else is allowed.
///
/// Rule 2 re-checks the token so an admin-only route missing `requires_auth`
/// still cannot be reached anonymously.
pub fn decide(
    route: &RouteDef,
    credentials: &CredentialState,
    paths: &GuardPaths,
) -> NavigationDecision {
    let access = route.access;

    if access.requires_auth && !credentials.is_authenticated() {
        return NavigationDecision::RedirectTo(paths.login.clone());
    }

    if access.admin_only && !credentials.is_admin() {
        return NavigationDecision::RedirectTo(paths.fallback.clone());
    }

    NavigationDecision::Allow
}

/// NavigationGuard
///
/// Binds `decide` to an injected credential reader. Every evaluation takes a
/// fresh snapshot; nothing is cached between navigations.
#[derive(Clone)]
pub struct NavigationGuard {
    credentials: CredentialReaderState,
    paths: GuardPaths,
}

impl NavigationGuard {
    pub fn new(credentials: CredentialReaderState, paths: GuardPaths) -> Self {
        Self { credentials, paths }
    }

    pub fn paths(&self) -> &GuardPaths {
        &self.paths
    }

    pub fn evaluate(&self, route: &RouteDef) -> NavigationDecision {
        let snapshot = self.credentials.snapshot();
        let decision = decide(route, &snapshot, &self.paths);
        debug!(
            route = %route.name,
            path = %route.path,
            authenticated = snapshot.is_authenticated(),
            admin = snapshot.is_admin(),
            ?decision,
            "guard decision"
        );
        decision
    }

    /// before_each
    ///
    /// Pre-navigation hook in the shape the host router calls it. `proceed`
    /// is invoked exactly once: with `None` to allow, or with the redirect
    /// target.
    pub fn before_each<F>(&self, to: &RouteDef, from: Option<&RouteDef>, proceed: F)
    where
        F: FnOnce(Option<&str>),
    {
        let decision = self.evaluate(to);
        if let NavigationDecision::RedirectTo(target) = &decision {
            info!(
                to = %to.path,
                from = from.map(|route| route.path.as_str()).unwrap_or("-"),
                redirect = %target,
                "navigation redirected"
            );
        }
        proceed(decision.redirect_target());
    }
}
