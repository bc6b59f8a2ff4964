use axum::http::HeaderValue;
use std::env;

/// AppConfig
///
/// Holds the portal's configuration. Immutable once loaded and pulled into the
/// application state via FromRef, so the guard, the navigator and the HTTP shell
/// all see the same login/fallback targets.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and the bind-address policy.
    pub env: Env,
    // Socket address the HTTP shell listens on.
    pub bind_addr: String,
    // Where unauthenticated users are sent (guard rule 1).
    pub login_path: String,
    // Where authenticated non-admins are sent from admin routes (guard rule 2).
    pub fallback_path: String,
    // Upper bound on redirect hops followed by a single navigation.
    pub max_redirects: usize,
    // Route matching mode. Off by default, matching the host router.
    pub case_sensitive_routes: bool,
}

/// Env
///
/// Defines the runtime context: pretty logs and permissive defaults locally,
/// JSON logs and explicit settings in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_FALLBACK_PATH: &str = "/userdashboard";
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration used for test state setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            case_sensitive_routes: false,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables and fails fast on
    /// anything that would leave the guard with an unusable redirect target.
    ///
    /// # Panics
    /// Panics if `PORTAL_BIND_ADDR` is missing in production, if either redirect
    /// path does not start with `/` or is not a valid header value, if both
    /// redirect paths are equal, or if `PORTAL_MAX_REDIRECTS` is not a
    /// non-negative integer.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = match env {
            Env::Production => env::var("PORTAL_BIND_ADDR")
                .expect("FATAL: PORTAL_BIND_ADDR must be set in production."),
            Env::Local => {
                env::var("PORTAL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            }
        };

        let login_path =
            env::var("PORTAL_LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string());
        let fallback_path =
            env::var("PORTAL_FALLBACK_PATH").unwrap_or_else(|_| DEFAULT_FALLBACK_PATH.to_string());

        assert!(
            login_path.starts_with('/'),
            "FATAL: PORTAL_LOGIN_PATH must start with '/' (got {login_path:?})."
        );
        assert!(
            fallback_path.starts_with('/'),
            "FATAL: PORTAL_FALLBACK_PATH must start with '/' (got {fallback_path:?})."
        );
        assert!(
            HeaderValue::from_str(&login_path).is_ok(),
            "FATAL: PORTAL_LOGIN_PATH must be a valid Location header value (got {login_path:?})."
        );
        assert!(
            HeaderValue::from_str(&fallback_path).is_ok(),
            "FATAL: PORTAL_FALLBACK_PATH must be a valid Location header value (got {fallback_path:?})."
        );
        assert!(
            login_path != fallback_path,
            "FATAL: PORTAL_LOGIN_PATH and PORTAL_FALLBACK_PATH must differ."
        );

        let max_redirects = match env::var("PORTAL_MAX_REDIRECTS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .expect("FATAL: PORTAL_MAX_REDIRECTS must be a non-negative integer."),
            Err(_) => DEFAULT_MAX_REDIRECTS,
        };

        let case_sensitive_routes = env::var("PORTAL_CASE_SENSITIVE_ROUTES")
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            env,
            bind_addr,
            login_path,
            fallback_path,
            max_redirects,
            case_sensitive_routes,
        }
    }
}
