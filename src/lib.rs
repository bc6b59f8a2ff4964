use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::{HeaderName, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core decision path: configuration, credential reads, the guard itself.
pub mod config;
pub mod credentials;
pub mod guard;
pub mod models;
pub mod navigator;

// Route table, split by access tier (Public, Authenticated, Admin).
pub mod routes;

// Chart component bootstrap. Independent of the guard.
pub mod charts;

// HTTP shell handlers.
pub mod handlers;

use charts::ChartRegistry;
use credentials::{CookieStorage, SlotCredentials};
use guard::{GuardPaths, NavigationGuard};
use routes::RouteTable;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use guard::decide;
pub use models::{CredentialState, NavigationDecision, UserRecord};
pub use navigator::{NavigationError, Navigator};

/// RouteTableState
///
/// The route table shared by the view guard, the handlers and navigators.
pub type RouteTableState = Arc<RouteTable>;

/// AppState
///
/// Everything the HTTP shell needs, immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Route Table: flattened, validated at startup.
    pub table: RouteTableState,
    /// Configuration: redirect targets and limits.
    pub config: AppConfig,
    /// Chart components registered at process start.
    pub charts: &'static ChartRegistry,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RouteTableState {
    fn from_ref(app_state: &AppState) -> RouteTableState {
        app_state.table.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// view_guard_middleware
///
/// Runs the navigation guard in front of every view request.
///
/// *Mechanism*: resolves the requested path, reads the `token` and `user`
/// cookies into a fresh credential snapshot and hands the guard's hook a
/// `proceed` callback. Allowed requests continue to the view handler;
/// redirects answer `303 See Other`, and the browser's follow-up request goes
/// through this middleware again. Unknown paths are 404 before the guard runs.
async fn view_guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(route) = state.table.resolve(request.uri().path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let credentials = SlotCredentials::new(CookieStorage::from_headers(request.headers()));
    let guard = NavigationGuard::new(Arc::new(credentials), GuardPaths::from(&state.config));

    let mut redirect: Option<String> = None;
    guard.before_each(route, None, |target| {
        redirect = target.map(str::to_string);
    });

    match redirect {
        Some(target) => Redirect::to(&target).into_response(),
        None => next.run(request).await,
    }
}

/// create_router
///
/// Assembles the HTTP shell: public API routes, guarded view routes, and the
/// observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. API Routes: no guard; they describe the guard rather than sit behind it.
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/routes", get(handlers::list_routes))
        .route("/api/charts", get(handlers::list_charts))
        .route("/api/navigation", post(handlers::check_navigation));

    // 3. View Routes: every other GET path, behind the navigation guard.
    let view_routes = Router::new()
        .route("/", get(handlers::render_view))
        .route("/{*path}", get(handlers::render_view))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            view_guard_middleware,
        ));

    let base_router = Router::new()
        .merge(api_routes)
        .merge(view_routes)
        .with_state(state);

    // 4. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, URI and the `x-request-id` set by
/// the request-id layer, so every log line of one request correlates.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
