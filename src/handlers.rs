use crate::{
    AppState,
    credentials::{MemoryStorage, SlotCredentials, TOKEN_SLOT, USER_SLOT},
    guard::{GuardPaths, NavigationGuard},
    models::{ChartSummary, Location, NavigationRequest, RouteSummary},
    navigator::{NavigationError, Navigator},
};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;

// --- Handlers ---

/// health
///
/// [Public] Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// list_routes
///
/// [Public] The flattened route table with each route's capability flags.
/// Lets the front end hide links the guard would redirect away from.
pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    Json(state.table.summaries())
}

/// list_charts
///
/// [Public] Chart components registered at startup.
pub async fn list_charts(State(state): State<AppState>) -> Json<Vec<ChartSummary>> {
    let charts = state
        .charts
        .components()
        .map(|component| ChartSummary {
            component,
            kind: component.kind(),
        })
        .collect();
    Json(charts)
}

/// check_navigation
///
/// [Public] Runs a full navigation, redirects included, against the
/// credentials supplied in the body instead of the caller's cookies.
///
/// Responses: 200 with the landing `Location`, 404 for an unknown path,
/// 508 when the redirect chain does not settle.
pub async fn check_navigation(
    State(state): State<AppState>,
    Json(payload): Json<NavigationRequest>,
) -> impl IntoResponse {
    let storage = MemoryStorage::new();
    if let Some(token) = &payload.token {
        storage.set_item(TOKEN_SLOT, token.as_str());
    }
    if let Some(user) = &payload.user {
        storage.set_item(USER_SLOT, user.as_str());
    }

    let guard = NavigationGuard::new(
        Arc::new(SlotCredentials::new(storage)),
        GuardPaths::from(&state.config),
    );
    let mut navigator = Navigator::new(state.table.clone(), guard, state.config.max_redirects);

    match navigator.navigate(&payload.path) {
        Ok(location) => (StatusCode::OK, Json(location)).into_response(),
        Err(e @ NavigationError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Err(e @ NavigationError::RedirectLoop { .. }) => {
            (StatusCode::LOOP_DETECTED, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// render_view
///
/// [Guarded View] Describes the view a path renders. Only reached after the
/// view guard middleware allowed the request.
pub async fn render_view(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Location>, StatusCode> {
    let matched = state
        .table
        .match_path(uri.path())
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(Location {
        path: uri.path().to_string(),
        name: matched.route.name.clone(),
        view: matched.route.view,
        params: matched.params,
        redirected_from: None,
    }))
}
