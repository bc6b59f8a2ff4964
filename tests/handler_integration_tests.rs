use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use parking_portal::{
    AppConfig, AppState, charts, create_router, routes::portal_route_table,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

// --- Test Harness ---

fn test_app() -> Router {
    let config = AppConfig::default();
    let table = portal_route_table(config.case_sensitive_routes).unwrap();
    create_router(AppState {
        table: Arc::new(table),
        config,
        charts: charts::install(),
    })
}

async fn get(uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    test_app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_navigation(body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/navigation")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    test_app().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

// --- API Routes ---

#[tokio::test]
async fn test_health_check() {
    let response = get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let response = get("/health", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_list_routes_exposes_flags() {
    let response = get("/api/routes", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let routes = json_body(response).await;
    let admin = routes
        .as_array()
        .unwrap()
        .iter()
        .find(|route| route["path"] == "/admindashboard")
        .unwrap();
    assert_eq!(admin["requires_auth"], true);
    assert_eq!(admin["admin_only"], true);
    assert_eq!(admin["view"], "AdminDashboard");
}

#[tokio::test]
async fn test_list_charts() {
    let response = get("/api/charts", None).await;
    let charts = json_body(response).await;
    assert_eq!(charts.as_array().unwrap().len(), 13);
}

// --- Navigation API ---

#[tokio::test]
async fn test_navigation_anonymous_admin_goes_to_login() {
    let response = post_navigation(json!({ "path": "/admindashboard" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["path"], "/login");
    assert_eq!(body["redirected_from"], "/admindashboard");
}

#[tokio::test]
async fn test_navigation_regular_user_admin_goes_to_user_dashboard() {
    let response = post_navigation(json!({
        "path": "/admindashboard",
        "token": "abc",
        "user": "{\"is_admin\":false}",
    }))
    .await;

    let body = json_body(response).await;
    assert_eq!(body["path"], "/userdashboard");
}

#[tokio::test]
async fn test_navigation_malformed_user_is_non_admin() {
    let response = post_navigation(json!({
        "path": "/admindashboard/add-parking-lot",
        "token": "abc",
        "user": "{is_admin:true",
    }))
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["path"], "/userdashboard");
}

#[tokio::test]
async fn test_navigation_admin_is_allowed() {
    let response = post_navigation(json!({
        "path": "/admindashboard",
        "token": "abc",
        "user": "{\"is_admin\":true}",
    }))
    .await;

    let body = json_body(response).await;
    assert_eq!(body["path"], "/admindashboard");
    assert!(body.get("redirected_from").is_none());
}

#[tokio::test]
async fn test_navigation_unknown_path_is_404() {
    let response = post_navigation(json!({ "path": "/lots/99" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// --- Guarded Views ---

#[tokio::test]
async fn test_public_view_renders_without_cookies() {
    let response = get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["view"], "Home");
}

#[tokio::test]
async fn test_protected_view_redirects_to_login() {
    let response = get("/profile", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_admin_view_redirects_regular_user_to_fallback() {
    let response = get(
        "/admindashboard",
        Some("token=abc; user={\"is_admin\":false}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/userdashboard"));
}

#[tokio::test]
async fn test_admin_view_renders_for_admin() {
    let response = get(
        "/admindashboard/add-parking-lot",
        Some("token=abc; user={\"is_admin\":true}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["view"], "AddParkingLots");
}

#[tokio::test]
async fn test_percent_encoded_admin_cookie_renders_admin_view() {
    let response = get(
        "/admindashboard",
        Some("token=abc; user=%7B%22id%22%3A1%2C%22is_admin%22%3Atrue%7D"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["view"], "AdminDashboard");
}

#[tokio::test]
async fn test_followed_redirect_is_allowed() {
    // The redirect target goes back through the guard on the next request.
    let first = get("/admindashboard", Some("token=abc")).await;
    let target = location(&first).unwrap().to_string();

    let second = get(&target, Some("token=abc")).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await["view"], "UserDashboard");
}

#[tokio::test]
async fn test_unknown_view_is_404() {
    let response = get("/parking-lots/7", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
