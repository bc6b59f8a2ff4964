use parking_portal::{
    AppState,
    charts,
    config::{AppConfig, Env},
    create_router,
    routes::portal_route_table,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, chart registration, route table,
/// then the HTTP shell.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise debug for the portal so guard decisions show up.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "parking_portal=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Portal starting in {:?} mode", config.env);

    // 4. Chart Components (once per process, unrelated to routing)
    let charts = charts::install();

    // 5. Route Table
    let table = portal_route_table(config.case_sensitive_routes)
        .expect("FATAL: portal route table is invalid.");

    if table.resolve(&config.login_path).is_none() {
        tracing::warn!(path = %config.login_path, "login path does not match any route");
    }
    if table.resolve(&config.fallback_path).is_none() {
        tracing::warn!(path = %config.fallback_path, "fallback path does not match any route");
    }

    tracing::info!(routes = table.len(), "route table loaded");

    // 6. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        table: Arc::new(table),
        config,
        charts,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind the portal listener.");

    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: portal server stopped unexpectedly.");
}
