mod config;
mod errors;
mod export;
mod format;
mod handlers;
mod lookup;
mod models;
mod normalize;
mod services;
mod translate;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::BenefitApiService;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, constructs the external API
/// clients and the shared display state, then serves the HTTP API with rate
/// limiting, request size limits, CORS and request tracing.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_in100_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Resolve the origin IP once; persistence rows carry it.
    let origin_ip = services::fetch_external_ip(config.ip_lookup_url.as_deref()).await;
    tracing::info!("Origin IP for persisted rows: {}", origin_ip);

    let benefit_api = BenefitApiService::new(&config)?;
    tracing::info!("IN100 client initialized: {}", config.in100_base_url);

    let port = config.port;
    let app_state = Arc::new(handlers::AppState::new(config, benefit_api, origin_ip));

    // Rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    let protected_routes = Router::new()
        .route("/api/v1/queries", post(handlers::run_query))
        .route("/api/v1/queries/current", get(handlers::current_query))
        .route(
            "/api/v1/queries/current/clipboard",
            get(handlers::current_query_clipboard),
        )
        .layer(
            ServiceBuilder::new()
                // Query payloads are tiny; 64KB is already generous.
                .layer(RequestBodyLimitLayer::new(64 * 1024))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
