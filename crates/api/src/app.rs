use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::notification::{LoggingNotifier, RequestNotifier};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{devices, health, requests};
use crate::services::{DeviceRegistry, RequestWorkflow};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub registry: DeviceRegistry,
    pub workflow: RequestWorkflow,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: PgPool,
        notifier: Option<Arc<dyn RequestNotifier>>,
    ) -> Result<Self, JwtError> {
        let jwt = JwtConfig::with_leeway(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        Ok(Self {
            registry: DeviceRegistry::new(pool.clone()),
            workflow: RequestWorkflow::new(pool.clone(), notifier),
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        })
    }
}

/// Build the application with the notifier selected by configuration.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let notifier: Option<Arc<dyn RequestNotifier>> = if config.notifications.enabled {
        Some(Arc::new(LoggingNotifier::new()))
    } else {
        None
    };

    let state = AppState::new(config, pool, notifier)?;
    Ok(build_router(state))
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated routes; the UserAuth extractor rejects missing or invalid tokens.
    let device_routes = Router::new()
        .route(
            "/api/v1/devices",
            post(devices::create_device).get(devices::list_devices),
        )
        .route(
            "/api/v1/devices/:device_id",
            get(devices::get_device)
                .patch(devices::update_device)
                .delete(devices::delete_device),
        )
        .route(
            "/api/v1/devices/:device_id/requests",
            post(requests::submit_request),
        );

    let request_routes = Router::new()
        .route("/api/v1/requests", get(requests::list_requests))
        .route("/api/v1/requests/:request_id", get(requests::get_request))
        .route(
            "/api/v1/requests/:request_id/process",
            post(requests::process_request),
        )
        .route(
            "/api/v1/requests/:request_id/cancel",
            post(requests::cancel_request),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(device_routes)
        .merge(request_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
