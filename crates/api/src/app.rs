use axum::{middleware, routing::get, Router};
use domain::ports::InvitationRepository;
use domain::services::ReferralService;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{health, referrals, versioning};

#[derive(Clone)]
pub struct AppState {
    pub service: ReferralService,
    /// Same store the service uses; health probes ping it directly.
    pub repository: Arc<dyn InvitationRepository>,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, repository: Arc<dyn InvitationRepository>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        service: ReferralService::new(repository.clone(), config.referral_settings()),
        repository,
        config: config.clone(),
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
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

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Global middleware: bottom layers run first
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", referrals::router())
        .merge(versioning::legacy_router())
        .layer(middleware::from_fn_with_state(
            config.security.hsts_enabled,
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
