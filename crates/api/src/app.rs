use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use shared::jwt::{JwtError, TokenVerifier};
use sqlx::PgPool;
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
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware,
    trace_id,
};
use crate::routes::{bookings, health, organizations, team_group_mappings};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub verifier: Arc<TokenVerifier>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Development: allow any origin
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
    }
}

/// Builds the router. Fails when the configured JWT public key is unusable.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let verifier = TokenVerifier::from_rsa_pem(&config.jwt.public_key, config.jwt.leeway_secs)?;
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        verifier: Arc::new(verifier),
    };

    // Routes requiring a user access token
    let protected_routes = Router::new()
        .route("/api/v1/bookings", get(bookings::list_bookings))
        .route(
            "/api/v1/bookings/:booking_uid/no-show",
            post(bookings::mark_no_show),
        )
        .route(
            "/api/v1/bookings/:booking_id/location",
            patch(bookings::edit_location),
        )
        .route(
            "/api/v1/organizations/accessible-users",
            get(organizations::accessible_users),
        )
        .route(
            "/api/v1/organizations/members",
            get(organizations::organization_members),
        )
        .route(
            "/api/v1/organizations/:org_id/team-group-mappings",
            get(team_group_mappings::list_mappings).post(team_group_mappings::create_mapping),
        )
        .route(
            "/api/v1/organizations/:org_id/team-group-mappings/:mapping_id",
            get(team_group_mappings::get_mapping).delete(team_group_mappings::delete_mapping),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Route layer so the matched path is known when labelling
        .route_layer(middleware::from_fn(metrics_middleware))
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config))
        .with_state(state))
}
