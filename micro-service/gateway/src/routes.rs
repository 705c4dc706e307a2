use crate::handlers::graphql::{graphql_handler, graphql_playground, health_check};
use crate::service::GatewayService;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use axum::{Router, extract::Extension, routing::get, routing::post};
use tower_http::limit::RequestBodyLimitLayer;

use app_config::AppConfig;
use app_error::middleware_handling::error_handling_middleware;
use app_middleware::{logging_middleware, security_headers_middleware};

pub fn create_routes(service: Arc<GatewayService>, config: &AppConfig) -> Router {
    // Get body limit and CORS settings from config
    let body_limit = config.server.body_limit;
    let cors_config = &config.security.cors;

    // Configure CORS with settings from config
    let cors = CorsLayer::new()
        // If allowed_origins contains "*", use Any, otherwise use exact list
        .allow_origin(
            if cors_config.allowed_origins.contains(&"*".to_string()) {
                tower_http::cors::AllowOrigin::any()
            } else {
                tower_http::cors::AllowOrigin::list(
                    cors_config
                        .allowed_origins
                        .iter()
                        .filter_map(|origin| origin.parse().ok())
                        .collect::<Vec<_>>(),
                )
            },
        )
        // Convert allowed methods from strings to HTTP methods
        .allow_methods(
            cors_config
                .allowed_methods
                .iter()
                .filter_map(|method| method.parse().ok())
                .collect::<Vec<_>>(),
        )
        // Convert allowed headers from strings to HTTP header names
        .allow_headers(
            cors_config
                .allowed_headers
                .iter()
                .filter_map(|header| header.parse().ok())
                .collect::<Vec<_>>(),
        );

    // Define global middleware stack WITHOUT the body limit
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout_secs)))
        .layer(cors);

    // Build router; the playground routes are config-gated
    let app = Router::new().route("/health", get(health_check));

    let app = if config.gateway.playground {
        app.route("/", get(graphql_playground))
            .route("/graphql", get(graphql_playground).post(graphql_handler))
    } else {
        app.route("/graphql", post(graphql_handler))
    };

    // Add Extensions
    let app = app.layer(Extension(Arc::clone(&service)));

    // Apply middleware in order
    let app = app
        .layer(axum::middleware::from_fn(error_handling_middleware))
        .layer(RequestBodyLimitLayer::new(body_limit));

    // Apply custom middleware stacks
    let app = app
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware));

    // Apply global middleware stack
    app.layer(middleware_stack)
}
