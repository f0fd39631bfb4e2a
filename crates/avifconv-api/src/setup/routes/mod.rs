//! Route configuration and setup.

use crate::api_doc::openapi_json;
use crate::handlers::{convert, service};
use crate::middleware::{content_length_guard, BodyLimit};
use crate::state::AppState;
use avifconv_core::Config;
use avifconv_infra::request_id_middleware;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = BodyLimit::new(config.max_file_size_bytes);

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_request_bytes = body_limit.max_request_size(),
        "HTTP limits configured"
    );

    let conversion_routes = Router::new()
        .route("/convert", post(convert::convert))
        .route("/convert-stream", post(convert::convert_stream))
        .route("/convert-jpeg", post(convert::convert_jpeg))
        .layer(DefaultBodyLimit::max(body_limit.max_request_size()))
        .layer(axum::middleware::from_fn_with_state(
            body_limit,
            content_length_guard,
        ));

    let app = Router::new()
        .route("/", get(service::service_info))
        .route("/health", get(service::health_check))
        .route("/openapi.json", get(openapi_json))
        .merge(conversion_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
