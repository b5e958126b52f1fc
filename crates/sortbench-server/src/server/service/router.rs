use crate::server::{
    config::ServerConfig,
    service::{
        error::AppError,
        handler::{process_concurrent, process_single},
    },
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::post,
};
use core::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Builds the service router.
pub fn router(config: &ServerConfig) -> Router {
    let routes = Router::new()
        .route("/process-single", post(process_single))
        .route("/process-concurrent", post(process_concurrent));

    with_layers(routes, config)
}

/// Wraps `routes` in the service middleware.
///
/// Layers, innermost first:
/// - body limit from [`ServerConfig::max_body_bytes`] (disabled when unset),
/// - panic recovery, turning a handler panic into a JSON `500`,
/// - per-request logging at `INFO`.
pub(crate) fn with_layers(routes: Router, config: &ServerConfig) -> Router {
    let body_limit = match config.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    routes
        .layer(body_limit)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub(crate) fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    };

    tracing::error!("Recovered from handler panic: {details}");
    AppError::Panicked(details).into_response()
}
