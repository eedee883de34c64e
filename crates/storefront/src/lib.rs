//! Chowline Storefront library.
//!
//! The customer-facing JSON API: menu, session cart, checkout, order history,
//! account dashboard and password authentication. Exposed as a library so
//! the router can be built in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::state::AppState;

/// Directory the keyword fallback images are served from.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the storefront router.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app<Store>(state: AppState, store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(store, state.config());
    let uploads = ServeDir::new(&state.config().uploads_dir);

    let api = routes::routes().layer(axum::middleware::from_fn(
        middleware::security_headers_middleware,
    ));

    Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::readiness))
        .merge(api)
        .nest_service("/uploads", uploads)
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
