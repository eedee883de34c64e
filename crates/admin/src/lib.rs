//! Chowline Admin library.
//!
//! Back-office JSON API: order handling, menu management, image uploads,
//! dashboard figures and revenue reports. Exposed as a library so the
//! router can be built in tests and the CLI can share the session store
//! setup.
//!
//! # Security
//!
//! Every data route requires a session created by an `admin` account.
//! Bind to a private interface unless it sits behind an authenticating
//! proxy.

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

/// Build the admin router.
///
/// Sentry layers are added by the binary.
pub fn app<Store>(state: AppState, store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(store, state.config());
    let uploads = ServeDir::new(state.uploads().dir());

    Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::readiness))
        .merge(routes::routes(state.config().max_upload_bytes))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .nest_service("/uploads", uploads)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id))
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::AdminConfig;

    fn test_app() -> Router {
        let config = AdminConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/chowline_test".to_string()),
            "ADMIN_BASE_URL" => Some("http://localhost:3001".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/chowline_test")
            .unwrap();
        app(AppState::new(config, pool), MemoryStore::default())
    }

    async fn status_and_body(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (
            status,
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _) =
            status_and_body(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_requires_admin_session() {
        for (method, uri) in [
            ("GET", "/auth/me"),
            ("GET", "/api/orders"),
            ("GET", "/api/orders/1"),
            ("GET", "/api/orders/1/items"),
            ("GET", "/api/products"),
            ("DELETE", "/api/products/1"),
            ("GET", "/api/dashboard/stats"),
            ("GET", "/api/reports/revenue"),
            ("POST", "/api/upload"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = status_and_body(request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body["error"], "Admin login required");
        }
    }

    #[tokio::test]
    async fn test_status_update_requires_admin_session() {
        let request = Request::put("/api/orders/1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"status": "completed"}"#))
            .unwrap();
        let (status, _) = status_and_body(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_email() {
        let request = Request::post("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "198.51.100.7")
            .body(Body::from(r#"{"email": "nope", "password": "whatever1"}"#))
            .unwrap();
        let (status, _) = status_and_body(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_login_body_is_a_json_error() {
        let request = Request::post("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "198.51.100.8")
            .body(Body::from("{\"email\": "))
            .unwrap();
        let (status, body) = status_and_body(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let request = Request::post("/auth/login")
            .header("x-forwarded-for", "198.51.100.8")
            .body(Body::from(r#"{"email": "chef@example.com"}"#))
            .unwrap();
        let (status, body) = status_and_body(request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_responses_carry_security_headers() {
        let response = test_app()
            .oneshot(Request::get("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["cache-control"], "no-store");
        assert!(headers.contains_key("x-request-id"));
    }
}
