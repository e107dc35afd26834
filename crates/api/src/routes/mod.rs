//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness probe
//! GET    /health/ready          - Readiness probe (pings the store)
//! GET    /api                   - Greeting
//!
//! # Accounts
//! POST   /api/register          - Create account, returns {token, user}
//! POST   /api/login             - Returns {token, user}
//! GET    /api/profile           - Current user (auth)
//!
//! # Catalog
//! GET    /api/items             - All items, newest first
//! POST   /api/items             - Create item (auth)
//! GET    /api/items/{id}        - Item detail
//! PUT    /api/items/{id}        - Replace item (auth)
//! DELETE /api/items/{id}        - Delete item (auth)
//!
//! # Cart (auth)
//! GET    /api/cart              - Caller's cart or {items: []}
//! POST   /api/cart              - Add product snapshot
//! DELETE /api/cart              - Clear cart
//! DELETE /api/cart/{productId}  - Remove one line
//! ```

pub mod auth;
pub mod cart;
pub mod extract;
pub mod health;
pub mod items;

use std::time::Duration;

use axum::{
    Router,
    http::{
        HeaderValue, Method, Request, Response,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{delete, get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// GET /api
async fn index() -> &'static str {
    "Hello Ecom API 🚀"
}

/// Create the account routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list).post(items::create))
        .route(
            "/{id}",
            get(items::show).put(items::update).delete(items::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/{product_id}", delete(cart::remove))
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(index))
        .nest("/api", auth_routes())
        .nest("/api/items", item_routes())
        .nest("/api/cart", cart_routes())
}

/// Build the complete application: routes, probes and the middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(cors)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS policy: any origin when `origins` is empty, otherwise exactly those.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
