//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (per-request hub, transaction)
//! 2. CORS
//! 3. `TraceLayer` (`http_request` span)
//! 4. Request ID (recorded on the span, echoed in the response)
//!
//! Authentication is not a layer: protected handlers take the
//! [`RequireAuth`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::RequireAuth;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
