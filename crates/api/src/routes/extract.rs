//! Request extractors shared by the handlers.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections become [`AppError::Validation`].
///
/// Missing fields, wrong types, and non-JSON bodies all answer 400 with a
/// `{"message": ...}` body instead of axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
