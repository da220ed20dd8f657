//! Request extractors that report failures as [`ApiError`] JSON.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// Like [`axum::Json`], but a malformed or missing body becomes a
/// `400 {"error": ...}` instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Like [`axum::extract::Query`], with the same `{"error": ...}` rejection as
/// [`ApiJson`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
