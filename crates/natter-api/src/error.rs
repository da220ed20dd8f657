//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// An error returned by an API handler. Always rendered as
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<natter_core::Error> for ApiError {
  fn from(e: natter_core::Error) -> Self {
    match e {
      natter_core::Error::InvalidArgument(m) => ApiError::BadRequest(m),
      natter_core::Error::NotFound(m) => ApiError::Unauthorized(m),
      natter_core::Error::StorageUnavailable(e) => ApiError::Store(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

/// Convert any backend error into an [`ApiError`] via the core taxonomy.
pub fn store_err<E: Into<natter_core::Error>>(e: E) -> ApiError {
  ApiError::from(e.into())
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => {
        debug!("rejected request: {m}");
        (StatusCode::BAD_REQUEST, m.clone())
      }
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Store(e) => {
        error!("store error: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
