//! JSON REST API for Natter.
//!
//! Exposes an axum [`Router`] backed by any [`natter_core::store::ChatStore`].
//! TLS, CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = natter_api::api_router(Arc::new(store), ApiOptions::default());
//! ```

pub mod channels;
pub mod error;
pub mod extract;
pub mod messages;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use natter_core::store::ChatStore;
use serde_json::{Value, json};

pub use error::ApiError;

// ─── Options ──────────────────────────────────────────────────────────────────

/// Tunables for the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct ApiOptions {
  /// Upper bound applied to the `limit` of every message page.
  pub max_page_size: i64,
}

impl Default for ApiOptions {
  fn default() -> Self { Self { max_page_size: 1000 } }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub options: ApiOptions,
}

// `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), options: self.options }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: ChatStore + 'static,
{
  Router::new()
    // Identity
    .route("/users", post(users::register::<S>))
    .route("/login", post(users::login::<S>))
    // Channels
    .route("/channels", get(channels::list::<S>).post(channels::create::<S>))
    // Messages
    .route("/messages", get(messages::list::<S>).post(messages::create::<S>))
    .route("/health", get(health))
    .with_state(AppState { store, options })
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
