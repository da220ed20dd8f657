//! Handlers for `/channels`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/channels` | All channels, ascending by id |
//! | `POST` | `/channels` | Body: `{"name":"general"}` |

use axum::{Json, extract::State};
use natter_core::{
  model::{Channel, ChannelId},
  store::ChatStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{ApiError, store_err},
  extract::ApiJson,
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /channels`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Channel>>, ApiError>
where
  S: ChatStore,
{
  let channels = state.store.list_channels().await.map_err(store_err)?;
  Ok(Json(channels))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ChannelCreated {
  pub id:      ChannelId,
  pub message: &'static str,
}

/// `POST /channels`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<Json<ChannelCreated>, ApiError>
where
  S: ChatStore,
{
  let id = state.store.create_channel(&body.name).await.map_err(store_err)?;
  Ok(Json(ChannelCreated { id, message: "Channel created successfully" }))
}
