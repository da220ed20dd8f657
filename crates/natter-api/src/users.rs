//! Handlers for registration and login.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"username":"...","password":"..."}` |
//! | `POST` | `/login` | Same body; 401 when no user matches |

use axum::{Json, extract::State};
use natter_core::{model::UserId, store::ChatStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{ApiError, store_err},
  extract::ApiJson,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserCreated {
  pub id:      UserId,
  pub message: &'static str,
}

/// `POST /users`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<CredentialsBody>,
) -> Result<Json<UserCreated>, ApiError>
where
  S: ChatStore,
{
  let id = state
    .store
    .register(&body.username, &body.password)
    .await
    .map_err(store_err)?;
  Ok(Json(UserCreated { id, message: "User created successfully" }))
}

/// `POST /login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<CredentialsBody>,
) -> Result<Json<UserCreated>, ApiError>
where
  S: ChatStore,
{
  let id = state
    .store
    .authenticate(&body.username, &body.password)
    .await
    .map_err(store_err)?;
  Ok(Json(UserCreated { id, message: "User Login Successfully" }))
}
