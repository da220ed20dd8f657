//! Handlers for `/messages`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/messages` | Body: `{"channel_id":1,"user_id":2,"text":"..."}` |
//! | `GET`  | `/messages` | `?channelID` required; optional `limit` (100, at most `max_page_size`), `lastMessageID` (0) |
//!
//! `GET /messages` is cursor-paginated: pass the last `id` of one page as
//! `lastMessageID` to fetch the next. A page shorter than `limit` means the
//! caller has caught up.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use natter_core::{
  model::{ChannelId, EnrichedMessage, MessageId, NewMessage, UserId},
  page::PageRequest,
  store::ChatStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{ApiError, store_err},
  extract::{ApiJson, ApiQuery},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub channel_id: ChannelId,
  pub user_id:    UserId,
  pub text:       String,
}

#[derive(Debug, Serialize)]
pub struct MessageCreated {
  pub id: MessageId,
}

/// `POST /messages`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<Json<MessageCreated>, ApiError>
where
  S: ChatStore,
{
  let id = state
    .store
    .append(NewMessage::new(body.channel_id, body.user_id, body.text))
    .await
    .map_err(store_err)?;
  Ok(Json(MessageCreated { id }))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// Raw query parameters. Kept as strings so that parsing failures surface as
/// `InvalidArgument` with a descriptive message.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  #[serde(rename = "channelID")]
  pub channel_id:      Option<String>,
  pub limit:           Option<String>,
  #[serde(rename = "lastMessageID")]
  pub last_message_id: Option<String>,
}

/// Wire shape of one message in a page.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageView {
  pub id:         MessageId,
  pub channel_id: ChannelId,
  pub user_id:    UserId,
  /// Empty when the author does not resolve to a user.
  pub user_name:  String,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

impl From<EnrichedMessage> for MessageView {
  fn from(m: EnrichedMessage) -> Self {
    MessageView {
      id:         m.message.id,
      channel_id: m.message.channel_id,
      user_id:    m.message.author_id,
      user_name:  m.author_name.unwrap_or_default(),
      text:       m.message.text,
      created_at: m.message.created_at,
    }
  }
}

/// `GET /messages?channelID=<id>[&limit=<n>][&lastMessageID=<id>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<MessageView>>, ApiError>
where
  S: ChatStore,
{
  let req = PageRequest::from_params(
    params.channel_id.as_deref(),
    params.limit.as_deref(),
    params.last_message_id.as_deref(),
  )?
  .within(state.options.max_page_size)?;

  let page = state.store.page(req).await.map_err(store_err)?;
  Ok(Json(page.into_iter().map(MessageView::from).collect()))
}
