//! Async HTTP client wrapping the natter JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use natter_core::model::{Channel, ChannelId, MessageId, UserId};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

/// One message as returned by `GET /messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub id:         MessageId,
  pub channel_id: ChannelId,
  pub user_id:    UserId,
  pub user_name:  String,
  pub text:       String,
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
  id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the natter JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  // ── Identity ──────────────────────────────────────────────────────────────

  /// `POST /users`
  pub async fn register(&self, username: &str, password: &str) -> Result<UserId> {
    let resp = self
      .client
      .post(self.url("/users"))
      .json(&json!({ "username": username, "password": password }))
      .send()
      .await
      .context("POST /users failed")?;
    Ok(decode::<IdResponse>(resp, "POST /users").await?.id)
  }

  /// `POST /login`
  pub async fn login(&self, username: &str, password: &str) -> Result<UserId> {
    let resp = self
      .client
      .post(self.url("/login"))
      .json(&json!({ "username": username, "password": password }))
      .send()
      .await
      .context("POST /login failed")?;
    Ok(decode::<IdResponse>(resp, "POST /login").await?.id)
  }

  // ── Channels ──────────────────────────────────────────────────────────────

  /// `GET /channels`
  pub async fn list_channels(&self) -> Result<Vec<Channel>> {
    let resp = self
      .client
      .get(self.url("/channels"))
      .send()
      .await
      .context("GET /channels failed")?;
    decode(resp, "GET /channels").await
  }

  /// `POST /channels`
  pub async fn create_channel(&self, name: &str) -> Result<ChannelId> {
    let resp = self
      .client
      .post(self.url("/channels"))
      .json(&json!({ "name": name }))
      .send()
      .await
      .context("POST /channels failed")?;
    Ok(decode::<IdResponse>(resp, "POST /channels").await?.id)
  }

  // ── Messages ──────────────────────────────────────────────────────────────

  /// `POST /messages`
  pub async fn send_message(
    &self,
    channel_id: ChannelId,
    user_id: UserId,
    text: &str,
  ) -> Result<MessageId> {
    let resp = self
      .client
      .post(self.url("/messages"))
      .json(&json!({ "channel_id": channel_id, "user_id": user_id, "text": text }))
      .send()
      .await
      .context("POST /messages failed")?;
    Ok(decode::<IdResponse>(resp, "POST /messages").await?.id)
  }

  /// `GET /messages?channelID=<id>&limit=<n>&lastMessageID=<cursor>`
  pub async fn page(
    &self,
    channel_id: ChannelId,
    after_id: MessageId,
    limit: i64,
  ) -> Result<Vec<Message>> {
    let resp = self
      .client
      .get(self.url("/messages"))
      .query(&[
        ("channelID", channel_id.to_string()),
        ("limit", limit.to_string()),
        ("lastMessageID", after_id.to_string()),
      ])
      .send()
      .await
      .context("GET /messages failed")?;
    decode(resp, "GET /messages").await
  }
}

/// Deserialize a success body, or turn the server's `{"error": ...}` into an
/// `anyhow` error.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    return resp.json().await.with_context(|| format!("deserialising {what} response"));
  }
  let detail = resp
    .json::<ErrorBody>()
    .await
    .map(|b| b.error)
    .unwrap_or_default();
  if detail.is_empty() {
    Err(anyhow!("{what} → {status}"))
  } else {
    Err(anyhow!("{what} → {status}: {detail}"))
  }
}
