//! Users, channels and messages.
//!
//! Every entity carries a store-generated integer ID. Message IDs are strictly
//! increasing across the whole ledger, so they double as the pagination
//! cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ChannelId = i64;
pub type MessageId = i64;

// ─── Channels ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
  pub id:   ChannelId,
  pub name: String,
}

// ─── Messages ────────────────────────────────────────────────────────────────

/// Input to [`MessageLedger::append`](crate::store::MessageLedger::append).
///
/// Neither `channel_id` nor `author_id` is checked for existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
  pub channel_id: ChannelId,
  pub author_id:  UserId,
  pub text:       String,
}

impl NewMessage {
  pub fn new(channel_id: ChannelId, author_id: UserId, text: impl Into<String>) -> Self {
    Self { channel_id, author_id, text: text.into() }
  }
}

/// A persisted ledger entry. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub id:         MessageId,
  pub channel_id: ChannelId,
  pub author_id:  UserId,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

/// A message joined with its author's display name at read time.
///
/// `author_name` is `None` when `author_id` does not resolve to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMessage {
  pub message:     Message,
  pub author_name: Option<String>,
}

impl EnrichedMessage {
  /// The display name, or `""` for a dangling author reference.
  pub fn author_name_or_empty(&self) -> &str {
    self.author_name.as_deref().unwrap_or_default()
  }
}
