//! Client-side cursor walking over `GET /messages`.
//!
//! The server returns at most `limit` messages with `id > lastMessageID`.
//! Feeding the last ID of each page back as the next cursor visits every
//! message once; a short page means we have caught up.

use std::time::Duration;

use anyhow::Result;
use natter_core::model::{ChannelId, MessageId};

use crate::client::{ApiClient, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
  pub channel_id: ChannelId,
  pub after_id:   MessageId,
  pub limit:      i64,
}

impl Cursor {
  /// Move past `page`. Returns `true` once the channel has no more messages
  /// beyond what has been seen.
  pub fn advance(&mut self, page: &[Message]) -> bool {
    if let Some(last) = page.last() {
      self.after_id = last.id;
    }
    (page.len() as i64) < self.limit
  }
}

/// Fetch pages until caught up, handing every message to `emit`.
pub async fn drain(
  client: &ApiClient,
  cursor: &mut Cursor,
  emit: &mut impl FnMut(&Message),
) -> Result<()> {
  loop {
    let page = client
      .page(cursor.channel_id, cursor.after_id, cursor.limit)
      .await?;
    for m in &page {
      emit(m);
    }
    if cursor.advance(&page) {
      return Ok(());
    }
  }
}

/// Like [`drain`], then keep polling every `interval` forever.
pub async fn follow(
  client: &ApiClient,
  cursor: &mut Cursor,
  interval: Duration,
  emit: &mut impl FnMut(&Message),
) -> Result<()> {
  loop {
    drain(client, cursor, &mut *emit).await?;
    tokio::time::sleep(interval).await;
  }
}

/// Render one message as a terminal line.
pub fn format_line(m: &Message) -> String {
  let author = if m.user_name.is_empty() {
    format!("user#{}", m.user_id)
  } else {
    m.user_name.clone()
  };
  match m.created_at {
    Some(at) => format!("[{}] {} {}: {}", m.id, at.format("%Y-%m-%d %H:%M:%S"), author, m.text),
    None => format!("[{}] {}: {}", m.id, author, m.text),
  }
}
