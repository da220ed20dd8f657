//! Conversions between SQLite column values and `natter-core` types.
//!
//! Timestamps written by the store are RFC 3339 strings. Rows inserted by
//! other tools may carry SQLite's `CURRENT_TIMESTAMP` format
//! (`YYYY-MM-DD HH:MM:SS`, UTC), which is accepted on read.

use chrono::{DateTime, NaiveDateTime, Utc};
use natter_core::model::{EnrichedMessage, Message};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|ndt| ndt.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `messages` row left-joined with `users.username`.
pub struct RawEnrichedMessage {
  pub id:          i64,
  pub channel_id:  i64,
  pub user_id:     i64,
  pub username:    Option<String>,
  pub text:        String,
  pub created_at:  String,
}

impl RawEnrichedMessage {
  pub const COLUMNS: &'static str =
    "m.id, m.channel_id, m.user_id, u.username, m.message, m.created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      channel_id: row.get(1)?,
      user_id:    row.get(2)?,
      username:   row.get(3)?,
      text:       row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_enriched(self) -> Result<EnrichedMessage> {
    Ok(EnrichedMessage {
      message:     Message {
        id:         self.id,
        channel_id: self.channel_id,
        author_id:  self.user_id,
        text:       self.text,
        created_at: decode_dt(&self.created_at)?,
      },
      author_name: self.username,
    })
  }
}
