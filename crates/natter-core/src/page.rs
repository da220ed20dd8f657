//! Pagination cursor protocol.
//!
//! A page is the slice of one channel's messages with `id > after_id`,
//! ascending by ID, at most `limit` long. Because message IDs are globally
//! monotonic, a caller that feeds the last ID it saw back in as `after_id`
//! walks the channel without gaps or repeats.

use crate::{
  Error, Result,
  model::{ChannelId, MessageId},
};

pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_AFTER_ID: MessageId = 0;

/// A validated page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub channel_id: ChannelId,
  /// Exclusive lower bound on message ID.
  pub after_id:   MessageId,
  /// Upper bound on the number of results. Never negative.
  pub limit:      i64,
}

impl PageRequest {
  /// First page of `channel_id` with the default limit.
  pub fn new(channel_id: ChannelId) -> Self {
    Self { channel_id, after_id: DEFAULT_AFTER_ID, limit: DEFAULT_LIMIT }
  }

  pub fn after(mut self, after_id: MessageId) -> Self {
    self.after_id = after_id;
    self
  }

  /// Panics in debug builds on a negative limit; use
  /// [`PageRequest::from_params`] for untrusted input.
  pub fn limit(mut self, limit: i64) -> Self {
    debug_assert!(limit >= 0, "negative page limit");
    self.limit = limit.max(0);
    self
  }

  /// Build a request from raw query-string values.
  ///
  /// `channel_id` is required. `limit` and `after_id` fall back to
  /// [`DEFAULT_LIMIT`] and [`DEFAULT_AFTER_ID`] when absent or empty. A
  /// present but non-numeric value, or a negative limit, is
  /// [`Error::InvalidArgument`].
  pub fn from_params(
    channel_id: Option<&str>,
    limit: Option<&str>,
    after_id: Option<&str>,
  ) -> Result<Self> {
    let channel_id = match non_empty(channel_id) {
      Some(raw) => raw
        .parse::<ChannelId>()
        .map_err(|_| Error::invalid("invalid channelID parameter"))?,
      None => return Err(Error::invalid("channelID is required")),
    };

    let limit = match non_empty(limit) {
      Some(raw) => raw
        .parse::<i64>()
        .map_err(|_| Error::invalid("invalid limit parameter"))?,
      None => DEFAULT_LIMIT,
    };
    if limit < 0 {
      return Err(Error::invalid("limit must not be negative"));
    }

    let after_id = match non_empty(after_id) {
      Some(raw) => raw
        .parse::<MessageId>()
        .map_err(|_| Error::invalid("invalid lastMessageID parameter"))?,
      None => DEFAULT_AFTER_ID,
    };

    Ok(Self { channel_id, after_id, limit })
  }

  /// Refuse a limit above `max` with [`Error::InvalidArgument`].
  ///
  /// A page shorter than `limit` must mean the caller has reached the end of
  /// the channel, so an oversized limit is rejected rather than clamped.
  pub fn within(self, max: i64) -> Result<Self> {
    if self.limit > max {
      return Err(Error::InvalidArgument(format!("limit must not exceed {max}")));
    }
    Ok(self)
  }

  /// `true` when the request can only ever produce an empty page. Covers a
  /// negative limit written directly into the public fields.
  pub fn is_empty(&self) -> bool { self.limit <= 0 }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
  raw.filter(|s| !s.is_empty())
}
