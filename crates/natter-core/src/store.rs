//! Store traits for identities, channels and the message ledger.
//!
//! The traits are implemented by storage backends (e.g.
//! `natter-store-sqlite`). Higher layers (`natter-api`) depend on this
//! abstraction, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  model::{Channel, ChannelId, EnrichedMessage, MessageId, NewMessage, UserId},
  page::PageRequest,
};

// ─── Identity ────────────────────────────────────────────────────────────────

pub trait IdentityStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Create a user and return its freshly generated ID.
  ///
  /// Usernames are not required to be unique.
  fn register<'a>(
    &'a self,
    username: &'a str,
    credential: &'a str,
  ) -> impl Future<Output = Result<UserId, Self::Error>> + Send + 'a;

  /// Return the ID of the user whose username and credential both match.
  ///
  /// When more than one user matches, the lowest ID wins. Fails with an error
  /// that converts to [`crate::Error::NotFound`] when nothing matches; an
  /// unknown username and a wrong credential are indistinguishable.
  fn authenticate<'a>(
    &'a self,
    username: &'a str,
    credential: &'a str,
  ) -> impl Future<Output = Result<UserId, Self::Error>> + Send + 'a;

  /// Resolve a user ID to its username. `None` is a normal outcome.
  fn display_name(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;
}

// ─── Channels ────────────────────────────────────────────────────────────────

pub trait ChannelRegistry: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Create a channel. Names are not required to be unique.
  fn create_channel<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<ChannelId, Self::Error>> + Send + 'a;

  /// All channels, ascending by ID.
  fn list_channels(
    &self,
  ) -> impl Future<Output = Result<Vec<Channel>, Self::Error>> + Send + '_;
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// Append-only, ID-ordered log of every message in every channel.
pub trait MessageLedger: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Persist a message and return its ID. `created_at` is set by the store.
  ///
  /// IDs are unique and strictly increasing across all channels, including
  /// under concurrent appends. The message is visible to [`page`] once this
  /// returns.
  ///
  /// [`page`]: MessageLedger::page
  fn append(
    &self,
    message: NewMessage,
  ) -> impl Future<Output = Result<MessageId, Self::Error>> + Send + '_;

  /// Messages of `req.channel_id` with `id > req.after_id`, ascending by ID,
  /// at most `req.limit` of them, each joined with its author's name.
  fn page(
    &self,
    req: PageRequest,
  ) -> impl Future<Output = Result<Vec<EnrichedMessage>, Self::Error>> + Send + '_;
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Everything the HTTP layer needs from a backend.
pub trait ChatStore: IdentityStore + ChannelRegistry + MessageLedger {}

impl<T> ChatStore for T where T: IdentityStore + ChannelRegistry + MessageLedger {}
