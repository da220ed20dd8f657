//! [`SqliteStore`], the SQLite implementation of the Natter store traits.

use std::path::Path;

use chrono::Utc;
use natter_core::{
  credential::CredentialScheme,
  model::{Channel, ChannelId, EnrichedMessage, MessageId, NewMessage, UserId},
  page::PageRequest,
  store::{ChannelRegistry, IdentityStore, MessageLedger},
};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{RawEnrichedMessage, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Natter store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  scheme: CredentialScheme,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let shown = path.as_ref().display().to_string();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, scheme: CredentialScheme::default() };
    store.init_schema().await?;
    info!(path = %shown, "database opened");
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, scheme: CredentialScheme::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Store and compare credentials with `scheme` from now on.
  ///
  /// Existing rows are not rewritten, so switching schemes on a populated
  /// database locks out users registered under the previous one.
  pub fn with_credential_scheme(mut self, scheme: CredentialScheme) -> Self {
    self.scheme = scheme;
    self
  }

  pub fn credential_scheme(&self) -> CredentialScheme { self.scheme }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Seal a credential for storage. Hashing schemes run off the async
  /// runtime.
  async fn seal(&self, raw: &str) -> Result<String> {
    let scheme = self.scheme;
    if scheme.is_exact_match() {
      return Ok(scheme.seal(raw)?);
    }
    let raw = raw.to_owned();
    Ok(tokio::task::spawn_blocking(move || scheme.seal(&raw)).await??)
  }
}

// ─── IdentityStore impl ──────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  type Error = Error;

  async fn register(&self, username: &str, credential: &str) -> Result<UserId> {
    let sealed   = self.seal(credential).await?;
    let username = username.to_owned();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, password) VALUES (?1, ?2)",
          rusqlite::params![username, sealed],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    debug!(user_id = id, "user registered");
    Ok(id)
  }

  async fn authenticate(&self, username: &str, credential: &str) -> Result<UserId> {
    let username   = username.to_owned();
    let credential = credential.to_owned();

    if self.scheme.is_exact_match() {
      // Default BINARY collation makes `=` a byte-for-byte comparison.
      let id: Option<UserId> = self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id FROM users
                 WHERE username = ?1 AND password = ?2
                 ORDER BY id ASC
                 LIMIT 1",
                rusqlite::params![username, credential],
                |row| row.get(0),
              )
              .optional()?,
          )
        })
        .await?;
      return id.ok_or(Error::InvalidCredentials);
    }

    let candidates: Vec<(UserId, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, password FROM users WHERE username = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![username], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let scheme = self.scheme;
    let matched = tokio::task::spawn_blocking(move || {
      candidates
        .into_iter()
        .find(|(_, stored)| scheme.verify(&credential, stored))
        .map(|(id, _)| id)
    })
    .await?;

    matched.ok_or(Error::InvalidCredentials)
  }

  async fn display_name(&self, id: UserId) -> Result<Option<String>> {
    let name: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT username FROM users WHERE id = ?1",
              rusqlite::params![id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(name)
  }
}

// ─── ChannelRegistry impl ────────────────────────────────────────────────────

impl ChannelRegistry for SqliteStore {
  type Error = Error;

  async fn create_channel(&self, name: &str) -> Result<ChannelId> {
    let name = name.to_owned();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute("INSERT INTO channels (name) VALUES (?1)", rusqlite::params![name])?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    debug!(channel_id = id, "channel created");
    Ok(id)
  }

  async fn list_channels(&self) -> Result<Vec<Channel>> {
    let channels = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM channels ORDER BY id ASC")?;
        let rows = stmt
          .query_map([], |row| Ok(Channel { id: row.get(0)?, name: row.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(channels)
  }
}

// ─── MessageLedger impl ──────────────────────────────────────────────────────

impl MessageLedger for SqliteStore {
  type Error = Error;

  async fn append(&self, message: NewMessage) -> Result<MessageId> {
    let NewMessage { channel_id, author_id, text } = message;
    let created_at = encode_dt(Utc::now());

    // The connection thread handles one call at a time, so the rowid read
    // back belongs to this insert.
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (channel_id, user_id, message, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![channel_id, author_id, text, created_at],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    debug!(message_id = id, channel_id, "message appended");
    Ok(id)
  }

  async fn page(&self, req: PageRequest) -> Result<Vec<EnrichedMessage>> {
    if req.is_empty() {
      return Ok(Vec::new());
    }
    let PageRequest { channel_id, after_id, limit } = req;

    let raws: Vec<RawEnrichedMessage> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {}
           FROM messages m
           LEFT JOIN users u ON u.id = m.user_id
           WHERE m.channel_id = ?1 AND m.id > ?2
           ORDER BY m.id ASC
           LIMIT ?3",
          RawEnrichedMessage::COLUMNS,
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![channel_id, after_id, limit],
            RawEnrichedMessage::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEnrichedMessage::into_enriched).collect()
  }
}
