//! Error type for `natter-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] natter_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("background task failed: {0}")]
  Task(#[from] tokio::task::JoinError),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// No user matched the supplied username and credential.
  #[error("invalid username or password")]
  InvalidCredentials,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for natter_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::InvalidCredentials => {
        natter_core::Error::NotFound("invalid username or password".to_owned())
      }
      other => natter_core::Error::storage(other),
    }
  }
}
