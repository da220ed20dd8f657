//! Error taxonomy shared by every Natter layer.
//!
//! Backends keep their own error enums and convert into [`Error`] so the HTTP
//! layer can pick a status code without knowing which backend is in use.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing caller input.
  #[error("{0}")]
  InvalidArgument(String),

  /// No row matched, e.g. a username/credential pair.
  #[error("{0}")]
  NotFound(String),

  /// The persistent store could not be reached or the query failed.
  #[error("{0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn invalid(msg: impl Into<String>) -> Self {
    Error::InvalidArgument(msg.into())
  }

  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::StorageUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
