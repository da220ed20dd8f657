//! How user credentials are stored and compared.
//!
//! `Plaintext` reproduces the historical contract: the credential is stored
//! as given and a login matches on exact byte equality. `Argon2` stores a PHC
//! string instead and verifies against it, without changing what callers of
//! [`IdentityStore`](crate::store::IdentityStore) observe.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScheme {
  #[default]
  Plaintext,
  Argon2,
}

impl CredentialScheme {
  /// Turn a raw credential into the value persisted in the users table.
  pub fn seal(self, raw: &str) -> Result<String> {
    match self {
      CredentialScheme::Plaintext => Ok(raw.to_owned()),
      CredentialScheme::Argon2 => {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
          .hash_password(raw.as_bytes(), &salt)
          .map(|hash| hash.to_string())
          .map_err(|e| Error::StorageUnavailable(format!("cannot hash credential: {e}").into()))
      }
    }
  }

  /// Does `raw` match a value previously produced by [`seal`](Self::seal)?
  pub fn verify(self, raw: &str, stored: &str) -> bool {
    match self {
      CredentialScheme::Plaintext => raw.as_bytes() == stored.as_bytes(),
      CredentialScheme::Argon2 => match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
          .verify_password(raw.as_bytes(), &parsed)
          .is_ok(),
        Err(_) => false,
      },
    }
  }

  /// Whether matching can be pushed down into an SQL equality predicate.
  pub fn is_exact_match(self) -> bool {
    matches!(self, CredentialScheme::Plaintext)
  }
}
