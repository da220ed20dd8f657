//! Natter HTTP server assembly.
//!
//! Loads [`ServerConfig`] and wraps the JSON API from `natter-api` with the
//! transport layers (CORS, request tracing) the binary serves.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use natter_api::{ApiOptions, api_router};
use natter_core::{credential::CredentialScheme, store::ChatStore};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `NATTER_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub database_path:     PathBuf,
  pub credential_scheme: CredentialScheme,
  pub max_page_size:     i64,
  pub cors_permissive:   bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "0.0.0.0".to_string(),
      port:              8080,
      database_path:     PathBuf::from("database.db"),
      credential_scheme: CredentialScheme::Plaintext,
      max_page_size:     1000,
      cors_permissive:   true,
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) layered under `NATTER_*` environment
  /// variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::load_with(path, config::Environment::with_prefix("NATTER"))
  }

  fn load_with(path: &Path, env: config::Environment) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(env.try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.database_path = expand_tilde(&cfg.database_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn api_options(&self) -> ApiOptions {
    ApiOptions { max_page_size: self.max_page_size }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: API routes plus CORS and request tracing.
pub fn app<S>(store: Arc<S>, cfg: &ServerConfig) -> Router
where
  S: ChatStore + 'static,
{
  let mut router = api_router(store, cfg.api_options());
  if cfg.cors_permissive {
    router = router.layer(CorsLayer::permissive());
  }
  router.layer(TraceLayer::new_for_http())
}
