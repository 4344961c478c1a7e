//! HTTP server wiring for Agentry.
//!
//! The API lives under `/api`; everything is wrapped in a request trace layer.

use std::path::PathBuf;

use agentry_api::{AppState, api_router};
use agentry_core::{identity::IdentityProvider, store::PlatformStore};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Top-level server configuration, loaded from `config.toml` and `AGENTRY_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("~/.local/share/agentry/agentry.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn app<S, I>(state: AppState<S, I>) -> Router
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
