//! agentry-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store that doubles as the identity provider, and serves
//! the JSON API over HTTP.
//!
//! # Bootstrapping an administrator
//!
//! Register through the API, then:
//!
//! ```
//! cargo run -p agentry-server -- --grant-admin you@example.com
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use agentry_api::AppState;
use agentry_core::{store::PlatformStore, user::UserUpdate};
use agentry_server::ServerConfig;
use agentry_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Agentry API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Mark the registered user with this email as an administrator and exit.
  #[arg(long, value_name = "EMAIL")]
  grant_admin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AGENTRY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: promote a user and exit.
  if let Some(email) = cli.grant_admin {
    return grant_admin(&store, &email).await;
  }

  let store = Arc::new(store);
  let app = agentry_server::app(AppState::new(store.clone(), store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn grant_admin(store: &SqliteStore, email: &str) -> anyhow::Result<()> {
  let user = store
    .find_user_by_email(email.to_string())
    .await
    .context("failed to look up user")?
    .with_context(|| format!("no user registered as {email}"))?;

  store
    .update_user(user.id, UserUpdate::admin(true))
    .await
    .context("failed to update user")?;

  tracing::info!(user_id = %user.id, %email, "granted administrator");
  println!("{email} is now an administrator");
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
