//! [`SqliteStore`]: the SQLite implementation of [`PlatformStore`].

use std::path::Path;

use agentry_core::{
  agent::{Agent, AgentStatus, NewAgent},
  store::{AgentScope, PlatformStore},
  user::{User, UserUpdate},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    AGENT_COLUMNS, RawAgent, RawUser, USER_COLUMNS, encode_configuration, encode_dt,
    encode_status, encode_uuid, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Agentry store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }

  async fn query_user(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
              rusqlite::params![value],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── PlatformStore impl ──────────────────────────────────────────────────────

impl PlatformStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.query_user("id", encode_uuid(id)).await
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>> {
    self.query_user("email", email.trim().to_lowercase()).await
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>> {
    let id_str     = encode_uuid(id);
    let set_name   = update.full_name.is_some();
    let full_name  = update.full_name.flatten();
    let set_avatar = update.avatar_url.is_some();
    let avatar_url = update.avatar_url.flatten();
    let is_admin   = update.is_admin;
    let at_str     = encode_dt(now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET
             full_name  = CASE WHEN ?2 THEN ?3 ELSE full_name END,
             avatar_url = CASE WHEN ?4 THEN ?5 ELSE avatar_url END,
             is_admin   = COALESCE(?6, is_admin),
             updated_at = ?7
           WHERE id = ?1",
          rusqlite::params![
            id_str, set_name, full_name, set_avatar, avatar_url, is_admin, at_str,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
          rusqlite::params![id_str],
          RawUser::from_row,
        )?))
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Agents ────────────────────────────────────────────────────────────────

  async fn list_agents(&self, scope: AgentScope) -> Result<Vec<Agent>> {
    let owner = match scope {
      AgentScope::Owner(id) => Some(encode_uuid(id)),
      AgentScope::All => None,
    };

    let raws: Vec<RawAgent> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(owner) = owner {
          let mut stmt = conn.prepare(&format!(
            "SELECT {AGENT_COLUMNS} FROM ai_agents WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![owner], RawAgent::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {AGENT_COLUMNS} FROM ai_agents
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map([], RawAgent::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAgent::into_agent).collect()
  }

  async fn get_agent(&self, id: Uuid) -> Result<Option<Agent>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAgent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {AGENT_COLUMNS} FROM ai_agents WHERE id = ?1"),
              rusqlite::params![id_str],
              RawAgent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAgent::into_agent).transpose()
  }

  async fn insert_agent(&self, input: NewAgent) -> Result<Agent> {
    let at = now();
    let agent = Agent {
      id:            Uuid::new_v4(),
      user_id:       input.user_id,
      name:          input.name,
      description:   input.description,
      kind:          input.kind,
      status:        input.status,
      configuration: input.configuration,
      created_at:    at,
      updated_at:    at,
    };

    let id_str      = encode_uuid(agent.id);
    let user_id_str = encode_uuid(agent.user_id);
    let name        = agent.name.clone();
    let description = agent.description.clone();
    let kind        = agent.kind.as_str().to_owned();
    let status      = encode_status(agent.status);
    let config_str  = encode_configuration(&agent.configuration)?;
    let at_str      = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ai_agents (
             id, user_id, name, description, type, status,
             configuration, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str, user_id_str, name, description, kind, status, config_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(agent)
  }

  async fn set_agent_status(&self, id: Uuid, status: AgentStatus) -> Result<Option<Agent>> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);
    let at_str     = encode_dt(now());

    let raw: Option<RawAgent> = self
      .conn
      .call(move |conn| {
        // Rows already in `status` are left alone, `updated_at` included.
        conn.execute(
          "UPDATE ai_agents SET status = ?2, updated_at = ?3
           WHERE id = ?1 AND status != ?2",
          rusqlite::params![id_str, status_str, at_str],
        )?;
        Ok(
          conn
            .query_row(
              &format!("SELECT {AGENT_COLUMNS} FROM ai_agents WHERE id = ?1"),
              rusqlite::params![id_str],
              RawAgent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAgent::into_agent).transpose()
  }

  async fn delete_agent(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM ai_agents WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
