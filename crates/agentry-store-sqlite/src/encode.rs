//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order is chronological. UUIDs are
//! hyphenated lowercase strings. Agent configuration is compact JSON.

use agentry_core::{
  agent::{Agent, AgentKind, AgentStatus, Configuration},
  user::User,
};
use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at storage precision, so a freshly built record equals
/// the same record read back.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── AgentStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(status: AgentStatus) -> &'static str {
  match status {
    AgentStatus::Active => "active",
    AgentStatus::Inactive => "inactive",
    AgentStatus::Paused => "paused",
  }
}

pub fn decode_status(s: &str) -> Result<AgentStatus> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown agent status: {s:?}")))
}

// ─── Configuration ───────────────────────────────────────────────────────────

pub fn encode_configuration(c: &Configuration) -> Result<String> {
  Ok(serde_json::to_string(c)?)
}

pub fn decode_configuration(s: &str) -> Result<Configuration> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "id, email, full_name, avatar_url, is_admin, created_at, updated_at";

pub const AGENT_COLUMNS: &str = "id, user_id, name, description, type, status, \
                                 configuration, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:         String,
  pub email:      String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
  pub is_admin:   bool,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  /// Map a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      email:      row.get(1)?,
      full_name:  row.get(2)?,
      avatar_url: row.get(3)?,
      is_admin:   row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         decode_uuid(&self.id)?,
      email:      self.email,
      full_name:  self.full_name,
      avatar_url: self.avatar_url,
      is_admin:   self.is_admin,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `ai_agents` row.
pub struct RawAgent {
  pub id:            String,
  pub user_id:       String,
  pub name:          String,
  pub description:   String,
  pub kind:          String,
  pub status:        String,
  pub configuration: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawAgent {
  /// Map a row selected with [`AGENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      user_id:       row.get(1)?,
      name:          row.get(2)?,
      description:   row.get(3)?,
      kind:          row.get(4)?,
      status:        row.get(5)?,
      configuration: row.get(6)?,
      created_at:    row.get(7)?,
      updated_at:    row.get(8)?,
    })
  }

  pub fn into_agent(self) -> Result<Agent> {
    Ok(Agent {
      id:            decode_uuid(&self.id)?,
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      description:   self.description,
      kind:          AgentKind::from(self.kind),
      status:        decode_status(&self.status)?,
      configuration: decode_configuration(&self.configuration)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let early = now();
    let late = early + chrono::Duration::milliseconds(1500);
    let (a, b) = (encode_dt(early), encode_dt(late));
    assert_eq!(a.len(), b.len());
    assert!(a < b);
    assert_eq!(decode_dt(&a).unwrap(), early);
  }

  #[test]
  fn status_names_match_core() {
    for status in [AgentStatus::Active, AgentStatus::Inactive, AgentStatus::Paused] {
      assert_eq!(encode_status(status), status.as_ref());
      assert_eq!(decode_status(encode_status(status)).unwrap(), status);
    }
    assert!(matches!(decode_status("running"), Err(Error::Decode(_))));
  }
}
