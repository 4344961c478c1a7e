//! Agent: a configurable automated worker owned by exactly one user.

use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationError;

/// Free-form agent settings.
pub type Configuration = serde_json::Map<String, serde_json::Value>;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgentStatus {
  Active,
  Inactive,
  /// Readable from the store but never set by any operation in this crate.
  Paused,
}

impl AgentStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }

  /// The status an on/off toggle moves to. Anything that is not active
  /// (including `Paused`) toggles to active.
  pub fn toggled(self) -> Self {
    match self {
      Self::Active => Self::Inactive,
      Self::Inactive | Self::Paused => Self::Active,
    }
  }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The agent's type. An open enumeration: unknown strings are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentKind {
  #[default]
  Chatbot,
  Analyzer,
  Assistant,
  Moderator,
  Other(String),
}

impl AgentKind {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Chatbot => "chatbot",
      Self::Analyzer => "analyzer",
      Self::Assistant => "assistant",
      Self::Moderator => "moderator",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for AgentKind {
  fn from(s: String) -> Self {
    match s.as_str() {
      "chatbot" => Self::Chatbot,
      "analyzer" => Self::Analyzer,
      "assistant" => Self::Assistant,
      "moderator" => Self::Moderator,
      _ => Self::Other(s),
    }
  }
}

impl From<AgentKind> for String {
  fn from(k: AgentKind) -> Self {
    match k {
      AgentKind::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

impl FromStr for AgentKind {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(s.to_owned().into()) }
}

impl fmt::Display for AgentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Agent ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
  pub id:            Uuid,
  /// The owning user.
  pub user_id:       Uuid,
  pub name:          String,
  pub description:   String,
  #[serde(rename = "type")]
  pub kind:          AgentKind,
  pub status:        AgentStatus,
  #[serde(default)]
  pub configuration: Configuration,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Agent {
  pub fn is_active(&self) -> bool { self.status.is_active() }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// What an owner supplies when creating an agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentDraft {
  pub name:        String,
  pub description: String,
  #[serde(rename = "type", default)]
  pub kind:        AgentKind,
}

impl AgentDraft {
  pub fn new(
    name: impl Into<String>,
    description: impl Into<String>,
    kind: AgentKind,
  ) -> Self {
    Self { name: name.into(), description: description.into(), kind }
  }

  /// Trim every field and reject any that end up empty.
  pub fn validate(self) -> Result<Self, ValidationError> {
    let name = non_empty("name", &self.name)?;
    let description = non_empty("description", &self.description)?;
    let kind = non_empty("type", self.kind.as_str())?;
    Ok(Self { name, description, kind: kind.into() })
  }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::Empty(field));
  }
  Ok(trimmed.to_owned())
}

/// Input to [`crate::store::PlatformStore::insert_agent`].
/// `id`, `created_at`, and `updated_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewAgent {
  pub user_id:       Uuid,
  pub name:          String,
  pub description:   String,
  pub kind:          AgentKind,
  pub status:        AgentStatus,
  pub configuration: Configuration,
}

impl NewAgent {
  /// A fresh agent for `user_id`: always inactive, with empty configuration.
  pub fn from_draft(user_id: Uuid, draft: AgentDraft) -> Self {
    Self {
      user_id,
      name: draft.name,
      description: draft.description,
      kind: draft.kind,
      status: AgentStatus::Inactive,
      configuration: Configuration::new(),
    }
  }
}
