//! The `PlatformStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `agentry-store-sqlite`).
//! Views and handlers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  agent::{Agent, AgentStatus, NewAgent},
  user::{User, UserUpdate},
};

/// Which agents a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentScope {
  /// Only agents owned by this user.
  Owner(Uuid),
  /// Every agent on the platform.
  All,
}

impl AgentScope {
  pub fn covers(&self, agent: &Agent) -> bool {
    match self {
      Self::Owner(id) => agent.user_id == *id,
      Self::All => true,
    }
  }
}

/// Abstraction over the backend that holds `users` and `ai_agents`.
///
/// Listings are ordered newest first. Lookups return `None` for a missing
/// row; callers decide whether that is an error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlatformStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Apply a partial update and return the full record. Never inserts:
  /// returns `None` if the user does not exist.
  fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Agents ────────────────────────────────────────────────────────────

  fn list_agents(
    &self,
    scope: AgentScope,
  ) -> impl Future<Output = Result<Vec<Agent>, Self::Error>> + Send + '_;

  fn get_agent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Agent>, Self::Error>> + Send + '_;

  /// Persist a new agent. Fails if `input.user_id` is not a known user.
  fn insert_agent(
    &self,
    input: NewAgent,
  ) -> impl Future<Output = Result<Agent, Self::Error>> + Send + '_;

  /// Set the status of an agent. If it already has `status` the row is left
  /// untouched (including `updated_at`). Returns `None` if not found.
  fn set_agent_status(
    &self,
    id: Uuid,
    status: AgentStatus,
  ) -> impl Future<Output = Result<Option<Agent>, Self::Error>> + Send + '_;

  /// Delete an agent. Returns `false` if it did not exist.
  fn delete_agent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
