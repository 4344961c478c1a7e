//! The administrator's platform-wide view.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  agent::Agent,
  agents::AgentsView,
  collection::{UserChange, UserCollection},
  gate::{Navigation, Surface},
  store::{AgentScope, PlatformStore},
  user::{User, UserUpdate},
};

/// Owner label used when an agent's owner is not among the loaded users.
pub const UNKNOWN_OWNER: &str = "Unknown";

/// Cross-cutting counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
  pub total_users:   usize,
  pub admin_users:   usize,
  pub total_agents:  usize,
  pub active_agents: usize,
}

/// An agent paired with its resolved owner label.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRow<'a> {
  #[serde(flatten)]
  pub agent:      &'a Agent,
  pub owner_name: &'a str,
}

/// Every user and every agent, loaded together for one admin view.
pub struct AdminDashboard<'s, S> {
  store:  &'s S,
  users:  UserCollection,
  agents: AgentsView<'s, S>,
}

impl<'s, S> AdminDashboard<'s, S>
where
  S: PlatformStore,
{
  /// Load the dashboard. Anyone but an administrator is redirected.
  pub async fn open(store: &'s S, nav: &Navigation) -> Result<Self> {
    nav.require(Surface::Admin)?;

    let users = store.list_users().await.map_err(Error::store)?;
    let agents = AgentsView::load(store, AgentScope::All).await?;
    Ok(Self { store, users: UserCollection::new(users), agents })
  }

  pub fn users(&self) -> &[User] { self.users.users() }

  pub fn agents(&self) -> &[Agent] { self.agents.agents() }

  pub fn stats(&self) -> PlatformStats {
    let users = self.users.totals();
    let agents = self.agents.totals();
    PlatformStats {
      total_users:   users.total,
      admin_users:   users.admins,
      total_agents:  agents.total,
      active_agents: agents.active,
    }
  }

  /// Display name of `agent`'s owner, joined against the loaded users.
  pub fn owner_name(&self, agent: &Agent) -> &str {
    self
      .users
      .get(agent.user_id)
      .map(User::display_name)
      .unwrap_or(UNKNOWN_OWNER)
  }

  pub fn agent_rows(&self) -> Vec<AgentRow<'_>> {
    self
      .agents()
      .iter()
      .map(|agent| AgentRow { agent, owner_name: self.owner_name(agent) })
      .collect()
  }

  /// Flip `is_admin` for a listed user.
  pub async fn toggle_user_admin(&mut self, user_id: Uuid) -> Result<User> {
    let current = self
      .users
      .get(user_id)
      .ok_or(Error::UserNotFound(user_id))?
      .is_admin;

    let user = self
      .store
      .update_user(user_id, UserUpdate::admin(!current))
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(user_id))?;

    tracing::info!(user_id = %user_id, is_admin = user.is_admin, "admin flag toggled");
    self.users = self.users.apply(UserChange::Updated(user.clone()));
    Ok(user)
  }

  pub async fn toggle_agent_status(&mut self, agent_id: Uuid) -> Result<Agent> {
    self.agents.toggle_status(agent_id).await
  }

  pub async fn delete_agent(&mut self, agent_id: Uuid) -> Result<()> {
    self.agents.delete(agent_id).await
  }
}
