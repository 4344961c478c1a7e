//! Pure reducers over in-memory record collections.
//!
//! A collection and its aggregate counts are one value: every change produces
//! the next collection together with its totals, so the counts can never be
//! observed half-applied or drift from the records they describe.

use serde::Serialize;
use uuid::Uuid;

use crate::{agent::Agent, user::User};

// ─── Agents ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgentTotals {
  pub total:  usize,
  pub active: usize,
}

impl AgentTotals {
  pub fn count(agents: &[Agent]) -> Self {
    Self {
      total:  agents.len(),
      active: agents.iter().filter(|a| a.is_active()).count(),
    }
  }
}

/// A confirmed change to one agent record.
#[derive(Debug, Clone)]
pub enum AgentChange {
  Created(Agent),
  Updated(Agent),
  Deleted(Uuid),
}

/// Agents newest first, with their totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentCollection {
  agents: Vec<Agent>,
  totals: AgentTotals,
}

impl AgentCollection {
  /// Wrap a listing as returned by the store (already newest first).
  pub fn new(agents: Vec<Agent>) -> Self {
    let totals = AgentTotals::count(&agents);
    Self { agents, totals }
  }

  pub fn agents(&self) -> &[Agent] { &self.agents }

  pub fn totals(&self) -> AgentTotals { self.totals }

  pub fn get(&self, id: Uuid) -> Option<&Agent> {
    self.agents.iter().find(|a| a.id == id)
  }

  /// Derive the next collection from `change`.
  ///
  /// Updates and deletes for an id not in the collection leave it unchanged.
  pub fn apply(&self, change: AgentChange) -> Self {
    let mut agents = self.agents.clone();
    let mut totals = self.totals;

    match change {
      AgentChange::Created(agent) => {
        if agents.iter().any(|a| a.id == agent.id) {
          return self.clone();
        }
        totals.total += 1;
        totals.active += usize::from(agent.is_active());
        agents.insert(0, agent);
      }
      AgentChange::Updated(agent) => {
        let Some(slot) = agents.iter_mut().find(|a| a.id == agent.id) else {
          return self.clone();
        };
        totals.active -= usize::from(slot.is_active());
        totals.active += usize::from(agent.is_active());
        *slot = agent;
      }
      AgentChange::Deleted(id) => {
        let Some(pos) = agents.iter().position(|a| a.id == id) else {
          return self.clone();
        };
        let removed = agents.remove(pos);
        totals.total -= 1;
        totals.active -= usize::from(removed.is_active());
      }
    }

    debug_assert_eq!(totals, AgentTotals::count(&agents));
    Self { agents, totals }
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserTotals {
  pub total:  usize,
  pub admins: usize,
}

impl UserTotals {
  pub fn count(users: &[User]) -> Self {
    Self {
      total:  users.len(),
      admins: users.iter().filter(|u| u.is_admin).count(),
    }
  }
}

/// Users are never deleted or created from a view, so the only change is an
/// update.
#[derive(Debug, Clone)]
pub enum UserChange {
  Updated(User),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserCollection {
  users:  Vec<User>,
  totals: UserTotals,
}

impl UserCollection {
  pub fn new(users: Vec<User>) -> Self {
    let totals = UserTotals::count(&users);
    Self { users, totals }
  }

  pub fn users(&self) -> &[User] { &self.users }

  pub fn totals(&self) -> UserTotals { self.totals }

  pub fn get(&self, id: Uuid) -> Option<&User> {
    self.users.iter().find(|u| u.id == id)
  }

  pub fn apply(&self, change: UserChange) -> Self {
    let UserChange::Updated(user) = change;
    let mut users = self.users.clone();
    let mut totals = self.totals;

    let Some(slot) = users.iter_mut().find(|u| u.id == user.id) else {
      return self.clone();
    };
    totals.admins -= usize::from(slot.is_admin);
    totals.admins += usize::from(user.is_admin);
    *slot = user;

    debug_assert_eq!(totals, UserTotals::count(&users));
    Self { users, totals }
  }
}
