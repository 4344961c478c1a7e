//! Agent collection management.
//!
//! The free functions talk to the store only. [`AgentsView`] pairs them with
//! an [`AgentCollection`] and applies each change locally once the store has
//! confirmed it.

use uuid::Uuid;

use crate::{
  Error, Result, ValidationError,
  agent::{Agent, AgentDraft, AgentStatus, NewAgent},
  collection::{AgentChange, AgentCollection, AgentTotals},
  store::{AgentScope, PlatformStore},
};

// ─── Store operations ────────────────────────────────────────────────────────

/// Agents in `scope`, newest first.
pub async fn list<S>(store: &S, scope: AgentScope) -> Result<Vec<Agent>>
where
  S: PlatformStore,
{
  store.list_agents(scope).await.map_err(Error::store)
}

/// Create an agent for `owner`. The new agent is always inactive with an
/// empty configuration.
pub async fn create<S>(store: &S, owner: Uuid, draft: AgentDraft) -> Result<Agent>
where
  S: PlatformStore,
{
  let draft = draft.validate()?;
  let agent = store
    .insert_agent(NewAgent::from_draft(owner, draft))
    .await
    .map_err(Error::store)?;
  tracing::info!(agent_id = %agent.id, user_id = %owner, kind = %agent.kind, "agent created");
  Ok(agent)
}

/// Switch an agent between active and inactive. Setting the status it already
/// has is a no-op that returns the unchanged record.
pub async fn set_status<S>(store: &S, id: Uuid, status: AgentStatus) -> Result<Agent>
where
  S: PlatformStore,
{
  if status == AgentStatus::Paused {
    return Err(ValidationError::UnreachableStatus(status).into());
  }
  let agent = store
    .set_agent_status(id, status)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AgentNotFound(id))?;
  tracing::info!(agent_id = %id, status = %status, "agent status set");
  Ok(agent)
}

pub async fn delete<S>(store: &S, id: Uuid) -> Result<()>
where
  S: PlatformStore,
{
  if !store.delete_agent(id).await.map_err(Error::store)? {
    return Err(Error::AgentNotFound(id));
  }
  tracing::info!(agent_id = %id, "agent deleted");
  Ok(())
}

// ─── View ────────────────────────────────────────────────────────────────────

/// The agents one view displays, kept in step with the store.
///
/// Mutations only target agents present in the collection; anything else is
/// [`Error::AgentNotFound`] without a store call. A failed store call leaves
/// the collection untouched.
pub struct AgentsView<'s, S> {
  store:      &'s S,
  scope:      AgentScope,
  collection: AgentCollection,
}

impl<'s, S> AgentsView<'s, S>
where
  S: PlatformStore,
{
  pub async fn load(store: &'s S, scope: AgentScope) -> Result<Self> {
    let agents = list(store, scope).await?;
    Ok(Self::from_agents(store, scope, agents))
  }

  /// Build a view over an already-fetched listing.
  pub fn from_agents(store: &'s S, scope: AgentScope, agents: Vec<Agent>) -> Self {
    Self { store, scope, collection: AgentCollection::new(agents) }
  }

  pub fn scope(&self) -> AgentScope { self.scope }

  pub fn collection(&self) -> &AgentCollection { &self.collection }

  pub fn agents(&self) -> &[Agent] { self.collection.agents() }

  pub fn totals(&self) -> AgentTotals { self.collection.totals() }

  /// Create an agent for `owner`. Only an owner-scoped view for `owner`, or
  /// the platform-wide view, can do this.
  pub async fn create(&mut self, owner: Uuid, draft: AgentDraft) -> Result<Agent> {
    if let AgentScope::Owner(id) = self.scope
      && id != owner
    {
      return Err(Error::UserNotFound(owner));
    }
    let agent = create(self.store, owner, draft).await?;
    self.commit(AgentChange::Created(agent.clone()));
    Ok(agent)
  }

  pub async fn set_status(&mut self, id: Uuid, status: AgentStatus) -> Result<Agent> {
    self.listed(id)?;
    let agent = set_status(self.store, id, status).await?;
    self.commit(AgentChange::Updated(agent.clone()));
    Ok(agent)
  }

  /// Flip active ⇄ inactive. A paused agent toggles to active.
  pub async fn toggle_status(&mut self, id: Uuid) -> Result<Agent> {
    let next = self.listed(id)?.status.toggled();
    self.set_status(id, next).await
  }

  pub async fn delete(&mut self, id: Uuid) -> Result<()> {
    self.listed(id)?;
    delete(self.store, id).await?;
    self.commit(AgentChange::Deleted(id));
    Ok(())
  }

  fn listed(&self, id: Uuid) -> Result<&Agent> {
    self.collection.get(id).ok_or(Error::AgentNotFound(id))
  }

  fn commit(&mut self, change: AgentChange) {
    self.collection = self.collection.apply(change);
  }
}
