//! In-memory store and identity provider for unit tests.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  agent::{Agent, AgentStatus, NewAgent},
  identity::{AuthError, IdentityProvider, Registration, Session, SessionToken},
  store::{AgentScope, PlatformStore},
  user::{User, UserUpdate},
};

#[derive(Debug, thiserror::Error)]
#[error("fake store is offline")]
pub struct Offline;

/// Records are kept oldest first; listings reverse them.
#[derive(Default)]
pub struct FakeStore {
  users:   Mutex<Vec<User>>,
  agents:  Mutex<Vec<Agent>>,
  calls:   AtomicUsize,
  offline: AtomicBool,
}

impl FakeStore {
  /// Number of trait calls made so far.
  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  /// Insert a user row directly, as the provisioning trigger would.
  pub fn provision(&self, email: &str, is_admin: bool) -> User {
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      email: email.to_owned(),
      full_name: None,
      avatar_url: None,
      is_admin,
      created_at: now,
      updated_at: now,
    };
    self.users.lock().unwrap().push(user.clone());
    user
  }

  pub fn rename(&self, id: Uuid, full_name: Option<&str>) {
    let mut users = self.users.lock().unwrap();
    if let Some(u) = users.iter_mut().find(|u| u.id == id) {
      u.full_name = full_name.map(str::to_owned);
    }
  }

  /// Overwrite a status without going through any operation.
  pub fn force_status(&self, id: Uuid, status: AgentStatus) {
    let mut agents = self.agents.lock().unwrap();
    if let Some(a) = agents.iter_mut().find(|a| a.id == id) {
      a.status = status;
    }
  }

  fn enter(&self) -> Result<(), Offline> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.offline.load(Ordering::SeqCst) {
      return Err(Offline);
    }
    Ok(())
  }
}

impl PlatformStore for FakeStore {
  type Error = Offline;

  async fn get_user(&self, id: Uuid) -> Result<Option<User>, Offline> {
    self.enter()?;
    Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>, Offline> {
    self.enter()?;
    Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
  }

  async fn list_users(&self) -> Result<Vec<User>, Offline> {
    self.enter()?;
    Ok(self.users.lock().unwrap().iter().rev().cloned().collect())
  }

  async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, Offline> {
    self.enter()?;
    let mut users = self.users.lock().unwrap();
    let Some(user) = users.iter_mut().find(|u| u.id == id) else {
      return Ok(None);
    };
    if let Some(full_name) = update.full_name {
      user.full_name = full_name;
    }
    if let Some(avatar_url) = update.avatar_url {
      user.avatar_url = avatar_url;
    }
    if let Some(is_admin) = update.is_admin {
      user.is_admin = is_admin;
    }
    user.updated_at = Utc::now();
    Ok(Some(user.clone()))
  }

  async fn list_agents(&self, scope: AgentScope) -> Result<Vec<Agent>, Offline> {
    self.enter()?;
    Ok(
      self
        .agents
        .lock()
        .unwrap()
        .iter()
        .rev()
        .filter(|a| scope.covers(a))
        .cloned()
        .collect(),
    )
  }

  async fn get_agent(&self, id: Uuid) -> Result<Option<Agent>, Offline> {
    self.enter()?;
    Ok(self.agents.lock().unwrap().iter().find(|a| a.id == id).cloned())
  }

  async fn insert_agent(&self, input: NewAgent) -> Result<Agent, Offline> {
    self.enter()?;
    let now = Utc::now();
    let agent = Agent {
      id:            Uuid::new_v4(),
      user_id:       input.user_id,
      name:          input.name,
      description:   input.description,
      kind:          input.kind,
      status:        input.status,
      configuration: input.configuration,
      created_at:    now,
      updated_at:    now,
    };
    self.agents.lock().unwrap().push(agent.clone());
    Ok(agent)
  }

  async fn set_agent_status(
    &self,
    id: Uuid,
    status: AgentStatus,
  ) -> Result<Option<Agent>, Offline> {
    self.enter()?;
    let mut agents = self.agents.lock().unwrap();
    let Some(agent) = agents.iter_mut().find(|a| a.id == id) else {
      return Ok(None);
    };
    if agent.status != status {
      agent.status = status;
      agent.updated_at = Utc::now();
    }
    Ok(Some(agent.clone()))
  }

  async fn delete_agent(&self, id: Uuid) -> Result<bool, Offline> {
    self.enter()?;
    let mut agents = self.agents.lock().unwrap();
    let before = agents.len();
    agents.retain(|a| a.id != id);
    Ok(agents.len() != before)
  }
}

/// Sessions keyed by token; registration and login are not exercised here.
#[derive(Default)]
pub struct FakeIdentity {
  sessions: Mutex<HashMap<SessionToken, Session>>,
}

impl FakeIdentity {
  pub fn open(&self, user: &User) -> SessionToken {
    self.open_for(user.id, &user.email)
  }

  pub fn open_for(&self, user_id: Uuid, email: &str) -> SessionToken {
    let token = SessionToken::new(Uuid::new_v4().to_string());
    let session = Session {
      token: token.clone(),
      user_id,
      email: email.to_owned(),
      issued_at: Utc::now(),
    };
    self.sessions.lock().unwrap().insert(token.clone(), session);
    token
  }
}

impl IdentityProvider for FakeIdentity {
  async fn register(&self, _: Registration) -> Result<Session, AuthError> {
    Err(AuthError::InvalidCredentials)
  }

  async fn login(&self, _: String, _: String) -> Result<Session, AuthError> {
    Err(AuthError::InvalidCredentials)
  }

  async fn logout(&self, token: SessionToken) -> Result<(), AuthError> {
    self.sessions.lock().unwrap().remove(&token);
    Ok(())
  }

  async fn current_session(
    &self,
    token: SessionToken,
  ) -> Result<Option<Session>, AuthError> {
    Ok(self.sessions.lock().unwrap().get(&token).cloned())
  }
}
