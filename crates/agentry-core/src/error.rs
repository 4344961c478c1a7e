//! Error types for `agentry-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{
  agent::AgentStatus,
  gate::{Capability, Surface},
  identity::AuthError,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("authentication error: {0}")]
  Auth(#[from] AuthError),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("agent not found: {0}")]
  AgentNotFound(Uuid),

  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  /// The gate refused the current capability; the caller should navigate to
  /// `redirect` instead.
  #[error("{capability} may not open this view; redirect to {redirect}")]
  AccessDenied {
    capability: Capability,
    redirect:   Surface,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend-specific store error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

/// Caller-supplied fields rejected before they reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{0} must not be empty")]
  Empty(&'static str),

  #[error("status {0} cannot be set directly")]
  UnreachableStatus(AgentStatus),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
