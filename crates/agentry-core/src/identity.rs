//! The identity-provider seam.
//!
//! Credentials and sessions are owned by the provider. The rest of the
//! workspace only ever sees a [`Session`] or its absence.

use std::{fmt, future::Future};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// An opaque bearer token issued by the provider.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
  pub fn new(token: impl Into<String>) -> Self { Self(token.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(..)")
  }
}

/// An authenticated identity handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub token:     SessionToken,
  /// The provider subject; equal to the matching [`crate::user::User::id`].
  pub user_id:   Uuid,
  pub email:     String,
  pub issued_at: DateTime<Utc>,
}

/// Input to [`IdentityProvider::register`].
#[derive(Clone, Deserialize)]
pub struct Registration {
  pub email:     String,
  pub password:  String,
  #[serde(default)]
  pub full_name: Option<String>,
}

impl fmt::Debug for Registration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registration")
      .field("email", &self.email)
      .field("full_name", &self.full_name)
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("an account already exists for {0}")]
  EmailTaken(String),

  #[error("not a valid email address: {0:?}")]
  InvalidEmail(String),

  #[error("password must be at least {min} characters")]
  WeakPassword { min: usize },

  #[error("identity provider error: {0}")]
  Provider(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
  pub fn provider<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Provider(Box::new(e))
  }
}

/// Abstraction over the external identity provider.
///
/// The provider does all credential checking; callers pass values through
/// untouched.
pub trait IdentityProvider: Send + Sync {
  /// Create an identity and open its first session.
  fn register(
    &self,
    registration: Registration,
  ) -> impl Future<Output = Result<Session, AuthError>> + Send + '_;

  fn login(
    &self,
    email: String,
    password: String,
  ) -> impl Future<Output = Result<Session, AuthError>> + Send + '_;

  /// Revoke `token`. Revoking an unknown token succeeds.
  fn logout(
    &self,
    token: SessionToken,
  ) -> impl Future<Output = Result<(), AuthError>> + Send + '_;

  /// Look up the session for `token`. Returns `None` rather than an error
  /// when no such session exists.
  fn current_session(
    &self,
    token: SessionToken,
  ) -> impl Future<Output = Result<Option<Session>, AuthError>> + Send + '_;
}
