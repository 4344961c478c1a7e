//! Error type for `agentry-store-sqlite`.

use agentry_core::identity::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value outside its enumeration.
  #[error("unexpected column value: {0}")]
  Decode(String),

  #[error("password hashing error: {0}")]
  PasswordHash(String),

  /// A credential or session rejection, passed straight to the caller.
  #[error(transparent)]
  Auth(#[from] AuthError),
}

impl From<Error> for AuthError {
  fn from(e: Error) -> Self {
    match e {
      Error::Auth(auth) => auth,
      other => AuthError::provider(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
