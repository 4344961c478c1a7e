//! API error type and [`axum::response::IntoResponse`] implementation.

use agentry_core::{
  Error as CoreError,
  gate::{Capability, Surface},
  identity::AuthError,
};
use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The gate sent the viewer elsewhere.
  #[error("redirect to {redirect}")]
  Redirect {
    capability: Capability,
    redirect:   Surface,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<AuthError> for ApiError {
  fn from(e: AuthError) -> Self {
    match e {
      AuthError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
      AuthError::EmailTaken(_) => ApiError::Conflict(e.to_string()),
      AuthError::InvalidEmail(_) | AuthError::WeakPassword { .. } => {
        ApiError::BadRequest(e.to_string())
      }
      AuthError::Provider(inner) => ApiError::Store(inner),
    }
  }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::Auth(auth) => auth.into(),
      CoreError::UserNotFound(_) | CoreError::AgentNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      CoreError::Validation(v) => ApiError::BadRequest(v.to_string()),
      CoreError::AccessDenied { capability, redirect } => {
        ApiError::Redirect { capability, redirect }
      }
      CoreError::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Redirect { capability, redirect } => {
        let status = match capability {
          Capability::Anonymous => StatusCode::UNAUTHORIZED,
          _ => StatusCode::FORBIDDEN,
        };
        let body = json!({
          "error":    self.to_string(),
          "redirect": redirect.path(),
        });
        let mut res = (status, Json(body)).into_response();
        res
          .headers_mut()
          .insert(header::LOCATION, HeaderValue::from_static(redirect.path()));
        return res;
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
