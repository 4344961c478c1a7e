//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Body: `{"email", "password", "full_name"?}`; 201 |
//! | `POST` | `/auth/login` | Body: `{"email", "password"}` |
//! | `POST` | `/auth/logout` | 204; no-op when anonymous |
//! | `GET`  | `/auth/session` | The viewer's navigation context |

use agentry_core::{
  gate::Navigation,
  identity::{IdentityProvider, Registration, Session},
  store::PlatformStore,
};
use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, viewer::Viewer};

/// `POST /auth/register`
pub async fn register<S, I>(
  State(state): State<AppState<S, I>>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let session = state.identity.register(body).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

#[derive(Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S, I>(
  State(state): State<AppState<S, I>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Session>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let session = state.identity.login(body.email, body.password).await?;
  Ok(Json(session))
}

/// `POST /auth/logout`
pub async fn logout<S, I>(
  State(state): State<AppState<S, I>>,
  Viewer(nav): Viewer,
) -> Result<StatusCode, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  nav.sign_out(state.identity.as_ref()).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/session`
pub async fn session<S, I>(
  State(_state): State<AppState<S, I>>,
  Viewer(nav): Viewer,
) -> Json<Navigation>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  Json(nav)
}
