//! Handlers for `/profile`.

use agentry_core::{
  gate::Surface,
  identity::IdentityProvider,
  profile::{fetch_profile, update_profile},
  store::PlatformStore,
  user::{ProfileUpdate, User},
};
use axum::{Json, extract::State};

use crate::{AppState, error::ApiError, viewer::Viewer};

/// `GET /profile`
pub async fn get_one<S, I>(
  State(state): State<AppState<S, I>>,
  viewer: Viewer,
) -> Result<Json<User>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let session = viewer.require(Surface::Profile)?;
  let user = fetch_profile(state.store.as_ref(), session.user_id).await?;
  Ok(Json(user))
}

/// `PATCH /profile`
///
/// Absent fields are left alone; an explicit `null` clears the field.
pub async fn update<S, I>(
  State(state): State<AppState<S, I>>,
  viewer: Viewer,
  Json(body): Json<ProfileUpdate>,
) -> Result<Json<User>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let session = viewer.require(Surface::Profile)?;
  let user = update_profile(state.store.as_ref(), session.user_id, body).await?;
  Ok(Json(user))
}
