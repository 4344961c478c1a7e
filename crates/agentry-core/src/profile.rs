//! Single-user profile access.
//!
//! "Not provisioned" is reported as [`Error::UserNotFound`] so callers can
//! tell it apart from an unreachable backend.

use uuid::Uuid;

use crate::{
  Error, Result,
  store::PlatformStore,
  user::{ProfileUpdate, User},
};

/// Fetch the user row for `user_id`.
pub async fn fetch_profile<S>(store: &S, user_id: Uuid) -> Result<User>
where
  S: PlatformStore,
{
  store
    .get_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::UserNotFound(user_id))
}

/// Apply owner-editable changes and return the full updated record.
/// Never creates a row.
pub async fn update_profile<S>(
  store: &S,
  user_id: Uuid,
  update: ProfileUpdate,
) -> Result<User>
where
  S: PlatformStore,
{
  let user = store
    .update_user(user_id, update.into())
    .await
    .map_err(Error::store)?
    .ok_or(Error::UserNotFound(user_id))?;
  tracing::info!(user_id = %user_id, "profile updated");
  Ok(user)
}
