//! User: a platform account.
//!
//! One row exists per identity-provider subject. Rows are provisioned by the
//! store when an identity is registered and are never hard-deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Matches the identity provider's subject id.
  pub id:         Uuid,
  pub email:      String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
  /// The only authorization signal on the platform.
  pub is_admin:   bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// The name shown for this user: `full_name` when set and non-empty,
  /// otherwise the email address.
  pub fn display_name(&self) -> &str {
    match self.full_name.as_deref() {
      Some(name) if !name.is_empty() => name,
      _ => &self.email,
    }
  }
}

// ─── Updates ─────────────────────────────────────────────────────────────────

/// Owner-editable profile fields.
///
/// The outer `Option` means "leave unchanged"; `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
  #[serde(default, deserialize_with = "double_option")]
  pub full_name:  Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub avatar_url: Option<Option<String>>,
}

/// Partial update accepted by [`crate::store::PlatformStore::update_user`].
/// `updated_at` is always bumped by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
  pub full_name:  Option<Option<String>>,
  pub avatar_url: Option<Option<String>>,
  pub is_admin:   Option<bool>,
}

impl UserUpdate {
  pub fn admin(is_admin: bool) -> Self {
    Self { is_admin: Some(is_admin), ..Self::default() }
  }
}

impl From<ProfileUpdate> for UserUpdate {
  fn from(p: ProfileUpdate) -> Self {
    Self {
      full_name:  p.full_name,
      avatar_url: p.avatar_url,
      is_admin:   None,
    }
  }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}
