//! The access gate and the per-request navigation context.
//!
//! A [`Navigation`] is resolved once per navigation, passed explicitly to
//! every view that needs it, and consumed on sign-out.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  identity::{IdentityProvider, Session, SessionToken},
  profile::fetch_profile,
  store::PlatformStore,
  user::User,
};

/// What the current viewer is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Capability {
  Anonymous,
  Authenticated,
  Administrator,
}

/// A view the gate decides about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Surface {
  SignIn,
  Profile,
  Admin,
}

impl Surface {
  /// The route a redirect to this surface points at.
  pub fn path(self) -> &'static str {
    match self {
      Self::SignIn => "/auth/signin",
      Self::Profile => "/profile",
      Self::Admin => "/admin",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Render,
  Redirect(Surface),
}

impl Capability {
  /// Classify a present session from its profile. A missing profile gets
  /// default (non-admin) privileges.
  pub fn for_profile(profile: Option<&User>) -> Self {
    match profile {
      Some(user) if user.is_admin => Self::Administrator,
      _ => Self::Authenticated,
    }
  }

  pub fn access(self, surface: Surface) -> Access {
    match (self, surface) {
      (_, Surface::SignIn) => Access::Render,
      (Self::Anonymous, _) => Access::Redirect(Surface::SignIn),
      (Self::Authenticated, Surface::Admin) => Access::Redirect(Surface::Profile),
      _ => Access::Render,
    }
  }
}

// ─── Navigation ──────────────────────────────────────────────────────────────

/// Session, profile and capability for one navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Navigation {
  capability: Capability,
  session:    Option<Session>,
  profile:    Option<User>,
}

impl Navigation {
  pub fn anonymous() -> Self {
    Self { capability: Capability::Anonymous, session: None, profile: None }
  }

  pub fn authenticated(session: Session, profile: Option<User>) -> Self {
    Self {
      capability: Capability::for_profile(profile.as_ref()),
      session: Some(session),
      profile,
    }
  }

  /// Resolve the session behind `token`, then (and only then) the profile.
  ///
  /// No session short-circuits to anonymous without touching `store`. A
  /// session whose user row was never provisioned is authenticated with no
  /// profile.
  pub async fn resolve<I, S>(
    identity: &I,
    store: &S,
    token: Option<SessionToken>,
  ) -> Result<Self>
  where
    I: IdentityProvider,
    S: PlatformStore,
  {
    let session = match token {
      Some(token) => identity.current_session(token).await?,
      None => None,
    };
    let Some(session) = session else {
      tracing::debug!("no session; viewer is anonymous");
      return Ok(Self::anonymous());
    };

    let profile = match fetch_profile(store, session.user_id).await {
      Ok(user) => Some(user),
      Err(Error::UserNotFound(id)) => {
        tracing::warn!(user_id = %id, "session has no provisioned profile");
        None
      }
      Err(e) => return Err(e),
    };

    let nav = Self::authenticated(session, profile);
    tracing::debug!(
      user_id = %nav.user_id().unwrap_or_default(),
      capability = %nav.capability,
      "viewer classified",
    );
    Ok(nav)
  }

  pub fn capability(&self) -> Capability { self.capability }

  pub fn session(&self) -> Option<&Session> { self.session.as_ref() }

  pub fn profile(&self) -> Option<&User> { self.profile.as_ref() }

  pub fn user_id(&self) -> Option<Uuid> {
    self.session.as_ref().map(|s| s.user_id)
  }

  pub fn is_admin(&self) -> bool {
    self.capability == Capability::Administrator
  }

  pub fn access(&self, surface: Surface) -> Access {
    self.capability.access(surface)
  }

  /// Return the session if `surface` may render, or the redirect as an
  /// [`Error::AccessDenied`].
  pub fn require(&self, surface: Surface) -> Result<&Session> {
    match (self.access(surface), self.session.as_ref()) {
      (Access::Render, Some(session)) => Ok(session),
      (Access::Render, None) => Err(Error::AccessDenied {
        capability: self.capability,
        redirect:   Surface::SignIn,
      }),
      (Access::Redirect(to), _) => Err(Error::AccessDenied {
        capability: self.capability,
        redirect:   to,
      }),
    }
  }

  /// Revoke the session (if any) and hand back an anonymous context.
  pub async fn sign_out<I>(self, identity: &I) -> Result<Self>
  where
    I: IdentityProvider,
  {
    if let Some(session) = self.session {
      identity.logout(session.token).await?;
      tracing::info!(user_id = %session.user_id, "signed out");
    }
    Ok(Self::anonymous())
  }
}
