//! The gate as an axum extractor.

use agentry_core::{
  gate::{Navigation, Surface},
  identity::{IdentityProvider, Session, SessionToken},
  store::PlatformStore,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};

use crate::{AppState, error::ApiError};

/// The resolved [`Navigation`] for the current request.
///
/// Extraction never fails on a missing or unknown token; the viewer is simply
/// anonymous. Handlers call [`Viewer::require`] for the surface they serve.
pub struct Viewer(pub Navigation);

impl Viewer {
  pub fn require(&self, surface: Surface) -> Result<&Session, ApiError> {
    Ok(self.0.require(surface)?)
  }
}

/// Pull a bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(SessionToken::new)
}

impl<S, I> FromRequestParts<AppState<S, I>> for Viewer
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, I>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers);
    let nav = Navigation::resolve(state.identity.as_ref(), state.store.as_ref(), token)
      .await?;
    Ok(Viewer(nav))
  }
}
