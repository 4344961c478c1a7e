//! JSON API for Agentry.
//!
//! Exposes an axum [`Router`] backed by any [`PlatformStore`] and
//! [`IdentityProvider`]. Every handler resolves the viewer through the gate
//! first; TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", agentry_api::api_router(state))
//! ```

pub mod admin;
pub mod agents;
pub mod auth;
pub mod error;
pub mod profile;
pub mod viewer;

use std::sync::Arc;

use agentry_core::{identity::IdentityProvider, store::PlatformStore};
use axum::{
  Router,
  routing::{delete, get, post, put},
};

pub use error::ApiError;
pub use viewer::Viewer;

/// Shared handler state: the platform store and the identity provider.
pub struct AppState<S, I> {
  pub store:    Arc<S>,
  pub identity: Arc<I>,
}

impl<S, I> AppState<S, I> {
  pub fn new(store: Arc<S>, identity: Arc<I>) -> Self { Self { store, identity } }
}

impl<S, I> Clone for AppState<S, I> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), identity: self.identity.clone() }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, I>(state: AppState<S, I>) -> Router<()>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  Router::new()
    // Auth
    .route("/auth/register", post(auth::register::<S, I>))
    .route("/auth/login", post(auth::login::<S, I>))
    .route("/auth/logout", post(auth::logout::<S, I>))
    .route("/auth/session", get(auth::session::<S, I>))
    // Profile
    .route("/profile", get(profile::get_one::<S, I>).patch(profile::update::<S, I>))
    // Agents
    .route("/agents", get(agents::list::<S, I>).post(agents::create::<S, I>))
    .route("/agents/{id}", delete(agents::delete_one::<S, I>))
    .route("/agents/{id}/status", put(agents::set_status::<S, I>))
    // Admin
    .route("/admin/dashboard", get(admin::dashboard::<S, I>))
    .route("/admin/users/{id}/toggle-admin", post(admin::toggle_admin::<S, I>))
    .route("/admin/agents/{id}/toggle-status", post(admin::toggle_status::<S, I>))
    .route("/admin/agents/{id}", delete(admin::delete_agent::<S, I>))
    .with_state(state)
}
