//! Handlers for `/admin`. Everything here requires an administrator.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/dashboard` | `{stats, users, agents}` |
//! | `POST`   | `/admin/users/{id}/toggle-admin` | `{user, stats}` |
//! | `POST`   | `/admin/agents/{id}/toggle-status` | `{agent, stats}` |
//! | `DELETE` | `/admin/agents/{id}` | `{stats}` |

use agentry_core::{
  agent::Agent,
  dashboard::{AdminDashboard, AgentRow, PlatformStats},
  identity::IdentityProvider,
  store::PlatformStore,
  user::User,
};
use axum::{
  Json,
  extract::{Path, State},
  response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, viewer::Viewer};

#[derive(Serialize)]
pub struct DashboardBody<'a> {
  pub stats:  PlatformStats,
  pub users:  &'a [User],
  pub agents: Vec<AgentRow<'a>>,
}

#[derive(Serialize)]
pub struct UserChanged {
  pub user:  User,
  pub stats: PlatformStats,
}

#[derive(Serialize)]
pub struct AgentChanged {
  pub agent: Agent,
  pub stats: PlatformStats,
}

#[derive(Serialize)]
pub struct Stats {
  pub stats: PlatformStats,
}

/// `GET /admin/dashboard`
pub async fn dashboard<S, I>(
  State(state): State<AppState<S, I>>,
  Viewer(nav): Viewer,
) -> Result<Response, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let dash = AdminDashboard::open(state.store.as_ref(), &nav).await?;
  let body = DashboardBody {
    stats:  dash.stats(),
    users:  dash.users(),
    agents: dash.agent_rows(),
  };
  Ok(Json(body).into_response())
}

/// `POST /admin/users/{id}/toggle-admin`
pub async fn toggle_admin<S, I>(
  State(state): State<AppState<S, I>>,
  Viewer(nav): Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<UserChanged>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let mut dash = AdminDashboard::open(state.store.as_ref(), &nav).await?;
  let user = dash.toggle_user_admin(id).await?;
  Ok(Json(UserChanged { user, stats: dash.stats() }))
}

/// `POST /admin/agents/{id}/toggle-status`
pub async fn toggle_status<S, I>(
  State(state): State<AppState<S, I>>,
  Viewer(nav): Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<AgentChanged>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let mut dash = AdminDashboard::open(state.store.as_ref(), &nav).await?;
  let agent = dash.toggle_agent_status(id).await?;
  Ok(Json(AgentChanged { agent, stats: dash.stats() }))
}

/// `DELETE /admin/agents/{id}`
pub async fn delete_agent<S, I>(
  State(state): State<AppState<S, I>>,
  Viewer(nav): Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<Stats>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let mut dash = AdminDashboard::open(state.store.as_ref(), &nav).await?;
  dash.delete_agent(id).await?;
  Ok(Json(Stats { stats: dash.stats() }))
}
