//! Handlers for the viewer's own `/agents`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/agents` | `{agents, totals}`, newest first |
//! | `POST`   | `/agents` | Body: `{"name", "description", "type"?}`; 201 |
//! | `PUT`    | `/agents/{id}/status` | Body: `{"status": "active"\|"inactive"}` |
//! | `DELETE` | `/agents/{id}` | `{totals}` |
//!
//! Agents owned by someone else are reported as not found.

use agentry_core::{
  agent::{Agent, AgentDraft, AgentStatus},
  agents::AgentsView,
  collection::AgentTotals,
  gate::Surface,
  identity::IdentityProvider,
  store::{AgentScope, PlatformStore},
};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, viewer::Viewer};

#[derive(Serialize)]
pub struct AgentList<'a> {
  pub agents: &'a [Agent],
  pub totals: AgentTotals,
}

#[derive(Serialize)]
pub struct AgentChanged {
  pub agent:  Agent,
  pub totals: AgentTotals,
}

#[derive(Serialize)]
pub struct Totals {
  pub totals: AgentTotals,
}

async fn own_view<'s, S>(
  store: &'s S,
  viewer: &Viewer,
) -> Result<(Uuid, AgentsView<'s, S>), ApiError>
where
  S: PlatformStore,
{
  let owner = viewer.require(Surface::Profile)?.user_id;
  let view = AgentsView::load(store, AgentScope::Owner(owner)).await?;
  Ok((owner, view))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /agents`
pub async fn list<S, I>(
  State(state): State<AppState<S, I>>,
  viewer: Viewer,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let (_, view) = own_view(state.store.as_ref(), &viewer).await?;
  Ok(
    Json(AgentList { agents: view.agents(), totals: view.totals() })
      .into_response(),
  )
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /agents`
pub async fn create<S, I>(
  State(state): State<AppState<S, I>>,
  viewer: Viewer,
  Json(draft): Json<AgentDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let (owner, mut view) = own_view(state.store.as_ref(), &viewer).await?;
  let agent = view.create(owner, draft).await?;
  Ok((StatusCode::CREATED, Json(AgentChanged { agent, totals: view.totals() })))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: AgentStatus,
}

/// `PUT /agents/{id}/status`
pub async fn set_status<S, I>(
  State(state): State<AppState<S, I>>,
  viewer: Viewer,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<AgentChanged>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let (_, mut view) = own_view(state.store.as_ref(), &viewer).await?;
  let agent = view.set_status(id, body.status).await?;
  Ok(Json(AgentChanged { agent, totals: view.totals() }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /agents/{id}`
pub async fn delete_one<S, I>(
  State(state): State<AppState<S, I>>,
  viewer: Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<Totals>, ApiError>
where
  S: PlatformStore + 'static,
  I: IdentityProvider + 'static,
{
  let (_, mut view) = own_view(state.store.as_ref(), &viewer).await?;
  view.delete(id).await?;
  Ok(Json(Totals { totals: view.totals() }))
}
