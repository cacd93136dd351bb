//! Handlers for the relationship graph (`/conflicts`, `/preferences`).
//!
//! Adding an existing pair upserts; removal soft-deletes. Both accept the
//! pair in either order.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use seatwise_core::{
  graph::{ConflictEdge, NewConflict, NewPreference, PreferenceEdge},
  store::SeatingStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub client_id: Uuid,
}

/// Body for the `/conflicts/remove` and `/preferences/remove` endpoints.
#[derive(Debug, Deserialize)]
pub struct RemoveBody {
  pub client_id: Uuid,
  pub guest_a:   Uuid,
  pub guest_b:   Uuid,
}

// ─── Conflicts ────────────────────────────────────────────────────────────────

/// `GET /conflicts?client_id=<uuid>` — active edges only.
pub async fn list_conflicts<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ConflictEdge>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let edges = store
    .list_conflicts(params.client_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(edges))
}

/// `POST /conflicts` — body: [`NewConflict`]; upserts on an existing pair.
pub async fn add_conflict<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewConflict>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let edge = store
    .upsert_conflict(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(edge)))
}

/// `POST /conflicts/remove` — soft-delete; idempotent.
pub async fn remove_conflict<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RemoveBody>,
) -> Result<StatusCode, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .remove_conflict(body.client_id, body.guest_a, body.guest_b)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Preferences ─────────────────────────────────────────────────────────────

/// `GET /preferences?client_id=<uuid>` — active edges only.
pub async fn list_preferences<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PreferenceEdge>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let edges = store
    .list_preferences(params.client_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(edges))
}

/// `POST /preferences` — body: [`NewPreference`]; upserts on an existing pair.
pub async fn add_preference<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPreference>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let edge = store
    .upsert_preference(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(edge)))
}

/// `POST /preferences/remove` — soft-delete; idempotent.
pub async fn remove_preference<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RemoveBody>,
) -> Result<StatusCode, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .remove_preference(body.client_id, body.guest_a, body.guest_b)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
