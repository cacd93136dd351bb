//! Handler for the append-only change log.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use seatwise_core::{changelog::ChangeLogEntry, store::SeatingStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /floor-plans/:id/changes?limit=<n>` — newest first, default cap 100.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ChangeLogEntry>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = store
    .list_change_log(floor_plan_id, params.limit.unwrap_or(DEFAULT_LIMIT))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}
