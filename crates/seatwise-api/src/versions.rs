//! Handlers for layout versions (snapshot, restore, delete).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use seatwise_core::{
  store::SeatingStore,
  version::{NewVersion, Version},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /floor-plans/:id/versions` — newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
) -> Result<Json<Vec<Version>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let versions = store
    .list_versions(floor_plan_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(versions))
}

/// `POST /floor-plans/:id/versions` — body: [`NewVersion`]. Snapshots the
/// current layout and assignments and marks the new version current.
pub async fn save<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
  Json(body): Json<NewVersion>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let version = store
    .save_version(floor_plan_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(version)))
}

#[derive(Debug, Deserialize)]
pub struct RestoreBody {
  pub floor_plan_id: Uuid,
}

/// `POST /versions/:id/restore` — body: [`RestoreBody`]. Replaces the live
/// assignments and table geometry with the snapshot.
pub async fn restore<S>(
  State(store): State<Arc<S>>,
  Path(version_id): Path<Uuid>,
  Json(body): Json<RestoreBody>,
) -> Result<Json<Version>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let version = store
    .restore_version(version_id, body.floor_plan_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(version))
}

/// `DELETE /versions/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(version_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_version(version_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
