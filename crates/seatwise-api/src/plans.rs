//! Handlers for `/floor-plans` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/floor-plans` | `?client_id=<uuid>` required |
//! | `POST`   | `/floor-plans` | Body: [`NewFloorPlan`] |
//! | `GET`    | `/floor-plans/:id` | 404 if not found |
//! | `PATCH`  | `/floor-plans/:id` | Body: [`FloorPlanUpdate`] |
//! | `DELETE` | `/floor-plans/:id` | Cascades to tables/assignments/versions |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use seatwise_core::{
  plan::{FloorPlan, FloorPlanUpdate, NewFloorPlan},
  store::SeatingStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub client_id: Uuid,
}

/// `GET /floor-plans?client_id=<uuid>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<FloorPlan>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let plans = store
    .list_floor_plans(params.client_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(plans))
}

/// `POST /floor-plans`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewFloorPlan>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let plan = store
    .add_floor_plan(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(plan)))
}

/// `GET /floor-plans/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<FloorPlan>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let plan = store
    .get_floor_plan(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("floor plan {id} not found")))?;
  Ok(Json(plan))
}

/// `PATCH /floor-plans/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<FloorPlanUpdate>,
) -> Result<Json<FloorPlan>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let plan = store
    .update_floor_plan(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(plan))
}

/// `DELETE /floor-plans/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_floor_plan(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
