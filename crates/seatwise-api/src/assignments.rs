//! Handlers for seating assignments and the advisory conflict evaluator.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/floor-plans/:id/evaluate` | `?guest_id=&table_id=` |
//! | `GET`  | `/floor-plans/:id/assignments` | |
//! | `POST` | `/floor-plans/:id/assignments` | Body: [`AssignRequest`] |
//! | `POST` | `/floor-plans/:id/assignments/batch` | Body: `[SeatRequest]` |
//! | `POST` | `/floor-plans/:id/assignments/unassign` | Body: [`UnassignBody`] |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use seatwise_core::{
  assignment::{AssignRequest, Assignment, SeatRequest, SeatingEvaluation},
  store::SeatingStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct EvaluateParams {
  pub guest_id: Uuid,
  pub table_id: Uuid,
}

/// `GET /floor-plans/:id/evaluate?guest_id=<uuid>&table_id=<uuid>`
///
/// Advisory only: reports which current occupants of `table_id` have an
/// active conflict or preference edge with `guest_id`. Never blocks.
pub async fn evaluate<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
  Query(params): Query<EvaluateParams>,
) -> Result<Json<SeatingEvaluation>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let evaluation = store
    .evaluate_seating(floor_plan_id, params.guest_id, params.table_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(evaluation))
}

/// `GET /floor-plans/:id/assignments`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
) -> Result<Json<Vec<Assignment>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let assignments = store
    .list_assignments(floor_plan_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(assignments))
}

/// `POST /floor-plans/:id/assignments` — seat one guest, replacing any prior
/// seat they hold in this floor plan. 409 when the table is full.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
  Json(body): Json<AssignRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let assignment = store
    .assign_guest(floor_plan_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

/// `POST /floor-plans/:id/assignments/batch` — all-or-nothing bulk seating.
pub async fn batch<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
  Json(seats): Json<Vec<SeatRequest>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let assignments = store
    .batch_assign(floor_plan_id, seats)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(assignments)))
}

#[derive(Debug, Deserialize)]
pub struct UnassignBody {
  pub guest_id: Uuid,
}

/// `POST /floor-plans/:id/assignments/unassign` — idempotent.
pub async fn unassign<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
  Json(body): Json<UnassignBody>,
) -> Result<StatusCode, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .unassign_guest(floor_plan_id, body.guest_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
