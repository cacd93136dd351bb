//! Handlers for the table registry.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/floor-plans/:id/tables` | |
//! | `POST`   | `/floor-plans/:id/tables` | Body: [`CreateTableBody`] |
//! | `PATCH`  | `/tables/:id` | Body: [`TableUpdate`] |
//! | `DELETE` | `/tables/:id` | Also removes the table's assignments |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use seatwise_core::{
  store::SeatingStore,
  table::{NewTable, Table, TableShape, TableStyle, TableUpdate},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /floor-plans/:id/tables`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
) -> Result<Json<Vec<Table>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tables = store
    .list_tables(floor_plan_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(tables))
}

/// JSON body for `POST /floor-plans/:id/tables` — [`NewTable`] minus the
/// floor plan id, which comes from the path.
#[derive(Debug, Deserialize)]
pub struct CreateTableBody {
  pub label:        Option<String>,
  pub shape:        TableShape,
  pub x:            i64,
  pub y:            i64,
  pub width:        i64,
  pub height:       i64,
  #[serde(default)]
  pub rotation:     i64,
  pub capacity:     i64,
  pub min_capacity: Option<i64>,
  #[serde(default)]
  pub style:        TableStyle,
}

/// `POST /floor-plans/:id/tables`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(floor_plan_id): Path<Uuid>,
  Json(body): Json<CreateTableBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let table = store
    .add_table(NewTable {
      floor_plan_id,
      label: body.label,
      shape: body.shape,
      x: body.x,
      y: body.y,
      width: body.width,
      height: body.height,
      rotation: body.rotation,
      capacity: body.capacity,
      min_capacity: body.min_capacity,
      style: body.style,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(table)))
}

/// `PATCH /tables/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<TableUpdate>,
) -> Result<Json<Table>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let table = store
    .update_table(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(table))
}

/// `DELETE /tables/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_table(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
