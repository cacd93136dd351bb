//! Handlers for `/guests` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use seatwise_core::{guest::Guest, store::SeatingStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub client_id: Uuid,
}

/// `GET /guests?client_id=<uuid>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Guest>>, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let guests = store
    .list_guests(params.client_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(guests))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub client_id: Uuid,
  pub full_name: String,
}

/// `POST /guests` — body: `{"client_id":"...","full_name":"..."}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SeatingStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let guest = store
    .add_guest(body.client_id, body.full_name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(guest)))
}
