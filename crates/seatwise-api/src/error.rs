//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Walk the source chain looking for the engine's domain error, so capacity
/// and not-found failures keep their meaning across the store boundary.
fn find_domain<'a>(
  err: &'a (dyn std::error::Error + Send + Sync + 'static),
) -> Option<&'a seatwise_core::Error> {
  if let Some(domain) = err.downcast_ref::<seatwise_core::Error>() {
    return Some(domain);
  }
  let mut current = err.source();
  while let Some(e) = current {
    if let Some(domain) = e.downcast_ref::<seatwise_core::Error>() {
      return Some(domain);
    }
    current = e.source();
  }
  None
}

fn domain_status(err: &seatwise_core::Error) -> StatusCode {
  use seatwise_core::Error::*;
  match err {
    FloorPlanNotFound(_) | TableNotFound(_) | GuestNotFound(_)
    | VersionNotFound(_) => StatusCode::NOT_FOUND,
    CapacityExceeded { .. } => StatusCode::CONFLICT,
    InvalidCapacity(_) | SelfPairing(_) | EmptyBatch
    | DuplicateGuestInBatch(_) => StatusCode::BAD_REQUEST,
    Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => match find_domain(e.as_ref()) {
        Some(domain) => (domain_status(domain), domain.to_string()),
        None => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      },
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
