//! Error types for `seatwise-core`.
//!
//! Tenant-scope violations never appear here: the request layer verifies
//! `floor_plan.client_id` ownership before the engine is invoked.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("floor plan not found: {0}")]
  FloorPlanNotFound(Uuid),

  #[error("table not found: {0}")]
  TableNotFound(Uuid),

  #[error("guest not found: {0}")]
  GuestNotFound(Uuid),

  #[error("version not found: {0}")]
  VersionNotFound(Uuid),

  /// Hard invariant violation. Never retried, never overridable by `force`.
  #[error(
    "table {table_id} is full: capacity {capacity}, would seat {occupied}"
  )]
  CapacityExceeded {
    table_id: Uuid,
    capacity: i64,
    occupied: i64,
  },

  #[error("table capacity must be at least 1, got {0}")]
  InvalidCapacity(i64),

  #[error("guest {0} cannot be paired with themselves")]
  SelfPairing(Uuid),

  #[error("batch assignment requires at least one seat request")]
  EmptyBatch,

  #[error("guest {0} appears more than once in the batch")]
  DuplicateGuestInBatch(Uuid),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
