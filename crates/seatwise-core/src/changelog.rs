//! The append-only change log of assignment-affecting actions.
//!
//! Entries are observability-only: the store discards the result of writing
//! one, so a failed log write can never fail or roll back the mutation that
//! triggered it. Entries are never updated or deleted by normal operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened. The variant name is the `action` discriminant stored in
/// the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
  GuestAssigned,
  GuestUnassigned,
  BatchAssigned,
  /// A single assignment went through despite active conflict edges with
  /// guests already at the table.
  ConflictOverridden,
  VersionSaved,
  VersionRestored,
}

/// Where a guest sat before or after the action, when applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatState {
  pub table_id:    Uuid,
  pub seat_number: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLogEntry {
  pub entry_id:       Uuid,
  pub floor_plan_id:  Uuid,
  pub action:         ChangeAction,
  pub guest_id:       Option<Uuid>,
  pub table_id:       Option<Uuid>,
  pub previous_state: Option<SeatState>,
  pub new_state:      Option<SeatState>,
  pub actor:          Option<String>,
  pub created_at:     DateTime<Utc>,
}
