//! Assignments — guest placements at tables — and the advisory evaluation
//! result returned before one is made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guest's placement at a table within a floor plan.
///
/// Invariants (enforced by the store at write time):
/// - at most one assignment per (floor plan, guest);
/// - occupants of a table never exceed its capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
  pub assignment_id: Uuid,
  pub floor_plan_id: Uuid,
  pub table_id:      Uuid,
  pub guest_id:      Uuid,
  pub seat_number:   Option<i64>,
  pub assigned_at:   DateTime<Utc>,
}

/// Input to [`crate::store::SeatingStore::assign_guest`].
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRequest {
  pub table_id:    Uuid,
  pub guest_id:    Uuid,
  pub seat_number: Option<i64>,
  /// Skip the advisory conflict evaluation (the caller has already shown the
  /// warning). Never bypasses the capacity check.
  #[serde(default)]
  pub force:       bool,
}

/// One row of a batch proposal. The batch replaces the assignments of every
/// guest it names, atomically.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatRequest {
  pub table_id:    Uuid,
  pub guest_id:    Uuid,
  pub seat_number: Option<i64>,
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

/// A guest already seated at the candidate table who has an active edge to
/// the guest being placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoOccupant {
  pub guest_id:  Uuid,
  pub full_name: String,
}

/// Advisory result of evaluating a candidate (guest, table) placement.
/// Never blocks a write on its own; the caller decides whether to warn,
/// reject, or proceed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatingEvaluation {
  pub conflicts:   Vec<CoOccupant>,
  pub preferences: Vec<CoOccupant>,
}

impl SeatingEvaluation {
  /// True when any current occupant has an active conflict edge with the
  /// candidate guest. Preference matches are good news, not a warning.
  pub fn has_conflicts(&self) -> bool { !self.conflicts.is_empty() }
}
