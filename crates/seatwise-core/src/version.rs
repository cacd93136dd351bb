//! Versions — immutable named snapshots of a floor plan's layout and
//! assignments.
//!
//! Version numbers are monotonic per floor plan, starting at 1. Exactly one
//! version per floor plan carries `is_current = true`; saving or restoring
//! moves the flag inside the same transaction (unset-then-set, never a
//! trigger). The only post-creation mutations are the current flag and
//! deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::table::{TableShape, TableStyle};

// ─── Snapshot payloads ───────────────────────────────────────────────────────

/// Frozen geometry of one table at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
  pub table_id: Uuid,
  pub label:    Option<String>,
  pub shape:    TableShape,
  pub x:        i64,
  pub y:        i64,
  pub width:    i64,
  pub height:   i64,
  pub rotation: i64,
  pub capacity: i64,
  pub style:    TableStyle,
}

impl TableSnapshot {
  pub fn of(table: &crate::table::Table) -> Self {
    Self {
      table_id: table.table_id,
      label:    table.label.clone(),
      shape:    table.shape,
      x:        table.x,
      y:        table.y,
      width:    table.width,
      height:   table.height,
      rotation: table.rotation,
      capacity: table.capacity,
      style:    table.style.clone(),
    }
  }
}

/// Frozen placement of one guest at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSnapshot {
  pub guest_id:    Uuid,
  pub table_id:    Uuid,
  pub seat_number: Option<i64>,
}

// ─── Version ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
  pub version_id:        Uuid,
  pub floor_plan_id:     Uuid,
  /// 1-based, monotonic per floor plan.
  pub version_number:    i64,
  pub name:              String,
  pub description:       Option<String>,
  pub table_positions:   Vec<TableSnapshot>,
  pub guest_assignments: Vec<AssignmentSnapshot>,
  pub table_count:       i64,
  pub assigned_guests:   i64,
  /// Client roster size at save time, for "42 of 180 seated" displays.
  pub total_guests:      i64,
  pub is_current:        bool,
  pub is_auto_save:      bool,
  pub created_by:        Option<String>,
  pub created_at:        DateTime<Utc>,
}

/// Input to [`crate::store::SeatingStore::save_version`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewVersion {
  pub name:         String,
  pub description:  Option<String>,
  #[serde(default)]
  pub is_auto_save: bool,
  pub created_by:   Option<String>,
}
