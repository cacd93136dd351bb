//! The guest relationship graph: pairwise conflict and preference edges.
//!
//! Edges are undirected and stored once per normalized pair (lower guest
//! UUID first). Re-adding an existing pair upserts; removal soft-deletes by
//! flipping `is_active`. Rows are never hard-deleted, so the history of a
//! relationship survives its removal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Conflict edges ──────────────────────────────────────────────────────────

/// Why two guests must not share a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
  General,
  FamilyDrama,
  ExPartner,
  BusinessDispute,
  Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Moderate,
  High,
  Critical,
}

/// An undirected "must not sit together" edge between two guests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictEdge {
  pub edge_id:       Uuid,
  pub client_id:     Uuid,
  /// Lower of the two guest UUIDs.
  pub guest_a:       Uuid,
  /// Higher of the two guest UUIDs.
  pub guest_b:       Uuid,
  pub conflict_type: ConflictType,
  pub severity:      Severity,
  pub reason:        Option<String>,
  pub is_active:     bool,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::SeatingStore::upsert_conflict`]. The pair does
/// not need to be pre-normalized.
#[derive(Debug, Clone, Deserialize)]
pub struct NewConflict {
  pub client_id:     Uuid,
  pub guest_a:       Uuid,
  pub guest_b:       Uuid,
  pub conflict_type: ConflictType,
  pub severity:      Severity,
  pub reason:        Option<String>,
}

// ─── Preference edges ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceType {
  Together,
  Nearby,
  SameArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
  Required,
  Preferred,
  NiceToHave,
}

/// An undirected "should sit together" edge between two guests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceEdge {
  pub edge_id:         Uuid,
  pub client_id:       Uuid,
  pub guest_a:         Uuid,
  pub guest_b:         Uuid,
  pub preference_type: PreferenceType,
  pub strength:        Strength,
  pub reason:          Option<String>,
  pub is_active:       bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Input to [`crate::store::SeatingStore::upsert_preference`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPreference {
  pub client_id:       Uuid,
  pub guest_a:         Uuid,
  pub guest_b:         Uuid,
  pub preference_type: PreferenceType,
  pub strength:        Strength,
  pub reason:          Option<String>,
}

// ─── Pair normalization ──────────────────────────────────────────────────────

/// Order a guest pair so the lower UUID comes first. Errors on a self-pair.
pub fn normalize_pair(a: Uuid, b: Uuid) -> Result<(Uuid, Uuid)> {
  if a == b {
    return Err(Error::SelfPairing(a));
  }
  if a < b { Ok((a, b)) } else { Ok((b, a)) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_orders_by_uuid() {
    let lo = Uuid::from_u128(1);
    let hi = Uuid::from_u128(2);
    assert_eq!(normalize_pair(hi, lo).unwrap(), (lo, hi));
    assert_eq!(normalize_pair(lo, hi).unwrap(), (lo, hi));
  }

  #[test]
  fn normalize_rejects_self_pair() {
    let id = Uuid::from_u128(7);
    assert!(matches!(
      normalize_pair(id, id),
      Err(Error::SelfPairing(g)) if g == id
    ));
  }
}
