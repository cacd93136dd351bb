//! Guest — the minimal roster entry the engine needs.
//!
//! Guests are sourced and managed externally (invitations, RSVPs, dietary
//! data all live elsewhere). The engine keeps only what seating requires:
//! identity, owning client, and a display name for conflict reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
  pub guest_id:   Uuid,
  pub client_id:  Uuid,
  pub full_name:  String,
  pub created_at: DateTime<Utc>,
}
