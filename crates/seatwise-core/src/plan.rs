//! Floor plan — the canvas that owns tables, assignments, and versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named seating layout for one client's event.
///
/// Deleting a floor plan cascades to its tables, assignments, versions, and
/// change-log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
  pub floor_plan_id:    Uuid,
  /// Owning client. Tenant verification happens in the request layer; the
  /// engine treats this as an opaque scope key.
  pub client_id:        Uuid,
  pub name:             String,
  pub canvas_width:     i64,
  pub canvas_height:    i64,
  pub background_image: Option<String>,
  pub zoom:             f64,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Input to [`crate::store::SeatingStore::add_floor_plan`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewFloorPlan {
  pub client_id:        Uuid,
  pub name:             String,
  pub canvas_width:     i64,
  pub canvas_height:    i64,
  pub background_image: Option<String>,
  pub zoom:             Option<f64>,
}

/// Partial update; `None` fields are left untouched. An explicit JSON `null`
/// for `background_image` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FloorPlanUpdate {
  pub name:             Option<String>,
  pub canvas_width:     Option<i64>,
  pub canvas_height:    Option<i64>,
  #[serde(default, deserialize_with = "crate::nullable::deserialize")]
  pub background_image: Option<Option<String>>,
  pub zoom:             Option<f64>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn update_distinguishes_absent_from_null() {
    let absent: FloorPlanUpdate = serde_json::from_str("{}").unwrap();
    assert_eq!(absent.background_image, None);

    let cleared: FloorPlanUpdate =
      serde_json::from_str(r#"{"background_image": null}"#).unwrap();
    assert_eq!(cleared.background_image, Some(None));

    let set: FloorPlanUpdate =
      serde_json::from_str(r#"{"background_image": "bg.png"}"#).unwrap();
    assert_eq!(set.background_image, Some(Some("bg.png".into())));
  }
}
