//! Table geometry within a floor plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The drawable shape of a table. Closed enum; the canvas knows how to render
/// exactly these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
  Round,
  Rectangle,
  Square,
}

/// Presentation metadata. The snapshot shape is fixed, so this is a struct
/// rather than an open map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
  #[serde(default)]
  pub vip:        bool,
  pub fill_color: Option<String>,
}

/// A table on the floor-plan canvas. Position and size are integer pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
  pub table_id:      Uuid,
  pub floor_plan_id: Uuid,
  pub label:         Option<String>,
  pub shape:         TableShape,
  pub x:             i64,
  pub y:             i64,
  pub width:         i64,
  pub height:        i64,
  /// Degrees, clockwise.
  pub rotation:      i64,
  /// Hard maximum of seated guests. Invariant: ≥ 1.
  pub capacity:      i64,
  /// Soft minimum used by fill heuristics upstream; not enforced here.
  pub min_capacity:  Option<i64>,
  pub style:         TableStyle,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::SeatingStore::add_table`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewTable {
  pub floor_plan_id: Uuid,
  pub label:         Option<String>,
  pub shape:         TableShape,
  pub x:             i64,
  pub y:             i64,
  pub width:         i64,
  pub height:        i64,
  #[serde(default)]
  pub rotation:      i64,
  pub capacity:      i64,
  pub min_capacity:  Option<i64>,
  #[serde(default)]
  pub style:         TableStyle,
}

/// Partial update; `None` fields are left untouched. An explicit JSON `null`
/// for `label` or `min_capacity` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableUpdate {
  #[serde(default, deserialize_with = "crate::nullable::deserialize")]
  pub label:        Option<Option<String>>,
  pub shape:        Option<TableShape>,
  pub x:            Option<i64>,
  pub y:            Option<i64>,
  pub width:        Option<i64>,
  pub height:       Option<i64>,
  pub rotation:     Option<i64>,
  pub capacity:     Option<i64>,
  #[serde(default, deserialize_with = "crate::nullable::deserialize")]
  pub min_capacity: Option<Option<i64>>,
  pub style:        Option<TableStyle>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn update_distinguishes_absent_from_null() {
    let absent: TableUpdate = serde_json::from_str("{}").unwrap();
    assert_eq!(absent.label, None);
    assert_eq!(absent.min_capacity, None);

    let cleared: TableUpdate =
      serde_json::from_str(r#"{"label": null, "min_capacity": null}"#)
        .unwrap();
    assert_eq!(cleared.label, Some(None));
    assert_eq!(cleared.min_capacity, Some(None));

    let set: TableUpdate =
      serde_json::from_str(r#"{"label": "Head table", "min_capacity": 4}"#)
        .unwrap();
    assert_eq!(set.label, Some(Some("Head table".into())));
    assert_eq!(set.min_capacity, Some(Some(4)));
  }
}
