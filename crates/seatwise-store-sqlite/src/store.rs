//! [`SqliteStore`] — the SQLite implementation of [`SeatingStore`].
//!
//! Simple reads follow the collect-raw-rows-then-decode pattern. Mutations
//! that touch more than one row run as `*_tx` helper functions inside one
//! IMMEDIATE transaction: the `call` closure opens the transaction, commits
//! only on success, and carries domain failures out in an inner `Result`.

use std::{
  collections::{HashMap, HashSet},
  path::Path,
};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use seatwise_core::{
  assignment::{
    AssignRequest, Assignment, CoOccupant, SeatRequest, SeatingEvaluation,
  },
  changelog::{ChangeAction, ChangeLogEntry, SeatState},
  graph::{
    ConflictEdge, NewConflict, NewPreference, PreferenceEdge, normalize_pair,
  },
  guest::Guest,
  plan::{FloorPlan, FloorPlanUpdate, NewFloorPlan},
  store::SeatingStore,
  table::{NewTable, Table, TableUpdate},
  version::{AssignmentSnapshot, NewVersion, TableSnapshot, Version},
};

use crate::{
  Error, Result,
  encode::{
    RawAssignment, RawChangeLogEntry, RawConflictEdge, RawFloorPlan, RawGuest,
    RawPreferenceEdge, RawTable, RawVersion, encode_action,
    encode_assignment_snapshots, encode_conflict_type, encode_dt,
    encode_preference_type, encode_seat_state, encode_severity, encode_shape,
    encode_strength, encode_style, encode_table_snapshots, encode_uuid,
    decode_uuid,
  },
  schema::SCHEMA,
};

// ─── Column lists ────────────────────────────────────────────────────────────
// Shared between reads and the row-mapping functions below; column order is
// load-bearing.

const PLAN_COLS: &str = "floor_plan_id, client_id, name, canvas_width, \
   canvas_height, background_image, zoom, created_at, updated_at";
const GUEST_COLS: &str = "guest_id, client_id, full_name, created_at";
const TABLE_COLS: &str = "table_id, floor_plan_id, label, shape, x, y, width, \
   height, rotation, capacity, min_capacity, style, created_at";
const ASSIGNMENT_COLS: &str =
  "assignment_id, floor_plan_id, table_id, guest_id, seat_number, assigned_at";
const CONFLICT_COLS: &str = "edge_id, client_id, guest_a, guest_b, \
   conflict_type, severity, reason, is_active, created_at, updated_at";
const PREFERENCE_COLS: &str = "edge_id, client_id, guest_a, guest_b, \
   preference_type, strength, reason, is_active, created_at, updated_at";
const VERSION_COLS: &str = "version_id, floor_plan_id, version_number, name, \
   description, table_positions, guest_assignments, table_count, \
   assigned_guests, total_guests, is_current, is_auto_save, created_by, \
   created_at";
const CHANGE_COLS: &str = "entry_id, floor_plan_id, action, guest_id, \
   table_id, previous_state, new_state, actor, created_at";

fn plan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFloorPlan> {
  Ok(RawFloorPlan {
    floor_plan_id:    row.get(0)?,
    client_id:        row.get(1)?,
    name:             row.get(2)?,
    canvas_width:     row.get(3)?,
    canvas_height:    row.get(4)?,
    background_image: row.get(5)?,
    zoom:             row.get(6)?,
    created_at:       row.get(7)?,
    updated_at:       row.get(8)?,
  })
}

fn guest_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawGuest> {
  Ok(RawGuest {
    guest_id:   row.get(0)?,
    client_id:  row.get(1)?,
    full_name:  row.get(2)?,
    created_at: row.get(3)?,
  })
}

fn table_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTable> {
  Ok(RawTable {
    table_id:      row.get(0)?,
    floor_plan_id: row.get(1)?,
    label:         row.get(2)?,
    shape:         row.get(3)?,
    x:             row.get(4)?,
    y:             row.get(5)?,
    width:         row.get(6)?,
    height:        row.get(7)?,
    rotation:      row.get(8)?,
    capacity:      row.get(9)?,
    min_capacity:  row.get(10)?,
    style:         row.get(11)?,
    created_at:    row.get(12)?,
  })
}

fn assignment_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawAssignment> {
  Ok(RawAssignment {
    assignment_id: row.get(0)?,
    floor_plan_id: row.get(1)?,
    table_id:      row.get(2)?,
    guest_id:      row.get(3)?,
    seat_number:   row.get(4)?,
    assigned_at:   row.get(5)?,
  })
}

fn conflict_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawConflictEdge> {
  Ok(RawConflictEdge {
    edge_id:       row.get(0)?,
    client_id:     row.get(1)?,
    guest_a:       row.get(2)?,
    guest_b:       row.get(3)?,
    conflict_type: row.get(4)?,
    severity:      row.get(5)?,
    reason:        row.get(6)?,
    is_active:     row.get(7)?,
    created_at:    row.get(8)?,
    updated_at:    row.get(9)?,
  })
}

fn preference_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawPreferenceEdge> {
  Ok(RawPreferenceEdge {
    edge_id:         row.get(0)?,
    client_id:       row.get(1)?,
    guest_a:         row.get(2)?,
    guest_b:         row.get(3)?,
    preference_type: row.get(4)?,
    strength:        row.get(5)?,
    reason:          row.get(6)?,
    is_active:       row.get(7)?,
    created_at:      row.get(8)?,
    updated_at:      row.get(9)?,
  })
}

fn version_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVersion> {
  Ok(RawVersion {
    version_id:        row.get(0)?,
    floor_plan_id:     row.get(1)?,
    version_number:    row.get(2)?,
    name:              row.get(3)?,
    description:       row.get(4)?,
    table_positions:   row.get(5)?,
    guest_assignments: row.get(6)?,
    table_count:       row.get(7)?,
    assigned_guests:   row.get(8)?,
    total_guests:      row.get(9)?,
    is_current:        row.get(10)?,
    is_auto_save:      row.get(11)?,
    created_by:        row.get(12)?,
    created_at:        row.get(13)?,
  })
}

fn change_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawChangeLogEntry> {
  Ok(RawChangeLogEntry {
    entry_id:       row.get(0)?,
    floor_plan_id:  row.get(1)?,
    action:         row.get(2)?,
    guest_id:       row.get(3)?,
    table_id:       row.get(4)?,
    previous_state: row.get(5)?,
    new_state:      row.get(6)?,
    actor:          row.get(7)?,
    created_at:     row.get(8)?,
  })
}

// ─── Change log helper ───────────────────────────────────────────────────────

/// Parameters for one change-log row. Ids are pre-encoded by the caller.
struct LogChange<'a> {
  floor_plan_id:  &'a str,
  action:         ChangeAction,
  guest_id:       Option<&'a str>,
  table_id:       Option<&'a str>,
  previous_state: Option<String>,
  new_state:      Option<String>,
  actor:          Option<&'a str>,
}

fn log_change(
  conn: &rusqlite::Connection,
  rec: LogChange<'_>,
) -> rusqlite::Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO change_log ({CHANGE_COLS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
    ),
    rusqlite::params![
      encode_uuid(Uuid::new_v4()),
      rec.floor_plan_id,
      encode_action(rec.action),
      rec.guest_id,
      rec.table_id,
      rec.previous_state,
      rec.new_state,
      rec.actor,
      encode_dt(Utc::now()),
    ],
  )?;
  Ok(())
}

/// The change log is observability-only: its write result is discarded here
/// so a failed log row can never fail or roll back the primary mutation.
fn log_or_warn(conn: &rusqlite::Connection, rec: LogChange<'_>) {
  if let Err(e) = log_change(conn, rec) {
    tracing::warn!(error = %e, "change log write failed");
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Seatwise store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside one IMMEDIATE transaction, committing only on success.
  /// Domain failures travel in the inner `Result`; infrastructure failures
  /// roll back via the outer one.
  async fn transact<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&tx);
        if out.is_ok() {
          tx.commit()?;
        }
        Ok(out)
      })
      .await?
  }
}

// ─── SeatingStore impl ───────────────────────────────────────────────────────

impl SeatingStore for SqliteStore {
  type Error = Error;

  // ── Floor plans ───────────────────────────────────────────────────────────

  async fn add_floor_plan(&self, input: NewFloorPlan) -> Result<FloorPlan> {
    let now = Utc::now();
    let plan = FloorPlan {
      floor_plan_id:    Uuid::new_v4(),
      client_id:        input.client_id,
      name:             input.name,
      canvas_width:     input.canvas_width,
      canvas_height:    input.canvas_height,
      background_image: input.background_image,
      zoom:             input.zoom.unwrap_or(1.0),
      created_at:       now,
      updated_at:       now,
    };

    let row = plan.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO floor_plans ({PLAN_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
          ),
          rusqlite::params![
            encode_uuid(row.floor_plan_id),
            encode_uuid(row.client_id),
            row.name,
            row.canvas_width,
            row.canvas_height,
            row.background_image,
            row.zoom,
            encode_dt(row.created_at),
            encode_dt(row.updated_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(plan)
  }

  async fn get_floor_plan(
    &self,
    floor_plan_id: Uuid,
  ) -> Result<Option<FloorPlan>> {
    let id_str = encode_uuid(floor_plan_id);

    let raw: Option<RawFloorPlan> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PLAN_COLS} FROM floor_plans WHERE floor_plan_id = ?1"
              ),
              rusqlite::params![id_str],
              plan_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFloorPlan::into_plan).transpose()
  }

  async fn list_floor_plans(&self, client_id: Uuid) -> Result<Vec<FloorPlan>> {
    let client_str = encode_uuid(client_id);

    let raws: Vec<RawFloorPlan> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PLAN_COLS} FROM floor_plans WHERE client_id = ?1
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![client_str], plan_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFloorPlan::into_plan).collect()
  }

  async fn update_floor_plan(
    &self,
    floor_plan_id: Uuid,
    update: FloorPlanUpdate,
  ) -> Result<FloorPlan> {
    self
      .transact(move |tx| update_plan_tx(tx, floor_plan_id, update))
      .await
  }

  async fn delete_floor_plan(&self, floor_plan_id: Uuid) -> Result<()> {
    // Child rows (tables, assignments, versions, change log) cascade via
    // their foreign keys.
    self
      .transact(move |tx| {
        let affected = tx.execute(
          "DELETE FROM floor_plans WHERE floor_plan_id = ?1",
          rusqlite::params![encode_uuid(floor_plan_id)],
        )?;
        if affected == 0 {
          return Err(
            seatwise_core::Error::FloorPlanNotFound(floor_plan_id).into(),
          );
        }
        Ok(())
      })
      .await
  }

  // ── Guests ────────────────────────────────────────────────────────────────

  async fn add_guest(
    &self,
    client_id: Uuid,
    full_name: String,
  ) -> Result<Guest> {
    let guest = Guest {
      guest_id: Uuid::new_v4(),
      client_id,
      full_name,
      created_at: Utc::now(),
    };

    let row = guest.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO guests ({GUEST_COLS}) VALUES (?1, ?2, ?3, ?4)"),
          rusqlite::params![
            encode_uuid(row.guest_id),
            encode_uuid(row.client_id),
            row.full_name,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(guest)
  }

  async fn get_guest(&self, guest_id: Uuid) -> Result<Option<Guest>> {
    let id_str = encode_uuid(guest_id);

    let raw: Option<RawGuest> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {GUEST_COLS} FROM guests WHERE guest_id = ?1"),
              rusqlite::params![id_str],
              guest_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGuest::into_guest).transpose()
  }

  async fn list_guests(&self, client_id: Uuid) -> Result<Vec<Guest>> {
    let client_str = encode_uuid(client_id);

    let raws: Vec<RawGuest> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GUEST_COLS} FROM guests WHERE client_id = ?1
           ORDER BY full_name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![client_str], guest_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGuest::into_guest).collect()
  }

  // ── Table registry ────────────────────────────────────────────────────────

  async fn add_table(&self, input: NewTable) -> Result<Table> {
    if input.capacity < 1 {
      return Err(seatwise_core::Error::InvalidCapacity(input.capacity).into());
    }

    let table = Table {
      table_id:      Uuid::new_v4(),
      floor_plan_id: input.floor_plan_id,
      label:         input.label,
      shape:         input.shape,
      x:             input.x,
      y:             input.y,
      width:         input.width,
      height:        input.height,
      rotation:      input.rotation,
      capacity:      input.capacity,
      min_capacity:  input.min_capacity,
      style:         input.style,
      created_at:    Utc::now(),
    };

    let row = table.clone();
    self.transact(move |tx| add_table_tx(tx, &row)).await?;

    Ok(table)
  }

  async fn update_table(
    &self,
    table_id: Uuid,
    update: TableUpdate,
  ) -> Result<Table> {
    if let Some(capacity) = update.capacity
      && capacity < 1
    {
      return Err(seatwise_core::Error::InvalidCapacity(capacity).into());
    }

    self
      .transact(move |tx| update_table_tx(tx, table_id, update))
      .await
  }

  async fn delete_table(&self, table_id: Uuid) -> Result<()> {
    // Policy: a table takes its assignments with it, atomically. Orphaned
    // assignment rows would be invisible to the capacity check.
    self
      .transact(move |tx| {
        let id_str = encode_uuid(table_id);
        tx.execute(
          "DELETE FROM assignments WHERE table_id = ?1",
          rusqlite::params![id_str],
        )?;
        let affected = tx.execute(
          "DELETE FROM tables WHERE table_id = ?1",
          rusqlite::params![id_str],
        )?;
        if affected == 0 {
          return Err(seatwise_core::Error::TableNotFound(table_id).into());
        }
        Ok(())
      })
      .await
  }

  async fn list_tables(&self, floor_plan_id: Uuid) -> Result<Vec<Table>> {
    let plan_str = encode_uuid(floor_plan_id);

    let raws: Vec<RawTable> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TABLE_COLS} FROM tables WHERE floor_plan_id = ?1
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![plan_str], table_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTable::into_table).collect()
  }

  // ── Relationship graph ────────────────────────────────────────────────────

  async fn upsert_conflict(&self, input: NewConflict) -> Result<ConflictEdge> {
    let (guest_a, guest_b) = normalize_pair(input.guest_a, input.guest_b)
      .map_err(Error::Domain)?;

    let raw = self
      .transact(move |tx| {
        let now_str = encode_dt(Utc::now());
        tx.execute(
          &format!(
            "INSERT INTO conflict_edges ({CONFLICT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)
             ON CONFLICT (client_id, guest_a, guest_b) DO UPDATE SET
               conflict_type = excluded.conflict_type,
               severity      = excluded.severity,
               reason        = excluded.reason,
               is_active     = 1,
               updated_at    = excluded.updated_at"
          ),
          rusqlite::params![
            encode_uuid(Uuid::new_v4()),
            encode_uuid(input.client_id),
            encode_uuid(guest_a),
            encode_uuid(guest_b),
            encode_conflict_type(input.conflict_type),
            encode_severity(input.severity),
            input.reason,
            now_str,
          ],
        )?;

        // Re-read: on upsert the surviving row keeps its original edge_id
        // and created_at.
        let raw = tx.query_row(
          &format!(
            "SELECT {CONFLICT_COLS} FROM conflict_edges
             WHERE client_id = ?1 AND guest_a = ?2 AND guest_b = ?3"
          ),
          rusqlite::params![
            encode_uuid(input.client_id),
            encode_uuid(guest_a),
            encode_uuid(guest_b),
          ],
          conflict_from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_edge()
  }

  async fn remove_conflict(
    &self,
    client_id: Uuid,
    guest_a: Uuid,
    guest_b: Uuid,
  ) -> Result<()> {
    let (guest_a, guest_b) =
      normalize_pair(guest_a, guest_b).map_err(Error::Domain)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE conflict_edges SET is_active = 0, updated_at = ?4
           WHERE client_id = ?1 AND guest_a = ?2 AND guest_b = ?3",
          rusqlite::params![
            encode_uuid(client_id),
            encode_uuid(guest_a),
            encode_uuid(guest_b),
            encode_dt(Utc::now()),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_conflicts(&self, client_id: Uuid) -> Result<Vec<ConflictEdge>> {
    let client_str = encode_uuid(client_id);

    let raws: Vec<RawConflictEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONFLICT_COLS} FROM conflict_edges
           WHERE client_id = ?1 AND is_active = 1
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![client_str], conflict_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConflictEdge::into_edge).collect()
  }

  async fn upsert_preference(
    &self,
    input: NewPreference,
  ) -> Result<PreferenceEdge> {
    let (guest_a, guest_b) = normalize_pair(input.guest_a, input.guest_b)
      .map_err(Error::Domain)?;

    let raw = self
      .transact(move |tx| {
        let now_str = encode_dt(Utc::now());
        tx.execute(
          &format!(
            "INSERT INTO preference_edges ({PREFERENCE_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)
             ON CONFLICT (client_id, guest_a, guest_b) DO UPDATE SET
               preference_type = excluded.preference_type,
               strength        = excluded.strength,
               reason          = excluded.reason,
               is_active       = 1,
               updated_at      = excluded.updated_at"
          ),
          rusqlite::params![
            encode_uuid(Uuid::new_v4()),
            encode_uuid(input.client_id),
            encode_uuid(guest_a),
            encode_uuid(guest_b),
            encode_preference_type(input.preference_type),
            encode_strength(input.strength),
            input.reason,
            now_str,
          ],
        )?;

        let raw = tx.query_row(
          &format!(
            "SELECT {PREFERENCE_COLS} FROM preference_edges
             WHERE client_id = ?1 AND guest_a = ?2 AND guest_b = ?3"
          ),
          rusqlite::params![
            encode_uuid(input.client_id),
            encode_uuid(guest_a),
            encode_uuid(guest_b),
          ],
          preference_from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_edge()
  }

  async fn remove_preference(
    &self,
    client_id: Uuid,
    guest_a: Uuid,
    guest_b: Uuid,
  ) -> Result<()> {
    let (guest_a, guest_b) =
      normalize_pair(guest_a, guest_b).map_err(Error::Domain)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE preference_edges SET is_active = 0, updated_at = ?4
           WHERE client_id = ?1 AND guest_a = ?2 AND guest_b = ?3",
          rusqlite::params![
            encode_uuid(client_id),
            encode_uuid(guest_a),
            encode_uuid(guest_b),
            encode_dt(Utc::now()),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_preferences(
    &self,
    client_id: Uuid,
  ) -> Result<Vec<PreferenceEdge>> {
    let client_str = encode_uuid(client_id);

    let raws: Vec<RawPreferenceEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PREFERENCE_COLS} FROM preference_edges
           WHERE client_id = ?1 AND is_active = 1
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![client_str], preference_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPreferenceEdge::into_edge).collect()
  }

  // ── Conflict evaluator ────────────────────────────────────────────────────

  async fn evaluate_seating(
    &self,
    floor_plan_id: Uuid,
    guest_id: Uuid,
    table_id: Uuid,
  ) -> Result<SeatingEvaluation> {
    // UI-facing leniency: an unknown guest evaluates to an empty result
    // rather than an error.
    let Some(guest) = self.get_guest(guest_id).await? else {
      return Ok(SeatingEvaluation::default());
    };

    let plan_str = encode_uuid(floor_plan_id);
    let table_str = encode_uuid(table_id);
    let guest_str = encode_uuid(guest_id);
    let client_str = encode_uuid(guest.client_id);

    self
      .conn
      .call(move |conn| {
        Ok(evaluate_tx(conn, &plan_str, &table_str, &guest_str, &client_str))
      })
      .await?
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn assign_guest(
    &self,
    floor_plan_id: Uuid,
    req: AssignRequest,
  ) -> Result<Assignment> {
    let assignment = Assignment {
      assignment_id: Uuid::new_v4(),
      floor_plan_id,
      table_id: req.table_id,
      guest_id: req.guest_id,
      seat_number: req.seat_number,
      assigned_at: Utc::now(),
    };

    let row = assignment.clone();
    self
      .transact(move |tx| assign_tx(tx, &req, &row))
      .await?;

    Ok(assignment)
  }

  async fn unassign_guest(
    &self,
    floor_plan_id: Uuid,
    guest_id: Uuid,
  ) -> Result<()> {
    self
      .transact(move |tx| unassign_tx(tx, floor_plan_id, guest_id))
      .await
  }

  async fn list_assignments(
    &self,
    floor_plan_id: Uuid,
  ) -> Result<Vec<Assignment>> {
    let plan_str = encode_uuid(floor_plan_id);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSIGNMENT_COLS} FROM assignments
           WHERE floor_plan_id = ?1
           ORDER BY assigned_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![plan_str], assignment_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn batch_assign(
    &self,
    floor_plan_id: Uuid,
    seats: Vec<SeatRequest>,
  ) -> Result<Vec<Assignment>> {
    if seats.is_empty() {
      return Err(seatwise_core::Error::EmptyBatch.into());
    }
    let mut seen = HashSet::new();
    for seat in &seats {
      if !seen.insert(seat.guest_id) {
        return Err(
          seatwise_core::Error::DuplicateGuestInBatch(seat.guest_id).into(),
        );
      }
    }

    let now = Utc::now();
    let assignments: Vec<Assignment> = seats
      .iter()
      .map(|seat| Assignment {
        assignment_id: Uuid::new_v4(),
        floor_plan_id,
        table_id: seat.table_id,
        guest_id: seat.guest_id,
        seat_number: seat.seat_number,
        assigned_at: now,
      })
      .collect();

    let rows = assignments.clone();
    self
      .transact(move |tx| batch_tx(tx, floor_plan_id, &rows))
      .await?;

    Ok(assignments)
  }

  // ── Versions ──────────────────────────────────────────────────────────────

  async fn save_version(
    &self,
    floor_plan_id: Uuid,
    input: NewVersion,
  ) -> Result<Version> {
    self
      .transact(move |tx| save_version_tx(tx, floor_plan_id, input))
      .await
  }

  async fn list_versions(&self, floor_plan_id: Uuid) -> Result<Vec<Version>> {
    let plan_str = encode_uuid(floor_plan_id);

    let raws: Vec<RawVersion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VERSION_COLS} FROM versions
           WHERE floor_plan_id = ?1
           ORDER BY version_number DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![plan_str], version_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVersion::into_version).collect()
  }

  async fn restore_version(
    &self,
    version_id: Uuid,
    floor_plan_id: Uuid,
  ) -> Result<Version> {
    self
      .transact(move |tx| restore_version_tx(tx, version_id, floor_plan_id))
      .await
  }

  async fn delete_version(&self, version_id: Uuid) -> Result<()> {
    // Deliberately no is_current bookkeeping: deleting the current version
    // leaves the plan with no current version until the next save/restore.
    self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "DELETE FROM versions WHERE version_id = ?1",
          rusqlite::params![encode_uuid(version_id)],
        )?;
        if affected == 0 {
          return Ok(Err(
            seatwise_core::Error::VersionNotFound(version_id).into(),
          ));
        }
        Ok(Ok(()))
      })
      .await?
  }

  // ── Change log ────────────────────────────────────────────────────────────

  async fn list_change_log(
    &self,
    floor_plan_id: Uuid,
    limit: usize,
  ) -> Result<Vec<ChangeLogEntry>> {
    let plan_str = encode_uuid(floor_plan_id);
    // A negative LIMIT means unlimited to SQLite; clamp instead of wrapping.
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawChangeLogEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CHANGE_COLS} FROM change_log
           WHERE floor_plan_id = ?1
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![plan_str, limit], change_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChangeLogEntry::into_entry).collect()
  }
}

// ─── Transaction bodies ──────────────────────────────────────────────────────

fn update_plan_tx(
  tx: &rusqlite::Transaction<'_>,
  floor_plan_id: Uuid,
  update: FloorPlanUpdate,
) -> Result<FloorPlan> {
  let id_str = encode_uuid(floor_plan_id);

  let raw = tx
    .query_row(
      &format!("SELECT {PLAN_COLS} FROM floor_plans WHERE floor_plan_id = ?1"),
      rusqlite::params![&id_str],
      plan_from_row,
    )
    .optional()?
    .ok_or(seatwise_core::Error::FloorPlanNotFound(floor_plan_id))?;

  let mut plan = raw.into_plan()?;
  if let Some(name) = update.name {
    plan.name = name;
  }
  if let Some(width) = update.canvas_width {
    plan.canvas_width = width;
  }
  if let Some(height) = update.canvas_height {
    plan.canvas_height = height;
  }
  if let Some(background) = update.background_image {
    plan.background_image = background;
  }
  if let Some(zoom) = update.zoom {
    plan.zoom = zoom;
  }
  plan.updated_at = Utc::now();

  tx.execute(
    "UPDATE floor_plans
     SET name = ?2, canvas_width = ?3, canvas_height = ?4,
         background_image = ?5, zoom = ?6, updated_at = ?7
     WHERE floor_plan_id = ?1",
    rusqlite::params![
      id_str,
      plan.name,
      plan.canvas_width,
      plan.canvas_height,
      plan.background_image,
      plan.zoom,
      encode_dt(plan.updated_at),
    ],
  )?;

  Ok(plan)
}

fn add_table_tx(tx: &rusqlite::Transaction<'_>, table: &Table) -> Result<()> {
  let plan_str = encode_uuid(table.floor_plan_id);
  let exists: bool = tx
    .query_row(
      "SELECT 1 FROM floor_plans WHERE floor_plan_id = ?1",
      rusqlite::params![&plan_str],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  if !exists {
    return Err(
      seatwise_core::Error::FloorPlanNotFound(table.floor_plan_id).into(),
    );
  }

  tx.execute(
    &format!(
      "INSERT INTO tables ({TABLE_COLS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
    ),
    rusqlite::params![
      encode_uuid(table.table_id),
      plan_str,
      table.label,
      encode_shape(table.shape),
      table.x,
      table.y,
      table.width,
      table.height,
      table.rotation,
      table.capacity,
      table.min_capacity,
      encode_style(&table.style)?,
      encode_dt(table.created_at),
    ],
  )?;
  Ok(())
}

fn update_table_tx(
  tx: &rusqlite::Transaction<'_>,
  table_id: Uuid,
  update: TableUpdate,
) -> Result<Table> {
  let id_str = encode_uuid(table_id);

  let raw = tx
    .query_row(
      &format!("SELECT {TABLE_COLS} FROM tables WHERE table_id = ?1"),
      rusqlite::params![&id_str],
      table_from_row,
    )
    .optional()?
    .ok_or(seatwise_core::Error::TableNotFound(table_id))?;

  let mut table = raw.into_table()?;
  if let Some(label) = update.label {
    table.label = label;
  }
  if let Some(shape) = update.shape {
    table.shape = shape;
  }
  if let Some(x) = update.x {
    table.x = x;
  }
  if let Some(y) = update.y {
    table.y = y;
  }
  if let Some(width) = update.width {
    table.width = width;
  }
  if let Some(height) = update.height {
    table.height = height;
  }
  if let Some(rotation) = update.rotation {
    table.rotation = rotation;
  }
  if let Some(capacity) = update.capacity {
    table.capacity = capacity;
  }
  if let Some(min_capacity) = update.min_capacity {
    table.min_capacity = min_capacity;
  }
  if let Some(style) = update.style {
    table.style = style;
  }

  tx.execute(
    "UPDATE tables
     SET label = ?2, shape = ?3, x = ?4, y = ?5, width = ?6, height = ?7,
         rotation = ?8, capacity = ?9, min_capacity = ?10, style = ?11
     WHERE table_id = ?1",
    rusqlite::params![
      id_str,
      table.label,
      encode_shape(table.shape),
      table.x,
      table.y,
      table.width,
      table.height,
      table.rotation,
      table.capacity,
      table.min_capacity,
      encode_style(&table.style)?,
    ],
  )?;

  Ok(table)
}

/// Intersect the guests seated at one table with the active conflict and
/// preference edges of `guest`. Joins are scoped to the single target table,
/// so cost tracks occupants-at-table, not the roster size.
fn evaluate_tx(
  conn: &rusqlite::Connection,
  plan: &str,
  table: &str,
  guest: &str,
  client: &str,
) -> Result<SeatingEvaluation> {
  let co_occupants = |edge_table: &str| -> Result<Vec<CoOccupant>> {
    let mut stmt = conn.prepare(&format!(
      "SELECT a.guest_id, g.full_name
       FROM assignments a
       JOIN guests g ON g.guest_id = a.guest_id
       JOIN {edge_table} e ON e.client_id = ?4 AND e.is_active = 1
         AND ((e.guest_a = ?3 AND e.guest_b = a.guest_id)
           OR (e.guest_b = ?3 AND e.guest_a = a.guest_id))
       WHERE a.floor_plan_id = ?1 AND a.table_id = ?2 AND a.guest_id != ?3"
    ))?;
    let rows = stmt
      .query_map(rusqlite::params![plan, table, guest, client], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    rows
      .into_iter()
      .map(|(id, full_name)| {
        Ok(CoOccupant { guest_id: decode_uuid(&id)?, full_name })
      })
      .collect()
  };

  Ok(SeatingEvaluation {
    conflicts:   co_occupants("conflict_edges")?,
    preferences: co_occupants("preference_edges")?,
  })
}

fn assign_tx(
  tx: &rusqlite::Transaction<'_>,
  req: &AssignRequest,
  assignment: &Assignment,
) -> Result<()> {
  let plan_str = encode_uuid(assignment.floor_plan_id);
  let table_str = encode_uuid(req.table_id);
  let guest_str = encode_uuid(req.guest_id);

  let capacity: Option<i64> = tx
    .query_row(
      "SELECT capacity FROM tables
       WHERE table_id = ?1 AND floor_plan_id = ?2",
      rusqlite::params![&table_str, &plan_str],
      |row| row.get(0),
    )
    .optional()?;
  let Some(capacity) = capacity else {
    return Err(seatwise_core::Error::TableNotFound(req.table_id).into());
  };

  let client_str: Option<String> = tx
    .query_row(
      "SELECT client_id FROM guests WHERE guest_id = ?1",
      rusqlite::params![&guest_str],
      |row| row.get(0),
    )
    .optional()?;
  let Some(client_str) = client_str else {
    return Err(seatwise_core::Error::GuestNotFound(req.guest_id).into());
  };

  // The guest's own current seat (if any at this table) frees up when they
  // move, so it is excluded from the count. Not overridable by `force`.
  let occupied: i64 = tx.query_row(
    "SELECT COUNT(*) FROM assignments
     WHERE floor_plan_id = ?1 AND table_id = ?2 AND guest_id != ?3",
    rusqlite::params![&plan_str, &table_str, &guest_str],
    |row| row.get(0),
  )?;
  if occupied >= capacity {
    return Err(
      seatwise_core::Error::CapacityExceeded {
        table_id: req.table_id,
        capacity,
        occupied: occupied + 1,
      }
      .into(),
    );
  }

  // Advisory only: conflicts never block, but an override is recorded.
  // `force` means the caller already showed the warning.
  if !req.force {
    let eval = evaluate_tx(tx, &plan_str, &table_str, &guest_str, &client_str)?;
    if eval.has_conflicts() {
      let new_state = encode_seat_state(&SeatState {
        table_id:    req.table_id,
        seat_number: req.seat_number,
      })?;
      log_or_warn(tx, LogChange {
        floor_plan_id:  &plan_str,
        action:         ChangeAction::ConflictOverridden,
        guest_id:       Some(&guest_str),
        table_id:       Some(&table_str),
        previous_state: None,
        new_state:      Some(new_state),
        actor:          None,
      });
    }
  }

  // One assignment per (floor plan, guest): replace the prior row.
  let previous: Option<(String, Option<i64>)> = tx
    .query_row(
      "SELECT table_id, seat_number FROM assignments
       WHERE floor_plan_id = ?1 AND guest_id = ?2",
      rusqlite::params![&plan_str, &guest_str],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?;
  let previous_state = previous
    .map(|(table, seat_number)| {
      encode_seat_state(&SeatState {
        table_id: decode_uuid(&table)?,
        seat_number,
      })
    })
    .transpose()?;
  tx.execute(
    "DELETE FROM assignments WHERE floor_plan_id = ?1 AND guest_id = ?2",
    rusqlite::params![&plan_str, &guest_str],
  )?;

  tx.execute(
    &format!(
      "INSERT INTO assignments ({ASSIGNMENT_COLS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
    ),
    rusqlite::params![
      encode_uuid(assignment.assignment_id),
      plan_str,
      table_str,
      guest_str,
      assignment.seat_number,
      encode_dt(assignment.assigned_at),
    ],
  )?;

  let new_state = encode_seat_state(&SeatState {
    table_id:    req.table_id,
    seat_number: req.seat_number,
  })?;
  log_or_warn(tx, LogChange {
    floor_plan_id: &plan_str,
    action: ChangeAction::GuestAssigned,
    guest_id: Some(&guest_str),
    table_id: Some(&table_str),
    previous_state,
    new_state: Some(new_state),
    actor: None,
  });

  Ok(())
}

fn unassign_tx(
  tx: &rusqlite::Transaction<'_>,
  floor_plan_id: Uuid,
  guest_id: Uuid,
) -> Result<()> {
  let plan_str = encode_uuid(floor_plan_id);
  let guest_str = encode_uuid(guest_id);

  // Idempotent: nothing seated, nothing to do, no error.
  let previous: Option<(String, Option<i64>)> = tx
    .query_row(
      "SELECT table_id, seat_number FROM assignments
       WHERE floor_plan_id = ?1 AND guest_id = ?2",
      rusqlite::params![&plan_str, &guest_str],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?;
  let Some((table_str, seat_number)) = previous else {
    return Ok(());
  };

  tx.execute(
    "DELETE FROM assignments WHERE floor_plan_id = ?1 AND guest_id = ?2",
    rusqlite::params![&plan_str, &guest_str],
  )?;

  let previous_state = encode_seat_state(&SeatState {
    table_id: decode_uuid(&table_str)?,
    seat_number,
  })?;
  log_or_warn(tx, LogChange {
    floor_plan_id:  &plan_str,
    action:         ChangeAction::GuestUnassigned,
    guest_id:       Some(&guest_str),
    table_id:       Some(&table_str),
    previous_state: Some(previous_state),
    new_state:      None,
    actor:          None,
  });

  Ok(())
}

/// Two-phase batch write: validate every proposed seat against the *final*
/// desired occupancy, then replace the named guests' rows. Counting against
/// the final state avoids order-dependent false capacity failures when a
/// batch shuffles guests between tables.
fn batch_tx(
  tx: &rusqlite::Transaction<'_>,
  floor_plan_id: Uuid,
  assignments: &[Assignment],
) -> Result<()> {
  let plan_str = encode_uuid(floor_plan_id);

  // Phase 1a: capacities of every distinct target table.
  let mut capacities: HashMap<Uuid, i64> = HashMap::new();
  for a in assignments {
    if capacities.contains_key(&a.table_id) {
      continue;
    }
    let capacity: Option<i64> = tx
      .query_row(
        "SELECT capacity FROM tables
         WHERE table_id = ?1 AND floor_plan_id = ?2",
        rusqlite::params![encode_uuid(a.table_id), &plan_str],
        |row| row.get(0),
      )
      .optional()?;
    let Some(capacity) = capacity else {
      return Err(seatwise_core::Error::TableNotFound(a.table_id).into());
    };
    capacities.insert(a.table_id, capacity);
  }

  // Phase 1b: seed per-table occupancy from assignments whose guests are
  // NOT being reassigned; their rows survive the batch.
  let guest_strs: Vec<String> =
    assignments.iter().map(|a| encode_uuid(a.guest_id)).collect();
  let placeholders = (2..guest_strs.len() + 2)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");

  let mut occupancy: HashMap<Uuid, i64> = HashMap::new();
  {
    let mut stmt = tx.prepare(&format!(
      "SELECT table_id, COUNT(*) FROM assignments
       WHERE floor_plan_id = ?1 AND guest_id NOT IN ({placeholders})
       GROUP BY table_id"
    ))?;
    let mut params: Vec<&dyn rusqlite::ToSql> = vec![&plan_str];
    for g in &guest_strs {
      params.push(g);
    }
    let rows = stmt
      .query_map(params.as_slice(), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    for (table_str, count) in rows {
      occupancy.insert(decode_uuid(&table_str)?, count);
    }
  }

  // Phase 1c: claim seats in input order; abort the whole batch on the
  // first overflow, naming the table.
  for a in assignments {
    let capacity = capacities[&a.table_id];
    let seated = occupancy.entry(a.table_id).or_insert(0);
    *seated += 1;
    if *seated > capacity {
      return Err(
        seatwise_core::Error::CapacityExceeded {
          table_id: a.table_id,
          capacity,
          occupied: *seated,
        }
        .into(),
      );
    }
  }

  // Phase 2: replace. Delete every named guest's existing row, then bulk
  // insert the proposal.
  {
    let mut params: Vec<&dyn rusqlite::ToSql> = vec![&plan_str];
    for g in &guest_strs {
      params.push(g);
    }
    tx.execute(
      &format!(
        "DELETE FROM assignments
         WHERE floor_plan_id = ?1 AND guest_id IN ({placeholders})"
      ),
      params.as_slice(),
    )?;
  }

  let mut insert = tx.prepare(&format!(
    "INSERT INTO assignments ({ASSIGNMENT_COLS})
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
  ))?;
  for a in assignments {
    insert.execute(rusqlite::params![
      encode_uuid(a.assignment_id),
      plan_str,
      encode_uuid(a.table_id),
      encode_uuid(a.guest_id),
      a.seat_number,
      encode_dt(a.assigned_at),
    ])?;
  }

  log_or_warn(tx, LogChange {
    floor_plan_id:  &plan_str,
    action:         ChangeAction::BatchAssigned,
    guest_id:       None,
    table_id:       None,
    previous_state: None,
    new_state:      None,
    actor:          None,
  });

  Ok(())
}

fn save_version_tx(
  tx: &rusqlite::Transaction<'_>,
  floor_plan_id: Uuid,
  input: NewVersion,
) -> Result<Version> {
  let plan_str = encode_uuid(floor_plan_id);

  let client_str: Option<String> = tx
    .query_row(
      "SELECT client_id FROM floor_plans WHERE floor_plan_id = ?1",
      rusqlite::params![&plan_str],
      |row| row.get(0),
    )
    .optional()?;
  let Some(client_str) = client_str else {
    return Err(seatwise_core::Error::FloorPlanNotFound(floor_plan_id).into());
  };

  // Snapshot table geometry.
  let raw_tables: Vec<RawTable> = {
    let mut stmt = tx.prepare(&format!(
      "SELECT {TABLE_COLS} FROM tables WHERE floor_plan_id = ?1
       ORDER BY created_at"
    ))?;
    let rows = stmt
      .query_map(rusqlite::params![&plan_str], table_from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    rows
  };
  let table_positions: Vec<TableSnapshot> = raw_tables
    .into_iter()
    .map(|raw| Ok(TableSnapshot::of(&raw.into_table()?)))
    .collect::<Result<_>>()?;

  // Snapshot assignments.
  let guest_assignments: Vec<AssignmentSnapshot> = {
    let mut stmt = tx.prepare(
      "SELECT guest_id, table_id, seat_number FROM assignments
       WHERE floor_plan_id = ?1",
    )?;
    let rows = stmt
      .query_map(rusqlite::params![&plan_str], |row| {
        Ok((
          row.get::<_, String>(0)?,
          row.get::<_, String>(1)?,
          row.get::<_, Option<i64>>(2)?,
        ))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    rows
      .into_iter()
      .map(|(guest, table, seat_number)| {
        Ok(AssignmentSnapshot {
          guest_id: decode_uuid(&guest)?,
          table_id: decode_uuid(&table)?,
          seat_number,
        })
      })
      .collect::<Result<_>>()?
  };

  let version_number: i64 = tx.query_row(
    "SELECT COALESCE(MAX(version_number), 0) + 1 FROM versions
     WHERE floor_plan_id = ?1",
    rusqlite::params![&plan_str],
    |row| row.get(0),
  )?;
  let total_guests: i64 = tx.query_row(
    "SELECT COUNT(*) FROM guests WHERE client_id = ?1",
    rusqlite::params![&client_str],
    |row| row.get(0),
  )?;

  let version = Version {
    version_id: Uuid::new_v4(),
    floor_plan_id,
    version_number,
    name: input.name,
    description: input.description,
    table_count: table_positions.len() as i64,
    assigned_guests: guest_assignments.len() as i64,
    total_guests,
    table_positions,
    guest_assignments,
    is_current: true,
    is_auto_save: input.is_auto_save,
    created_by: input.created_by,
    created_at: Utc::now(),
  };

  // Single-current invariant: unset, then set, inside this transaction.
  tx.execute(
    "UPDATE versions SET is_current = 0
     WHERE floor_plan_id = ?1 AND is_current = 1",
    rusqlite::params![&plan_str],
  )?;
  tx.execute(
    &format!(
      "INSERT INTO versions ({VERSION_COLS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?12, ?13)"
    ),
    rusqlite::params![
      encode_uuid(version.version_id),
      plan_str,
      version.version_number,
      version.name,
      version.description,
      encode_table_snapshots(&version.table_positions)?,
      encode_assignment_snapshots(&version.guest_assignments)?,
      version.table_count,
      version.assigned_guests,
      version.total_guests,
      version.is_auto_save,
      version.created_by,
      encode_dt(version.created_at),
    ],
  )?;

  log_or_warn(tx, LogChange {
    floor_plan_id:  &plan_str,
    action:         ChangeAction::VersionSaved,
    guest_id:       None,
    table_id:       None,
    previous_state: None,
    new_state:      None,
    actor:          version.created_by.as_deref(),
  });

  Ok(version)
}

fn restore_version_tx(
  tx: &rusqlite::Transaction<'_>,
  version_id: Uuid,
  floor_plan_id: Uuid,
) -> Result<Version> {
  let plan_str = encode_uuid(floor_plan_id);
  let version_str = encode_uuid(version_id);

  let raw = tx
    .query_row(
      &format!(
        "SELECT {VERSION_COLS} FROM versions
         WHERE version_id = ?1 AND floor_plan_id = ?2"
      ),
      rusqlite::params![&version_str, &plan_str],
      version_from_row,
    )
    .optional()?
    .ok_or(seatwise_core::Error::VersionNotFound(version_id))?;
  let mut version = raw.into_version()?;

  tx.execute(
    "DELETE FROM assignments WHERE floor_plan_id = ?1",
    rusqlite::params![&plan_str],
  )?;

  // Rewrite geometry; tables deleted since the snapshot are silently
  // skipped (zero rows affected).
  for snap in &version.table_positions {
    tx.execute(
      "UPDATE tables
       SET x = ?3, y = ?4, width = ?5, height = ?6, rotation = ?7
       WHERE table_id = ?1 AND floor_plan_id = ?2",
      rusqlite::params![
        encode_uuid(snap.table_id),
        &plan_str,
        snap.x,
        snap.y,
        snap.width,
        snap.height,
        snap.rotation,
      ],
    )?;
  }

  // Re-seat the snapshot, skipping placements at tables that no longer
  // exist.
  let existing: HashSet<String> = {
    let mut stmt =
      tx.prepare("SELECT table_id FROM tables WHERE floor_plan_id = ?1")?;
    let rows = stmt
      .query_map(rusqlite::params![&plan_str], |row| row.get::<_, String>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().collect()
  };

  let now_str = encode_dt(Utc::now());
  let mut insert = tx.prepare(&format!(
    "INSERT INTO assignments ({ASSIGNMENT_COLS})
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
  ))?;
  for snap in &version.guest_assignments {
    let table_str = encode_uuid(snap.table_id);
    if !existing.contains(&table_str) {
      continue;
    }
    insert.execute(rusqlite::params![
      encode_uuid(Uuid::new_v4()),
      plan_str,
      table_str,
      encode_uuid(snap.guest_id),
      snap.seat_number,
      now_str,
    ])?;
  }

  // Move the current flag: unset, then set, inside this transaction.
  tx.execute(
    "UPDATE versions SET is_current = 0
     WHERE floor_plan_id = ?1 AND is_current = 1",
    rusqlite::params![&plan_str],
  )?;
  tx.execute(
    "UPDATE versions SET is_current = 1 WHERE version_id = ?1",
    rusqlite::params![&version_str],
  )?;
  version.is_current = true;

  log_or_warn(tx, LogChange {
    floor_plan_id:  &plan_str,
    action:         ChangeAction::VersionRestored,
    guest_id:       None,
    table_id:       None,
    previous_state: None,
    new_state:      None,
    actor:          None,
  });

  Ok(version)
}
