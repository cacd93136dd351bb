//! The `SeatingStore` trait — the engine's authoritative contract.
//!
//! The trait is implemented by storage backends (e.g.
//! `seatwise-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.
//!
//! Callers are trusted for tenant scoping: the request layer must verify
//! that a floor plan's owning client belongs to the authenticated company
//! before invoking any operation here.

use std::future::Future;

use uuid::Uuid;

use crate::{
  assignment::{AssignRequest, Assignment, SeatRequest, SeatingEvaluation},
  changelog::ChangeLogEntry,
  graph::{ConflictEdge, NewConflict, NewPreference, PreferenceEdge},
  guest::Guest,
  plan::{FloorPlan, FloorPlanUpdate, NewFloorPlan},
  table::{NewTable, Table, TableUpdate},
  version::{NewVersion, Version},
};

/// Abstraction over a Seatwise storage backend.
///
/// Mutations touching more than one row (single assignment, batch
/// assignment, version save/restore, table deletion) must be atomic: either
/// every write lands or none does. Capacity and one-assignment-per-guest
/// invariants are checked inside that same transaction, before any write.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SeatingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Floor plans ───────────────────────────────────────────────────────

  fn add_floor_plan(
    &self,
    input: NewFloorPlan,
  ) -> impl Future<Output = Result<FloorPlan, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_floor_plan(
    &self,
    floor_plan_id: Uuid,
  ) -> impl Future<Output = Result<Option<FloorPlan>, Self::Error>> + Send + '_;

  fn list_floor_plans(
    &self,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Vec<FloorPlan>, Self::Error>> + Send + '_;

  fn update_floor_plan(
    &self,
    floor_plan_id: Uuid,
    update: FloorPlanUpdate,
  ) -> impl Future<Output = Result<FloorPlan, Self::Error>> + Send + '_;

  /// Cascades to the plan's tables, assignments, versions, and change log.
  fn delete_floor_plan(
    &self,
    floor_plan_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Guests ────────────────────────────────────────────────────────────

  fn add_guest(
    &self,
    client_id: Uuid,
    full_name: String,
  ) -> impl Future<Output = Result<Guest, Self::Error>> + Send + '_;

  fn get_guest(
    &self,
    guest_id: Uuid,
  ) -> impl Future<Output = Result<Option<Guest>, Self::Error>> + Send + '_;

  fn list_guests(
    &self,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Guest>, Self::Error>> + Send + '_;

  // ── Table registry ────────────────────────────────────────────────────

  /// Rejects `capacity < 1`.
  fn add_table(
    &self,
    input: NewTable,
  ) -> impl Future<Output = Result<Table, Self::Error>> + Send + '_;

  fn update_table(
    &self,
    table_id: Uuid,
    update: TableUpdate,
  ) -> impl Future<Output = Result<Table, Self::Error>> + Send + '_;

  /// Deletes the table and its assignments in one transaction.
  fn delete_table(
    &self,
    table_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_tables(
    &self,
    floor_plan_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Table>, Self::Error>> + Send + '_;

  // ── Relationship graph ────────────────────────────────────────────────

  /// Insert or update the edge for the normalized pair, reactivating it if
  /// it was previously removed.
  fn upsert_conflict(
    &self,
    input: NewConflict,
  ) -> impl Future<Output = Result<ConflictEdge, Self::Error>> + Send + '_;

  /// Soft-delete (`is_active = false`). Idempotent.
  fn remove_conflict(
    &self,
    client_id: Uuid,
    guest_a: Uuid,
    guest_b: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Active edges only.
  fn list_conflicts(
    &self,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ConflictEdge>, Self::Error>> + Send + '_;

  fn upsert_preference(
    &self,
    input: NewPreference,
  ) -> impl Future<Output = Result<PreferenceEdge, Self::Error>> + Send + '_;

  fn remove_preference(
    &self,
    client_id: Uuid,
    guest_a: Uuid,
    guest_b: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_preferences(
    &self,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PreferenceEdge>, Self::Error>> + Send + '_;

  // ── Conflict evaluator ────────────────────────────────────────────────

  /// Advisory check of a candidate placement: which guests already at
  /// `table_id` have an active conflict or preference edge with `guest_id`.
  ///
  /// Runs in O(occupants of the one table). An unknown guest yields empty
  /// result sets rather than an error — the UI calls this per hover.
  fn evaluate_seating(
    &self,
    floor_plan_id: Uuid,
    guest_id: Uuid,
    table_id: Uuid,
  ) -> impl Future<Output = Result<SeatingEvaluation, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Seat one guest, replacing any prior assignment they hold in this floor
  /// plan. Fails with a capacity error when the table is full; `force` only
  /// skips the advisory conflict evaluation, never the capacity check.
  fn assign_guest(
    &self,
    floor_plan_id: Uuid,
    req: AssignRequest,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  /// Idempotent: succeeds even if the guest holds no assignment.
  fn unassign_guest(
    &self,
    floor_plan_id: Uuid,
    guest_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_assignments(
    &self,
    floor_plan_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// All-or-nothing bulk replacement of the named guests' assignments.
  ///
  /// Capacity is validated against the *final* desired state: per-table
  /// counters are seeded from existing assignments whose guests are not in
  /// the proposal, then each proposed row claims a seat in input order. On
  /// any overflow the whole batch aborts naming the offending table.
  fn batch_assign(
    &self,
    floor_plan_id: Uuid,
    seats: Vec<SeatRequest>,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  // ── Versions ──────────────────────────────────────────────────────────

  /// Snapshot the current layout and assignments as `max(version) + 1` and
  /// mark it current (unsetting the previous current version).
  fn save_version(
    &self,
    floor_plan_id: Uuid,
    input: NewVersion,
  ) -> impl Future<Output = Result<Version, Self::Error>> + Send + '_;

  /// Ordered by version number, descending.
  fn list_versions(
    &self,
    floor_plan_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Version>, Self::Error>> + Send + '_;

  /// Replace the live assignments and table geometry with the snapshot and
  /// move the current flag to it. Tables deleted since the snapshot are
  /// silently skipped.
  fn restore_version(
    &self,
    version_id: Uuid,
    floor_plan_id: Uuid,
  ) -> impl Future<Output = Result<Version, Self::Error>> + Send + '_;

  /// Removes one version row. Deleting the current version leaves the floor
  /// plan with no current version until the next save or restore.
  fn delete_version(
    &self,
    version_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Change log ────────────────────────────────────────────────────────

  /// Newest first, capped at `limit`.
  fn list_change_log(
    &self,
    floor_plan_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ChangeLogEntry>, Self::Error>> + Send + '_;
}
