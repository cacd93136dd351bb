//! Integration tests for `SqliteStore` against an in-memory database.

use seatwise_core::{
  assignment::{AssignRequest, SeatRequest},
  changelog::ChangeAction,
  graph::{
    ConflictType, NewConflict, NewPreference, PreferenceType, Severity,
    Strength,
  },
  plan::{FloorPlanUpdate, NewFloorPlan},
  store::SeatingStore,
  table::{NewTable, TableShape, TableStyle, TableUpdate},
  version::NewVersion,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_plan(client_id: Uuid) -> NewFloorPlan {
  NewFloorPlan {
    client_id,
    name: "Reception".into(),
    canvas_width: 1200,
    canvas_height: 800,
    background_image: None,
    zoom: None,
  }
}

fn new_table(floor_plan_id: Uuid, capacity: i64) -> NewTable {
  NewTable {
    floor_plan_id,
    label: None,
    shape: TableShape::Round,
    x: 100,
    y: 100,
    width: 120,
    height: 120,
    rotation: 0,
    capacity,
    min_capacity: None,
    style: TableStyle::default(),
  }
}

fn seat(table_id: Uuid, guest_id: Uuid) -> AssignRequest {
  AssignRequest { table_id, guest_id, seat_number: None, force: false }
}

fn conflict(client_id: Uuid, guest_a: Uuid, guest_b: Uuid) -> NewConflict {
  NewConflict {
    client_id,
    guest_a,
    guest_b,
    conflict_type: ConflictType::FamilyDrama,
    severity: Severity::High,
    reason: None,
  }
}

fn preference(client_id: Uuid, guest_a: Uuid, guest_b: Uuid) -> NewPreference {
  NewPreference {
    client_id,
    guest_a,
    guest_b,
    preference_type: PreferenceType::Together,
    strength: Strength::Preferred,
    reason: None,
  }
}

fn named_version(name: &str) -> NewVersion {
  NewVersion {
    name:         name.into(),
    description:  None,
    is_auto_save: false,
    created_by:   None,
  }
}

// ─── Floor plans ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_floor_plan() {
  let s = store().await;
  let client = Uuid::new_v4();

  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  assert_eq!(plan.client_id, client);
  assert_eq!(plan.zoom, 1.0);

  let fetched = s.get_floor_plan(plan.floor_plan_id).await.unwrap().unwrap();
  assert_eq!(fetched.floor_plan_id, plan.floor_plan_id);
  assert_eq!(fetched.name, "Reception");
}

#[tokio::test]
async fn get_floor_plan_missing_returns_none() {
  let s = store().await;
  assert!(s.get_floor_plan(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_floor_plans_scoped_to_client() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  s.add_floor_plan(new_plan(alice)).await.unwrap();
  s.add_floor_plan(new_plan(alice)).await.unwrap();
  s.add_floor_plan(new_plan(bob)).await.unwrap();

  let plans = s.list_floor_plans(alice).await.unwrap();
  assert_eq!(plans.len(), 2);
  assert!(plans.iter().all(|p| p.client_id == alice));
}

#[tokio::test]
async fn update_floor_plan_merges_partial_fields() {
  let s = store().await;
  let mut input = new_plan(Uuid::new_v4());
  input.background_image = Some("bg.png".into());
  let plan = s.add_floor_plan(input).await.unwrap();

  let updated = s
    .update_floor_plan(plan.floor_plan_id, FloorPlanUpdate {
      name: Some("Ballroom".into()),
      background_image: Some(None),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.name, "Ballroom");
  assert_eq!(updated.background_image, None);
  // Untouched fields survive.
  assert_eq!(updated.canvas_width, plan.canvas_width);
  assert_eq!(updated.zoom, plan.zoom);
}

#[tokio::test]
async fn update_missing_floor_plan_errors() {
  let s = store().await;
  let err = s
    .update_floor_plan(Uuid::new_v4(), FloorPlanUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::FloorPlanNotFound(_))
  ));
}

#[tokio::test]
async fn delete_floor_plan_cascades() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice Liddell".into()).await.unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, guest.guest_id))
    .await
    .unwrap();
  s.save_version(plan.floor_plan_id, named_version("v1"))
    .await
    .unwrap();

  s.delete_floor_plan(plan.floor_plan_id).await.unwrap();

  assert!(s.get_floor_plan(plan.floor_plan_id).await.unwrap().is_none());
  assert!(s.list_tables(plan.floor_plan_id).await.unwrap().is_empty());
  assert!(s.list_assignments(plan.floor_plan_id).await.unwrap().is_empty());
  assert!(s.list_versions(plan.floor_plan_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_floor_plan_errors() {
  let s = store().await;
  let err = s.delete_floor_plan(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::FloorPlanNotFound(_))
  ));
}

// ─── Guests ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_guest() {
  let s = store().await;
  let client = Uuid::new_v4();

  let guest = s.add_guest(client, "Alice Liddell".into()).await.unwrap();
  let fetched = s.get_guest(guest.guest_id).await.unwrap().unwrap();
  assert_eq!(fetched.full_name, "Alice Liddell");
  assert_eq!(fetched.client_id, client);
}

#[tokio::test]
async fn list_guests_scoped_and_sorted_by_name() {
  let s = store().await;
  let client = Uuid::new_v4();
  s.add_guest(client, "Charlie".into()).await.unwrap();
  s.add_guest(client, "Alice".into()).await.unwrap();
  s.add_guest(Uuid::new_v4(), "Mallory".into()).await.unwrap();

  let guests = s.list_guests(client).await.unwrap();
  let names: Vec<_> = guests.iter().map(|g| g.full_name.as_str()).collect();
  assert_eq!(names, vec!["Alice", "Charlie"]);
}

// ─── Table registry ──────────────────────────────────────────────────────────

#[tokio::test]
async fn add_table_rejects_zero_capacity() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();

  let err = s.add_table(new_table(plan.floor_plan_id, 0)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::InvalidCapacity(0))
  ));
}

#[tokio::test]
async fn add_table_to_missing_plan_errors() {
  let s = store().await;
  let err = s.add_table(new_table(Uuid::new_v4(), 4)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::FloorPlanNotFound(_))
  ));
}

#[tokio::test]
async fn update_table_merges_partial_fields() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();

  let updated = s
    .update_table(table.table_id, TableUpdate {
      label: Some(Some("Head table".into())),
      x: Some(400),
      capacity: Some(10),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.label.as_deref(), Some("Head table"));
  assert_eq!(updated.x, 400);
  assert_eq!(updated.capacity, 10);
  assert_eq!(updated.y, table.y);
  assert_eq!(updated.shape, table.shape);
}

#[tokio::test]
async fn update_table_rejects_zero_capacity() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();

  let err = s
    .update_table(table.table_id, TableUpdate {
      capacity: Some(0),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::InvalidCapacity(0))
  ));
}

#[tokio::test]
async fn delete_table_removes_its_assignments() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, guest.guest_id))
    .await
    .unwrap();

  s.delete_table(table.table_id).await.unwrap();

  assert!(s.list_tables(plan.floor_plan_id).await.unwrap().is_empty());
  assert!(s.list_assignments(plan.floor_plan_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_table_errors() {
  let s = store().await;
  let err = s.delete_table(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::TableNotFound(_))
  ));
}

// ─── Relationship graph ──────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_conflict_normalizes_pair() {
  let s = store().await;
  let client = Uuid::new_v4();
  let lo = Uuid::from_u128(1);
  let hi = Uuid::from_u128(2);

  // Added in reverse order; stored normalized.
  let edge = s.upsert_conflict(conflict(client, hi, lo)).await.unwrap();
  assert_eq!(edge.guest_a, lo);
  assert_eq!(edge.guest_b, hi);
  assert!(edge.is_active);
}

#[tokio::test]
async fn upsert_conflict_twice_updates_in_place() {
  let s = store().await;
  let client = Uuid::new_v4();
  let a = Uuid::from_u128(1);
  let b = Uuid::from_u128(2);

  let first = s.upsert_conflict(conflict(client, a, b)).await.unwrap();
  let mut again = conflict(client, b, a);
  again.severity = Severity::Critical;
  let second = s.upsert_conflict(again).await.unwrap();

  // Same row survives: edge_id and created_at are stable across upserts.
  assert_eq!(second.edge_id, first.edge_id);
  assert_eq!(second.created_at, first.created_at);
  assert_eq!(second.severity, Severity::Critical);

  let edges = s.list_conflicts(client).await.unwrap();
  assert_eq!(edges.len(), 1);
}

#[tokio::test]
async fn remove_conflict_then_readd_reactivates() {
  let s = store().await;
  let client = Uuid::new_v4();
  let a = Uuid::from_u128(1);
  let b = Uuid::from_u128(2);

  s.upsert_conflict(conflict(client, a, b)).await.unwrap();
  s.remove_conflict(client, b, a).await.unwrap();
  assert!(s.list_conflicts(client).await.unwrap().is_empty());

  s.upsert_conflict(conflict(client, a, b)).await.unwrap();
  let edges = s.list_conflicts(client).await.unwrap();
  assert_eq!(edges.len(), 1);
  assert!(edges[0].is_active);
}

#[tokio::test]
async fn remove_conflict_is_idempotent() {
  let s = store().await;
  s.remove_conflict(Uuid::new_v4(), Uuid::from_u128(1), Uuid::from_u128(2))
    .await
    .unwrap();
}

#[tokio::test]
async fn conflict_self_pair_rejected() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s
    .upsert_conflict(conflict(Uuid::new_v4(), id, id))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::SelfPairing(g)) if g == id
  ));
}

#[tokio::test]
async fn preference_upsert_remove_and_list() {
  let s = store().await;
  let client = Uuid::new_v4();
  let a = Uuid::from_u128(1);
  let b = Uuid::from_u128(2);

  let edge = s.upsert_preference(preference(client, b, a)).await.unwrap();
  assert_eq!(edge.guest_a, a);
  assert_eq!(edge.strength, Strength::Preferred);

  s.remove_preference(client, a, b).await.unwrap();
  assert!(s.list_preferences(client).await.unwrap().is_empty());
}

// ─── Conflict evaluator ──────────────────────────────────────────────────────

#[tokio::test]
async fn evaluate_reports_conflicting_co_occupants() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  let bob = s.add_guest(client, "Bob".into()).await.unwrap();

  s.upsert_conflict(conflict(client, alice.guest_id, bob.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, alice.guest_id))
    .await
    .unwrap();

  let eval = s
    .evaluate_seating(plan.floor_plan_id, bob.guest_id, table.table_id)
    .await
    .unwrap();
  assert_eq!(eval.conflicts.len(), 1);
  assert_eq!(eval.conflicts[0].guest_id, alice.guest_id);
  assert_eq!(eval.conflicts[0].full_name, "Alice");
  assert!(eval.preferences.is_empty());
}

#[tokio::test]
async fn evaluate_reports_preferred_co_occupants() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  let bob = s.add_guest(client, "Bob".into()).await.unwrap();

  s.upsert_preference(preference(client, alice.guest_id, bob.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, alice.guest_id))
    .await
    .unwrap();

  let eval = s
    .evaluate_seating(plan.floor_plan_id, bob.guest_id, table.table_id)
    .await
    .unwrap();
  assert!(eval.conflicts.is_empty());
  assert_eq!(eval.preferences.len(), 1);
  assert_eq!(eval.preferences[0].guest_id, alice.guest_id);
}

#[tokio::test]
async fn evaluate_unknown_guest_is_empty() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();

  let eval = s
    .evaluate_seating(plan.floor_plan_id, Uuid::new_v4(), table.table_id)
    .await
    .unwrap();
  assert!(eval.conflicts.is_empty());
  assert!(eval.preferences.is_empty());
}

#[tokio::test]
async fn evaluate_scoped_to_candidate_table() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  let bob = s.add_guest(client, "Bob".into()).await.unwrap();

  s.upsert_conflict(conflict(client, alice.guest_id, bob.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, alice.guest_id))
    .await
    .unwrap();

  // Alice sits at t1; seating Bob at t2 raises nothing.
  let eval = s
    .evaluate_seating(plan.floor_plan_id, bob.guest_id, t2.table_id)
    .await
    .unwrap();
  assert!(eval.conflicts.is_empty());
}

#[tokio::test]
async fn evaluate_ignores_removed_edges() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  let bob = s.add_guest(client, "Bob".into()).await.unwrap();

  s.upsert_conflict(conflict(client, alice.guest_id, bob.guest_id))
    .await
    .unwrap();
  s.remove_conflict(client, alice.guest_id, bob.guest_id)
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, alice.guest_id))
    .await
    .unwrap();

  let eval = s
    .evaluate_seating(plan.floor_plan_id, bob.guest_id, table.table_id)
    .await
    .unwrap();
  assert!(eval.conflicts.is_empty());
}

// ─── Assignments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn assign_and_list() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  let mut req = seat(table.table_id, guest.guest_id);
  req.seat_number = Some(3);
  let assignment =
    s.assign_guest(plan.floor_plan_id, req).await.unwrap();
  assert_eq!(assignment.table_id, table.table_id);
  assert_eq!(assignment.seat_number, Some(3));

  let all = s.list_assignments(plan.floor_plan_id).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].guest_id, guest.guest_id);
}

#[tokio::test]
async fn assign_replaces_prior_seat() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, guest.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t2.table_id, guest.guest_id))
    .await
    .unwrap();

  // One assignment per guest: the move replaced the t1 row.
  let all = s.list_assignments(plan.floor_plan_id).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].table_id, t2.table_id);
}

#[tokio::test]
async fn assign_rejects_full_table() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 2)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let g1 = s.add_guest(client, "G1".into()).await.unwrap();
  let g2 = s.add_guest(client, "G2".into()).await.unwrap();
  let g3 = s.add_guest(client, "G3".into()).await.unwrap();

  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, g1.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, g2.guest_id))
    .await
    .unwrap();

  let err = s
    .assign_guest(plan.floor_plan_id, seat(t1.table_id, g3.guest_id))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::CapacityExceeded {
      table_id,
      capacity: 2,
      ..
    }) if table_id == t1.table_id
  ));

  // The same guest seats fine at a table with room.
  s.assign_guest(plan.floor_plan_id, seat(t2.table_id, g3.guest_id))
    .await
    .unwrap();
  assert_eq!(s.list_assignments(plan.floor_plan_id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn reseat_within_full_table_allowed() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 1)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  s.assign_guest(plan.floor_plan_id, seat(table.table_id, guest.guest_id))
    .await
    .unwrap();

  // The guest's own seat frees up when they move, so a seat change at a
  // full table is not a capacity violation.
  let mut req = seat(table.table_id, guest.guest_id);
  req.seat_number = Some(1);
  s.assign_guest(plan.floor_plan_id, req).await.unwrap();

  let all = s.list_assignments(plan.floor_plan_id).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].seat_number, Some(1));
}

#[tokio::test]
async fn assign_to_missing_table_errors() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  let err = s
    .assign_guest(plan.floor_plan_id, seat(Uuid::new_v4(), guest.guest_id))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::TableNotFound(_))
  ));
}

#[tokio::test]
async fn assign_missing_guest_errors() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();

  let err = s
    .assign_guest(plan.floor_plan_id, seat(table.table_id, Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::GuestNotFound(_))
  ));
}

#[tokio::test]
async fn conflict_does_not_block_assignment() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  let bob = s.add_guest(client, "Bob".into()).await.unwrap();

  s.upsert_conflict(conflict(client, alice.guest_id, bob.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, alice.guest_id))
    .await
    .unwrap();

  // Conflicts are advisory: the write goes through, with the override
  // recorded in the change log.
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, bob.guest_id))
    .await
    .unwrap();
  assert_eq!(s.list_assignments(plan.floor_plan_id).await.unwrap().len(), 2);

  let log = s.list_change_log(plan.floor_plan_id, 10).await.unwrap();
  assert!(
    log
      .iter()
      .any(|e| e.action == ChangeAction::ConflictOverridden)
  );
}

#[tokio::test]
async fn preference_match_is_not_an_override() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  let bob = s.add_guest(client, "Bob".into()).await.unwrap();

  s.upsert_preference(preference(client, alice.guest_id, bob.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, alice.guest_id))
    .await
    .unwrap();

  // Seating preferred guests together is the desired outcome; no
  // conflict_overridden row should be written for it.
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, bob.guest_id))
    .await
    .unwrap();

  let log = s.list_change_log(plan.floor_plan_id, 10).await.unwrap();
  assert!(
    !log
      .iter()
      .any(|e| e.action == ChangeAction::ConflictOverridden)
  );
}

#[tokio::test]
async fn force_skips_override_logging() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  let bob = s.add_guest(client, "Bob".into()).await.unwrap();

  s.upsert_conflict(conflict(client, alice.guest_id, bob.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, alice.guest_id))
    .await
    .unwrap();

  let mut req = seat(table.table_id, bob.guest_id);
  req.force = true;
  s.assign_guest(plan.floor_plan_id, req).await.unwrap();

  let log = s.list_change_log(plan.floor_plan_id, 10).await.unwrap();
  assert!(
    !log
      .iter()
      .any(|e| e.action == ChangeAction::ConflictOverridden)
  );
}

#[tokio::test]
async fn unassign_removes_and_is_idempotent() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  s.assign_guest(plan.floor_plan_id, seat(table.table_id, guest.guest_id))
    .await
    .unwrap();
  s.unassign_guest(plan.floor_plan_id, guest.guest_id)
    .await
    .unwrap();
  assert!(s.list_assignments(plan.floor_plan_id).await.unwrap().is_empty());

  // A second unassign is a no-op, not an error.
  s.unassign_guest(plan.floor_plan_id, guest.guest_id)
    .await
    .unwrap();
}

// ─── Batch assignment ────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_assign_seats_everyone() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 2)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 2)).await.unwrap();
  let g1 = s.add_guest(client, "G1".into()).await.unwrap();
  let g2 = s.add_guest(client, "G2".into()).await.unwrap();
  let g3 = s.add_guest(client, "G3".into()).await.unwrap();

  let out = s
    .batch_assign(plan.floor_plan_id, vec![
      SeatRequest { table_id: t1.table_id, guest_id: g1.guest_id, seat_number: None },
      SeatRequest { table_id: t1.table_id, guest_id: g2.guest_id, seat_number: None },
      SeatRequest { table_id: t2.table_id, guest_id: g3.guest_id, seat_number: None },
    ])
    .await
    .unwrap();
  assert_eq!(out.len(), 3);
  assert_eq!(s.list_assignments(plan.floor_plan_id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn batch_assign_is_all_or_nothing() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 1)).await.unwrap();
  let g1 = s.add_guest(client, "G1".into()).await.unwrap();
  let g2 = s.add_guest(client, "G2".into()).await.unwrap();

  let err = s
    .batch_assign(plan.floor_plan_id, vec![
      SeatRequest { table_id: t1.table_id, guest_id: g1.guest_id, seat_number: None },
      SeatRequest { table_id: t1.table_id, guest_id: g2.guest_id, seat_number: None },
    ])
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::CapacityExceeded {
      table_id,
      capacity: 1,
      ..
    }) if table_id == t1.table_id
  ));

  // Not even the fitting first row landed.
  assert!(s.list_assignments(plan.floor_plan_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn batch_swaps_guests_between_full_tables() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 1)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 1)).await.unwrap();
  let g1 = s.add_guest(client, "G1".into()).await.unwrap();
  let g2 = s.add_guest(client, "G2".into()).await.unwrap();

  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, g1.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t2.table_id, g2.guest_id))
    .await
    .unwrap();

  // Both tables are full, but validating against the final state lets the
  // swap through in either request order.
  s.batch_assign(plan.floor_plan_id, vec![
    SeatRequest { table_id: t1.table_id, guest_id: g2.guest_id, seat_number: None },
    SeatRequest { table_id: t2.table_id, guest_id: g1.guest_id, seat_number: None },
  ])
  .await
  .unwrap();

  let all = s.list_assignments(plan.floor_plan_id).await.unwrap();
  assert_eq!(all.len(), 2);
  let find = |g: Uuid| all.iter().find(|a| a.guest_id == g).unwrap().table_id;
  assert_eq!(find(g1.guest_id), t2.table_id);
  assert_eq!(find(g2.guest_id), t1.table_id);
}

#[tokio::test]
async fn batch_frees_seats_of_moved_guests() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 1)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 1)).await.unwrap();
  let g1 = s.add_guest(client, "G1".into()).await.unwrap();
  let g2 = s.add_guest(client, "G2".into()).await.unwrap();

  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, g1.guest_id))
    .await
    .unwrap();

  // g1 vacates t1 within the same batch that seats g2 there.
  s.batch_assign(plan.floor_plan_id, vec![
    SeatRequest { table_id: t2.table_id, guest_id: g1.guest_id, seat_number: None },
    SeatRequest { table_id: t1.table_id, guest_id: g2.guest_id, seat_number: None },
  ])
  .await
  .unwrap();
  assert_eq!(s.list_assignments(plan.floor_plan_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn empty_batch_rejected() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();

  let err = s.batch_assign(plan.floor_plan_id, vec![]).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::EmptyBatch)
  ));
}

#[tokio::test]
async fn duplicate_guest_in_batch_rejected() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  let err = s
    .batch_assign(plan.floor_plan_id, vec![
      SeatRequest { table_id: t1.table_id, guest_id: guest.guest_id, seat_number: None },
      SeatRequest { table_id: t2.table_id, guest_id: guest.guest_id, seat_number: None },
    ])
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::DuplicateGuestInBatch(g))
      if g == guest.guest_id
  ));
}

#[tokio::test]
async fn batch_to_missing_table_writes_nothing() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let g1 = s.add_guest(client, "G1".into()).await.unwrap();
  let g2 = s.add_guest(client, "G2".into()).await.unwrap();

  let err = s
    .batch_assign(plan.floor_plan_id, vec![
      SeatRequest { table_id: t1.table_id, guest_id: g1.guest_id, seat_number: None },
      SeatRequest { table_id: Uuid::new_v4(), guest_id: g2.guest_id, seat_number: None },
    ])
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::TableNotFound(_))
  ));
  assert!(s.list_assignments(plan.floor_plan_id).await.unwrap().is_empty());
}

// ─── Versions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_version_numbers_are_monotonic() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();

  let v1 = s
    .save_version(plan.floor_plan_id, named_version("first"))
    .await
    .unwrap();
  let v2 = s
    .save_version(plan.floor_plan_id, named_version("second"))
    .await
    .unwrap();
  let v3 = s
    .save_version(plan.floor_plan_id, named_version("third"))
    .await
    .unwrap();
  assert_eq!((v1.version_number, v2.version_number, v3.version_number), (1, 2, 3));

  // Newest first, and exactly one current.
  let versions = s.list_versions(plan.floor_plan_id).await.unwrap();
  let numbers: Vec<_> = versions.iter().map(|v| v.version_number).collect();
  assert_eq!(numbers, vec![3, 2, 1]);
  let current: Vec<_> = versions.iter().filter(|v| v.is_current).collect();
  assert_eq!(current.len(), 1);
  assert_eq!(current[0].version_id, v3.version_id);
}

#[tokio::test]
async fn save_version_snapshots_layout_and_seating() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let alice = s.add_guest(client, "Alice".into()).await.unwrap();
  s.add_guest(client, "Bob".into()).await.unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, alice.guest_id))
    .await
    .unwrap();

  let version = s
    .save_version(plan.floor_plan_id, named_version("rehearsal"))
    .await
    .unwrap();

  assert_eq!(version.table_count, 1);
  assert_eq!(version.assigned_guests, 1);
  assert_eq!(version.total_guests, 2);
  assert_eq!(version.table_positions[0].table_id, table.table_id);
  assert_eq!(version.table_positions[0].x, table.x);
  assert_eq!(version.guest_assignments[0].guest_id, alice.guest_id);
  assert_eq!(version.guest_assignments[0].table_id, table.table_id);
}

#[tokio::test]
async fn save_version_missing_plan_errors() {
  let s = store().await;
  let err = s
    .save_version(Uuid::new_v4(), named_version("v"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::FloorPlanNotFound(_))
  ));
}

#[tokio::test]
async fn restore_version_reinstates_layout_and_seating() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, guest.guest_id))
    .await
    .unwrap();

  let v1 = s
    .save_version(plan.floor_plan_id, named_version("before"))
    .await
    .unwrap();

  // Drift: guest moves, table moves, a newer version becomes current.
  s.assign_guest(plan.floor_plan_id, seat(t2.table_id, guest.guest_id))
    .await
    .unwrap();
  s.update_table(t1.table_id, TableUpdate {
    x: Some(999),
    ..Default::default()
  })
  .await
  .unwrap();
  s.save_version(plan.floor_plan_id, named_version("after"))
    .await
    .unwrap();

  let restored = s
    .restore_version(v1.version_id, plan.floor_plan_id)
    .await
    .unwrap();
  assert!(restored.is_current);

  let all = s.list_assignments(plan.floor_plan_id).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].table_id, t1.table_id);

  let tables = s.list_tables(plan.floor_plan_id).await.unwrap();
  let t1_now = tables.iter().find(|t| t.table_id == t1.table_id).unwrap();
  assert_eq!(t1_now.x, t1.x);

  let versions = s.list_versions(plan.floor_plan_id).await.unwrap();
  let current: Vec<_> = versions.iter().filter(|v| v.is_current).collect();
  assert_eq!(current.len(), 1);
  assert_eq!(current[0].version_id, v1.version_id);
}

#[tokio::test]
async fn restore_skips_tables_deleted_since_snapshot() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let g1 = s.add_guest(client, "G1".into()).await.unwrap();
  let g2 = s.add_guest(client, "G2".into()).await.unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, g1.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t2.table_id, g2.guest_id))
    .await
    .unwrap();

  let version = s
    .save_version(plan.floor_plan_id, named_version("v"))
    .await
    .unwrap();
  s.delete_table(t1.table_id).await.unwrap();

  s.restore_version(version.version_id, plan.floor_plan_id)
    .await
    .unwrap();

  // Only the placement at the surviving table comes back.
  let all = s.list_assignments(plan.floor_plan_id).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].guest_id, g2.guest_id);
  assert_eq!(all[0].table_id, t2.table_id);
}

#[tokio::test]
async fn restore_missing_version_errors() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();
  let err = s
    .restore_version(Uuid::new_v4(), plan.floor_plan_id)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::VersionNotFound(_))
  ));
}

#[tokio::test]
async fn delete_current_version_leaves_none_current() {
  let s = store().await;
  let plan = s.add_floor_plan(new_plan(Uuid::new_v4())).await.unwrap();
  s.save_version(plan.floor_plan_id, named_version("v1"))
    .await
    .unwrap();
  let v2 = s
    .save_version(plan.floor_plan_id, named_version("v2"))
    .await
    .unwrap();

  s.delete_version(v2.version_id).await.unwrap();

  let versions = s.list_versions(plan.floor_plan_id).await.unwrap();
  assert_eq!(versions.len(), 1);
  assert!(versions.iter().all(|v| !v.is_current));
}

#[tokio::test]
async fn delete_missing_version_errors() {
  let s = store().await;
  let err = s.delete_version(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Domain(seatwise_core::Error::VersionNotFound(_))
  ));
}

// ─── Change log ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn change_log_records_assignment_lifecycle() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let t1 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let t2 = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  s.assign_guest(plan.floor_plan_id, seat(t1.table_id, guest.guest_id))
    .await
    .unwrap();
  s.assign_guest(plan.floor_plan_id, seat(t2.table_id, guest.guest_id))
    .await
    .unwrap();
  s.unassign_guest(plan.floor_plan_id, guest.guest_id)
    .await
    .unwrap();

  // Newest first.
  let log = s.list_change_log(plan.floor_plan_id, 10).await.unwrap();
  let actions: Vec<_> = log.iter().map(|e| e.action).collect();
  assert_eq!(actions, vec![
    ChangeAction::GuestUnassigned,
    ChangeAction::GuestAssigned,
    ChangeAction::GuestAssigned,
  ]);

  // The move carries both sides of the transition.
  let moved = &log[1];
  assert_eq!(moved.guest_id, Some(guest.guest_id));
  assert_eq!(
    moved.previous_state.as_ref().map(|st| st.table_id),
    Some(t1.table_id)
  );
  assert_eq!(
    moved.new_state.as_ref().map(|st| st.table_id),
    Some(t2.table_id)
  );

  // The unassign records where the guest had been sitting.
  let removed = &log[0];
  assert_eq!(
    removed.previous_state.as_ref().map(|st| st.table_id),
    Some(t2.table_id)
  );
  assert!(removed.new_state.is_none());
}

#[tokio::test]
async fn change_log_records_batch_and_version_actions() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();

  s.batch_assign(plan.floor_plan_id, vec![SeatRequest {
    table_id:    table.table_id,
    guest_id:    guest.guest_id,
    seat_number: None,
  }])
  .await
  .unwrap();
  let version = s
    .save_version(plan.floor_plan_id, named_version("v1"))
    .await
    .unwrap();
  s.restore_version(version.version_id, plan.floor_plan_id)
    .await
    .unwrap();

  let log = s.list_change_log(plan.floor_plan_id, 10).await.unwrap();
  let actions: Vec<_> = log.iter().map(|e| e.action).collect();
  assert_eq!(actions, vec![
    ChangeAction::VersionRestored,
    ChangeAction::VersionSaved,
    ChangeAction::BatchAssigned,
  ]);
}

#[tokio::test]
async fn change_log_respects_limit() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 8)).await.unwrap();

  for i in 0..5 {
    let guest = s.add_guest(client, format!("G{i}")).await.unwrap();
    s.assign_guest(plan.floor_plan_id, seat(table.table_id, guest.guest_id))
      .await
      .unwrap();
  }

  let log = s.list_change_log(plan.floor_plan_id, 3).await.unwrap();
  assert_eq!(log.len(), 3);
}

#[tokio::test]
async fn change_log_limit_clamps_out_of_range_values() {
  let s = store().await;
  let client = Uuid::new_v4();
  let plan = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(plan.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();
  s.assign_guest(plan.floor_plan_id, seat(table.table_id, guest.guest_id))
    .await
    .unwrap();
  s.unassign_guest(plan.floor_plan_id, guest.guest_id)
    .await
    .unwrap();

  // A limit beyond i64 range must clamp, not wrap to a negative LIMIT.
  let log = s
    .list_change_log(plan.floor_plan_id, usize::MAX)
    .await
    .unwrap();
  assert_eq!(log.len(), 2);

  let log = s.list_change_log(plan.floor_plan_id, 0).await.unwrap();
  assert!(log.is_empty());
}

#[tokio::test]
async fn change_log_scoped_to_floor_plan() {
  let s = store().await;
  let client = Uuid::new_v4();
  let p1 = s.add_floor_plan(new_plan(client)).await.unwrap();
  let p2 = s.add_floor_plan(new_plan(client)).await.unwrap();
  let table = s.add_table(new_table(p1.floor_plan_id, 4)).await.unwrap();
  let guest = s.add_guest(client, "Alice".into()).await.unwrap();
  s.assign_guest(p1.floor_plan_id, seat(table.table_id, guest.guest_id))
    .await
    .unwrap();

  assert_eq!(s.list_change_log(p1.floor_plan_id, 10).await.unwrap().len(), 1);
  assert!(s.list_change_log(p2.floor_plan_id, 10).await.unwrap().is_empty());
}
