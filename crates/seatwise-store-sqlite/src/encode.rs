//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields (table
//! style, version snapshots, seat states) are stored as compact JSON. UUIDs
//! are stored as hyphenated lowercase strings. Enums are stored as their
//! serde discriminant strings.

use chrono::{DateTime, Utc};
use seatwise_core::{
  assignment::Assignment,
  changelog::{ChangeAction, ChangeLogEntry, SeatState},
  graph::{
    ConflictEdge, ConflictType, PreferenceEdge, PreferenceType, Severity,
    Strength,
  },
  guest::Guest,
  plan::FloorPlan,
  table::{Table, TableShape, TableStyle},
  version::{AssignmentSnapshot, TableSnapshot, Version},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── TableShape ──────────────────────────────────────────────────────────────

pub fn encode_shape(s: TableShape) -> &'static str {
  match s {
    TableShape::Round => "round",
    TableShape::Rectangle => "rectangle",
    TableShape::Square => "square",
  }
}

pub fn decode_shape(s: &str) -> Result<TableShape> {
  match s {
    "round" => Ok(TableShape::Round),
    "rectangle" => Ok(TableShape::Rectangle),
    "square" => Ok(TableShape::Square),
    other => Err(Error::Decode(format!("unknown table shape: {other:?}"))),
  }
}

// ─── Conflict enums ──────────────────────────────────────────────────────────

pub fn encode_conflict_type(c: ConflictType) -> &'static str {
  match c {
    ConflictType::General => "general",
    ConflictType::FamilyDrama => "family_drama",
    ConflictType::ExPartner => "ex_partner",
    ConflictType::BusinessDispute => "business_dispute",
    ConflictType::Personal => "personal",
  }
}

pub fn decode_conflict_type(s: &str) -> Result<ConflictType> {
  match s {
    "general" => Ok(ConflictType::General),
    "family_drama" => Ok(ConflictType::FamilyDrama),
    "ex_partner" => Ok(ConflictType::ExPartner),
    "business_dispute" => Ok(ConflictType::BusinessDispute),
    "personal" => Ok(ConflictType::Personal),
    other => Err(Error::Decode(format!("unknown conflict type: {other:?}"))),
  }
}

pub fn encode_severity(s: Severity) -> &'static str {
  match s {
    Severity::Low => "low",
    Severity::Moderate => "moderate",
    Severity::High => "high",
    Severity::Critical => "critical",
  }
}

pub fn decode_severity(s: &str) -> Result<Severity> {
  match s {
    "low" => Ok(Severity::Low),
    "moderate" => Ok(Severity::Moderate),
    "high" => Ok(Severity::High),
    "critical" => Ok(Severity::Critical),
    other => Err(Error::Decode(format!("unknown severity: {other:?}"))),
  }
}

// ─── Preference enums ────────────────────────────────────────────────────────

pub fn encode_preference_type(p: PreferenceType) -> &'static str {
  match p {
    PreferenceType::Together => "together",
    PreferenceType::Nearby => "nearby",
    PreferenceType::SameArea => "same_area",
  }
}

pub fn decode_preference_type(s: &str) -> Result<PreferenceType> {
  match s {
    "together" => Ok(PreferenceType::Together),
    "nearby" => Ok(PreferenceType::Nearby),
    "same_area" => Ok(PreferenceType::SameArea),
    other => Err(Error::Decode(format!("unknown preference type: {other:?}"))),
  }
}

pub fn encode_strength(s: Strength) -> &'static str {
  match s {
    Strength::Required => "required",
    Strength::Preferred => "preferred",
    Strength::NiceToHave => "nice_to_have",
  }
}

pub fn decode_strength(s: &str) -> Result<Strength> {
  match s {
    "required" => Ok(Strength::Required),
    "preferred" => Ok(Strength::Preferred),
    "nice_to_have" => Ok(Strength::NiceToHave),
    other => Err(Error::Decode(format!("unknown strength: {other:?}"))),
  }
}

// ─── ChangeAction ────────────────────────────────────────────────────────────

pub fn encode_action(a: ChangeAction) -> &'static str {
  match a {
    ChangeAction::GuestAssigned => "guest_assigned",
    ChangeAction::GuestUnassigned => "guest_unassigned",
    ChangeAction::BatchAssigned => "batch_assigned",
    ChangeAction::ConflictOverridden => "conflict_overridden",
    ChangeAction::VersionSaved => "version_saved",
    ChangeAction::VersionRestored => "version_restored",
  }
}

pub fn decode_action(s: &str) -> Result<ChangeAction> {
  match s {
    "guest_assigned" => Ok(ChangeAction::GuestAssigned),
    "guest_unassigned" => Ok(ChangeAction::GuestUnassigned),
    "batch_assigned" => Ok(ChangeAction::BatchAssigned),
    "conflict_overridden" => Ok(ChangeAction::ConflictOverridden),
    "version_saved" => Ok(ChangeAction::VersionSaved),
    "version_restored" => Ok(ChangeAction::VersionRestored),
    other => Err(Error::Decode(format!("unknown change action: {other:?}"))),
  }
}

// ─── JSON payloads ───────────────────────────────────────────────────────────

pub fn encode_style(style: &TableStyle) -> Result<String> {
  Ok(serde_json::to_string(style)?)
}

pub fn decode_style(s: &str) -> Result<TableStyle> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_table_snapshots(snaps: &[TableSnapshot]) -> Result<String> {
  Ok(serde_json::to_string(snaps)?)
}

pub fn decode_table_snapshots(s: &str) -> Result<Vec<TableSnapshot>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_assignment_snapshots(
  snaps: &[AssignmentSnapshot],
) -> Result<String> {
  Ok(serde_json::to_string(snaps)?)
}

pub fn decode_assignment_snapshots(s: &str) -> Result<Vec<AssignmentSnapshot>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_seat_state(state: &SeatState) -> Result<String> {
  Ok(serde_json::to_string(state)?)
}

pub fn decode_seat_state(s: &str) -> Result<SeatState> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `floor_plans` row.
pub struct RawFloorPlan {
  pub floor_plan_id:    String,
  pub client_id:        String,
  pub name:             String,
  pub canvas_width:     i64,
  pub canvas_height:    i64,
  pub background_image: Option<String>,
  pub zoom:             f64,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawFloorPlan {
  pub fn into_plan(self) -> Result<FloorPlan> {
    Ok(FloorPlan {
      floor_plan_id:    decode_uuid(&self.floor_plan_id)?,
      client_id:        decode_uuid(&self.client_id)?,
      name:             self.name,
      canvas_width:     self.canvas_width,
      canvas_height:    self.canvas_height,
      background_image: self.background_image,
      zoom:             self.zoom,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `guests` row.
pub struct RawGuest {
  pub guest_id:   String,
  pub client_id:  String,
  pub full_name:  String,
  pub created_at: String,
}

impl RawGuest {
  pub fn into_guest(self) -> Result<Guest> {
    Ok(Guest {
      guest_id:   decode_uuid(&self.guest_id)?,
      client_id:  decode_uuid(&self.client_id)?,
      full_name:  self.full_name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `tables` row.
pub struct RawTable {
  pub table_id:      String,
  pub floor_plan_id: String,
  pub label:         Option<String>,
  pub shape:         String,
  pub x:             i64,
  pub y:             i64,
  pub width:         i64,
  pub height:        i64,
  pub rotation:      i64,
  pub capacity:      i64,
  pub min_capacity:  Option<i64>,
  pub style:         String,
  pub created_at:    String,
}

impl RawTable {
  pub fn into_table(self) -> Result<Table> {
    Ok(Table {
      table_id:      decode_uuid(&self.table_id)?,
      floor_plan_id: decode_uuid(&self.floor_plan_id)?,
      label:         self.label,
      shape:         decode_shape(&self.shape)?,
      x:             self.x,
      y:             self.y,
      width:         self.width,
      height:        self.height,
      rotation:      self.rotation,
      capacity:      self.capacity,
      min_capacity:  self.min_capacity,
      style:         decode_style(&self.style)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `assignments` row.
pub struct RawAssignment {
  pub assignment_id: String,
  pub floor_plan_id: String,
  pub table_id:      String,
  pub guest_id:      String,
  pub seat_number:   Option<i64>,
  pub assigned_at:   String,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      assignment_id: decode_uuid(&self.assignment_id)?,
      floor_plan_id: decode_uuid(&self.floor_plan_id)?,
      table_id:      decode_uuid(&self.table_id)?,
      guest_id:      decode_uuid(&self.guest_id)?,
      seat_number:   self.seat_number,
      assigned_at:   decode_dt(&self.assigned_at)?,
    })
  }
}

/// Raw strings read directly from a `conflict_edges` row.
pub struct RawConflictEdge {
  pub edge_id:       String,
  pub client_id:     String,
  pub guest_a:       String,
  pub guest_b:       String,
  pub conflict_type: String,
  pub severity:      String,
  pub reason:        Option<String>,
  pub is_active:     bool,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawConflictEdge {
  pub fn into_edge(self) -> Result<ConflictEdge> {
    Ok(ConflictEdge {
      edge_id:       decode_uuid(&self.edge_id)?,
      client_id:     decode_uuid(&self.client_id)?,
      guest_a:       decode_uuid(&self.guest_a)?,
      guest_b:       decode_uuid(&self.guest_b)?,
      conflict_type: decode_conflict_type(&self.conflict_type)?,
      severity:      decode_severity(&self.severity)?,
      reason:        self.reason,
      is_active:     self.is_active,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `preference_edges` row.
pub struct RawPreferenceEdge {
  pub edge_id:         String,
  pub client_id:       String,
  pub guest_a:         String,
  pub guest_b:         String,
  pub preference_type: String,
  pub strength:        String,
  pub reason:          Option<String>,
  pub is_active:       bool,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawPreferenceEdge {
  pub fn into_edge(self) -> Result<PreferenceEdge> {
    Ok(PreferenceEdge {
      edge_id:         decode_uuid(&self.edge_id)?,
      client_id:       decode_uuid(&self.client_id)?,
      guest_a:         decode_uuid(&self.guest_a)?,
      guest_b:         decode_uuid(&self.guest_b)?,
      preference_type: decode_preference_type(&self.preference_type)?,
      strength:        decode_strength(&self.strength)?,
      reason:          self.reason,
      is_active:       self.is_active,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `versions` row.
pub struct RawVersion {
  pub version_id:        String,
  pub floor_plan_id:     String,
  pub version_number:    i64,
  pub name:              String,
  pub description:       Option<String>,
  pub table_positions:   String,
  pub guest_assignments: String,
  pub table_count:       i64,
  pub assigned_guests:   i64,
  pub total_guests:      i64,
  pub is_current:        bool,
  pub is_auto_save:      bool,
  pub created_by:        Option<String>,
  pub created_at:        String,
}

impl RawVersion {
  pub fn into_version(self) -> Result<Version> {
    Ok(Version {
      version_id:        decode_uuid(&self.version_id)?,
      floor_plan_id:     decode_uuid(&self.floor_plan_id)?,
      version_number:    self.version_number,
      name:              self.name,
      description:       self.description,
      table_positions:   decode_table_snapshots(&self.table_positions)?,
      guest_assignments: decode_assignment_snapshots(&self.guest_assignments)?,
      table_count:       self.table_count,
      assigned_guests:   self.assigned_guests,
      total_guests:      self.total_guests,
      is_current:        self.is_current,
      is_auto_save:      self.is_auto_save,
      created_by:        self.created_by,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `change_log` row.
pub struct RawChangeLogEntry {
  pub entry_id:       String,
  pub floor_plan_id:  String,
  pub action:         String,
  pub guest_id:       Option<String>,
  pub table_id:       Option<String>,
  pub previous_state: Option<String>,
  pub new_state:      Option<String>,
  pub actor:          Option<String>,
  pub created_at:     String,
}

impl RawChangeLogEntry {
  pub fn into_entry(self) -> Result<ChangeLogEntry> {
    Ok(ChangeLogEntry {
      entry_id:       decode_uuid(&self.entry_id)?,
      floor_plan_id:  decode_uuid(&self.floor_plan_id)?,
      action:         decode_action(&self.action)?,
      guest_id:       self.guest_id.as_deref().map(decode_uuid).transpose()?,
      table_id:       self.table_id.as_deref().map(decode_uuid).transpose()?,
      previous_state: self
        .previous_state
        .as_deref()
        .map(decode_seat_state)
        .transpose()?,
      new_state:      self
        .new_state
        .as_deref()
        .map(decode_seat_state)
        .transpose()?,
      actor:          self.actor,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}
