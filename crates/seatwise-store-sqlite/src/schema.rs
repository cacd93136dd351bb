//! SQL schema for the Seatwise SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS floor_plans (
    floor_plan_id    TEXT PRIMARY KEY,
    client_id        TEXT NOT NULL,
    name             TEXT NOT NULL,
    canvas_width     INTEGER NOT NULL,
    canvas_height    INTEGER NOT NULL,
    background_image TEXT,
    zoom             REAL NOT NULL DEFAULT 1.0,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS guests (
    guest_id   TEXT PRIMARY KEY,
    client_id  TEXT NOT NULL,
    full_name  TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tables (
    table_id      TEXT PRIMARY KEY,
    floor_plan_id TEXT NOT NULL REFERENCES floor_plans(floor_plan_id)
                  ON DELETE CASCADE,
    label         TEXT,
    shape         TEXT NOT NULL,    -- 'round' | 'rectangle' | 'square'
    x             INTEGER NOT NULL,
    y             INTEGER NOT NULL,
    width         INTEGER NOT NULL,
    height        INTEGER NOT NULL,
    rotation      INTEGER NOT NULL DEFAULT 0,
    capacity      INTEGER NOT NULL CHECK (capacity >= 1),
    min_capacity  INTEGER,
    style         TEXT NOT NULL DEFAULT '{}',   -- JSON TableStyle
    created_at    TEXT NOT NULL
);

-- One active assignment per (floor plan, guest); occupancy vs. capacity is
-- counted in the write transaction, not delegated to a constraint, so the
-- caller gets an error naming the table.
CREATE TABLE IF NOT EXISTS assignments (
    assignment_id TEXT PRIMARY KEY,
    floor_plan_id TEXT NOT NULL REFERENCES floor_plans(floor_plan_id)
                  ON DELETE CASCADE,
    table_id      TEXT NOT NULL REFERENCES tables(table_id)
                  ON DELETE CASCADE,
    guest_id      TEXT NOT NULL REFERENCES guests(guest_id),
    seat_number   INTEGER,
    assigned_at   TEXT NOT NULL,
    UNIQUE (floor_plan_id, guest_id)
);

-- Relationship edges are soft-deleted (is_active = 0), never erased.
CREATE TABLE IF NOT EXISTS conflict_edges (
    edge_id       TEXT PRIMARY KEY,
    client_id     TEXT NOT NULL,
    guest_a       TEXT NOT NULL,
    guest_b       TEXT NOT NULL,
    conflict_type TEXT NOT NULL,
    severity      TEXT NOT NULL,
    reason        TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    UNIQUE (client_id, guest_a, guest_b),
    CHECK  (guest_a < guest_b)
);

CREATE TABLE IF NOT EXISTS preference_edges (
    edge_id         TEXT PRIMARY KEY,
    client_id       TEXT NOT NULL,
    guest_a         TEXT NOT NULL,
    guest_b         TEXT NOT NULL,
    preference_type TEXT NOT NULL,
    strength        TEXT NOT NULL,
    reason          TEXT,
    is_active       INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    UNIQUE (client_id, guest_a, guest_b),
    CHECK  (guest_a < guest_b)
);

-- Immutable once written, apart from the is_current flag and deletion.
CREATE TABLE IF NOT EXISTS versions (
    version_id        TEXT PRIMARY KEY,
    floor_plan_id     TEXT NOT NULL REFERENCES floor_plans(floor_plan_id)
                      ON DELETE CASCADE,
    version_number    INTEGER NOT NULL,
    name              TEXT NOT NULL,
    description       TEXT,
    table_positions   TEXT NOT NULL,   -- JSON [TableSnapshot]
    guest_assignments TEXT NOT NULL,   -- JSON [AssignmentSnapshot]
    table_count       INTEGER NOT NULL,
    assigned_guests   INTEGER NOT NULL,
    total_guests      INTEGER NOT NULL,
    is_current        INTEGER NOT NULL DEFAULT 0,
    is_auto_save      INTEGER NOT NULL DEFAULT 0,
    created_by        TEXT,
    created_at        TEXT NOT NULL,
    UNIQUE (floor_plan_id, version_number)
);

-- Append-only. No UPDATE or DELETE is ever issued against this table by
-- normal operation.
CREATE TABLE IF NOT EXISTS change_log (
    entry_id       TEXT PRIMARY KEY,
    floor_plan_id  TEXT NOT NULL REFERENCES floor_plans(floor_plan_id)
                   ON DELETE CASCADE,
    action         TEXT NOT NULL,
    guest_id       TEXT,
    table_id       TEXT,
    previous_state TEXT,              -- JSON SeatState
    new_state      TEXT,              -- JSON SeatState
    actor          TEXT,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS tables_plan_idx       ON tables(floor_plan_id);
CREATE INDEX IF NOT EXISTS assignments_plan_idx  ON assignments(floor_plan_id);
CREATE INDEX IF NOT EXISTS assignments_table_idx ON assignments(table_id);
CREATE INDEX IF NOT EXISTS conflict_client_idx   ON conflict_edges(client_id);
CREATE INDEX IF NOT EXISTS preference_client_idx ON preference_edges(client_id);
CREATE INDEX IF NOT EXISTS versions_plan_idx     ON versions(floor_plan_id);
CREATE INDEX IF NOT EXISTS change_log_plan_idx   ON change_log(floor_plan_id);

PRAGMA user_version = 1;
";
