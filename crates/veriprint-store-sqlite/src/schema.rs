//! SQL schema for the Veriprint SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS subjects (
    subject_id   TEXT PRIMARY KEY,
    external_id  TEXT NOT NULL UNIQUE,   -- externally issued card number
    display_name TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

-- Templates are append-mostly.
-- The only UPDATE ever issued flips is_active from 1 to 0; no DELETE.
CREATE TABLE IF NOT EXISTS templates (
    template_id     TEXT NOT NULL PRIMARY KEY,
    subject_id      TEXT NOT NULL REFERENCES subjects(subject_id),
    finger_position TEXT NOT NULL,   -- e.g. 'left_thumb' .. 'right_little'
    payload         TEXT NOT NULL,   -- cleaned base64 text, opaque
    quality_score   INTEGER NOT NULL,
    is_active       INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- At most one active template per (subject, finger).
CREATE UNIQUE INDEX IF NOT EXISTS templates_one_active_idx
    ON templates(subject_id, finger_position) WHERE is_active = 1;

CREATE INDEX IF NOT EXISTS templates_subject_idx ON templates(subject_id);
CREATE INDEX IF NOT EXISTS templates_active_idx  ON templates(is_active);

PRAGMA user_version = 1;
";
