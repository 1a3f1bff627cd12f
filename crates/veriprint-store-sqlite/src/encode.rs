//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Finger positions are stored
//! as their snake_case discriminant. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use veriprint_core::{
  subject::SubjectRecord,
  template::{FingerPosition, Template},
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── FingerPosition
// ───────────────────────────────────────────────────────────

pub fn encode_finger_position(p: FingerPosition) -> &'static str { p.as_str() }

pub fn decode_finger_position(s: &str) -> Result<FingerPosition> {
  FingerPosition::ALL
    .into_iter()
    .find(|p| p.as_str() == s)
    .ok_or_else(|| Error::UnknownFingerPosition(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `templates` row.
pub struct RawTemplate {
  pub template_id:     String,
  pub subject_id:      String,
  pub finger_position: String,
  pub payload:         String,
  pub quality_score:   i64,
  pub is_active:       bool,
  pub created_at:      String,
}

impl RawTemplate {
  pub fn into_template(self) -> Result<Template> {
    Ok(Template {
      template_id:     decode_uuid(&self.template_id)?,
      subject_id:      decode_uuid(&self.subject_id)?,
      finger_position: decode_finger_position(&self.finger_position)?,
      payload:         self.payload,
      quality_score:   self.quality_score.clamp(0, 100) as u8,
      is_active:       self.is_active,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `subjects` row.
pub struct RawSubject {
  pub subject_id:   String,
  pub external_id:  String,
  pub display_name: String,
  pub created_at:   String,
}

impl RawSubject {
  pub fn into_subject(self) -> Result<SubjectRecord> {
    Ok(SubjectRecord {
      subject_id:   decode_uuid(&self.subject_id)?,
      external_id:  self.external_id,
      display_name: self.display_name,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
