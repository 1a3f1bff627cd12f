//! Template types — the fundamental unit of the Veriprint store.
//!
//! A template is an immutable record of one enrolled fingerprint capture.
//! Re-enrollment never updates a row in place: it inserts a new active row
//! and flips the previous one's `is_active` to false (soft retirement).
//! Templates are never physically deleted by this core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Finger position ─────────────────────────────────────────────────────────

/// Which of the ten fingers a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerPosition {
  LeftThumb,
  LeftIndex,
  LeftMiddle,
  LeftRing,
  LeftLittle,
  RightThumb,
  RightIndex,
  RightMiddle,
  RightRing,
  RightLittle,
}

impl FingerPosition {
  /// All ten slots, left hand first.
  pub const ALL: [FingerPosition; 10] = [
    Self::LeftThumb,
    Self::LeftIndex,
    Self::LeftMiddle,
    Self::LeftRing,
    Self::LeftLittle,
    Self::RightThumb,
    Self::RightIndex,
    Self::RightMiddle,
    Self::RightRing,
    Self::RightLittle,
  ];

  /// The discriminant string stored in the `finger_position` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::LeftThumb => "left_thumb",
      Self::LeftIndex => "left_index",
      Self::LeftMiddle => "left_middle",
      Self::LeftRing => "left_ring",
      Self::LeftLittle => "left_little",
      Self::RightThumb => "right_thumb",
      Self::RightIndex => "right_index",
      Self::RightMiddle => "right_middle",
      Self::RightRing => "right_ring",
      Self::RightLittle => "right_little",
    }
  }
}

// ─── Template ────────────────────────────────────────────────────────────────

/// One enrolled biometric sample. Once written, the only field that ever
/// changes is `is_active`, and only from true to false.
///
/// Invariant: at most one template per `(subject_id, finger_position)` pair
/// has `is_active == true` at any time. Backends enforce this at the
/// database level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
  pub template_id:     Uuid,
  pub subject_id:      Uuid,
  pub finger_position: FingerPosition,
  /// Opaque base64 text; never interpreted beyond the codec's validation.
  pub payload:         String,
  /// Capture quality, 0–100, assigned at acquisition time.
  pub quality_score:   u8,
  pub is_active:       bool,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:      DateTime<Utc>,
}

// ─── NewTemplate ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::TemplateStore::enroll_active`]. The payload must
/// already be cleaned by [`crate::codec::clean_template`]; `template_id` and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTemplate {
  pub subject_id:      Uuid,
  pub finger_position: FingerPosition,
  pub payload:         String,
  pub quality_score:   u8,
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// Result of an atomic deactivate-then-insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
  /// The freshly inserted, active template.
  pub template:   Template,
  /// How many previously active rows were retired (0 or 1 under the
  /// one-active invariant).
  pub superseded: usize,
}
