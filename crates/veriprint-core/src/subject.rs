//! Subject — the external identity a template authenticates.
//!
//! Subjects are owned by the surrounding membership system; this core only
//! resolves them by id and never mutates them. The record carries just the
//! public fields identification is allowed to return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A read-only view of an enrolled identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
  pub subject_id:   Uuid,
  /// Externally issued identifier, e.g. a senior-citizen card number.
  pub external_id:  String,
  pub display_name: String,
  pub created_at:   DateTime<Utc>,
}
