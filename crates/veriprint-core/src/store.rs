//! The `TemplateStore` and `SubjectDirectory` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `veriprint-store-sqlite`). The enrollment and identification services in
//! `veriprint-engine` depend on these abstractions, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  subject::SubjectRecord,
  template::{Enrollment, FingerPosition, NewTemplate, Template},
};

// ─── Template store ──────────────────────────────────────────────────────────

/// Abstraction over a template storage backend.
///
/// Templates are append-mostly: rows are inserted by [`enroll_active`] and
/// the only mutation ever issued is flipping `is_active` from true to false.
/// Backends must uphold the one-active-row-per-`(subject, finger)` invariant,
/// including under concurrent enrollment calls for the same pair.
///
/// All methods return `Send` futures so the traits can be used in
/// multi-threaded async runtimes (tokio with `axum`).
///
/// [`enroll_active`]: TemplateStore::enroll_active
pub trait TemplateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Atomically retire any active template for the input's
  /// `(subject_id, finger_position)` and insert the new row as active.
  ///
  /// The deactivate-then-insert pair must be serialized at the database
  /// level: two concurrent calls for the same pair must never both leave a
  /// template active.
  fn enroll_active(
    &self,
    input: NewTemplate,
  ) -> impl Future<Output = Result<Enrollment, Self::Error>> + Send + '_;

  /// Retire the active template for `(subject_id, finger_position)`, if
  /// any. Returns the number of rows that transitioned (0 or 1).
  fn deactivate_active(
    &self,
    subject_id: Uuid,
    finger_position: FingerPosition,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// All active templates across the whole population, in stable scan
  /// order. Identification does a full 1:N pass over this set.
  fn list_active(
    &self,
  ) -> impl Future<Output = Result<Vec<Template>, Self::Error>> + Send + '_;

  /// Active templates belonging to one subject (1:1 verification path).
  fn list_active_for_subject(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Template>, Self::Error>> + Send + '_;

  /// Fetch a single template by id, active or retired.
  fn get_template(
    &self,
    template_id: Uuid,
  ) -> impl Future<Output = Result<Option<Template>, Self::Error>> + Send + '_;
}

// ─── Subject directory ───────────────────────────────────────────────────────

/// Read-only lookup into the membership system's subjects.
///
/// This core never creates or mutates subjects; it only resolves references.
pub trait SubjectDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolve a subject by primary id. Returns `None` if not found.
  fn resolve_subject(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Option<SubjectRecord>, Self::Error>> + Send + '_;

  /// Resolve a subject by externally issued id (e.g. a card number).
  fn resolve_subject_by_external_id<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<SubjectRecord>, Self::Error>> + Send + 'a;
}

// ─── Subject admin ───────────────────────────────────────────────────────────

/// Administrative subject creation — provisioning and test seeding only.
/// The enrollment and identification services never call this.
pub trait SubjectAdmin: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn add_subject(
    &self,
    external_id: String,
    display_name: String,
  ) -> impl Future<Output = Result<SubjectRecord, Self::Error>> + Send + '_;
}
