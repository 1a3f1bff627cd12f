//! Integration tests for `SqliteStore` against an in-memory database.

use uuid::Uuid;
use veriprint_core::{
  store::{SubjectAdmin, SubjectDirectory, TemplateStore},
  subject::SubjectRecord,
  template::{FingerPosition, NewTemplate},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seed_subject(s: &SqliteStore) -> SubjectRecord {
  s.add_subject("OSCA-0001".to_owned(), "Elena Reyes".to_owned())
    .await
    .unwrap()
}

fn new_template(
  subject: &SubjectRecord,
  position: FingerPosition,
  payload: &str,
  quality: u8,
) -> NewTemplate {
  NewTemplate {
    subject_id: subject.subject_id,
    finger_position: position,
    payload: payload.to_owned(),
    quality_score: quality,
  }
}

// ─── Subjects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_resolve_subject() {
  let s = store().await;

  let subject = seed_subject(&s).await;
  assert_eq!(subject.external_id, "OSCA-0001");

  let fetched = s.resolve_subject(subject.subject_id).await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.subject_id, subject.subject_id);
  assert_eq!(fetched.display_name, "Elena Reyes");
}

#[tokio::test]
async fn resolve_subject_missing_returns_none() {
  let s = store().await;
  let result = s.resolve_subject(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn resolve_subject_by_external_id() {
  let s = store().await;
  let subject = seed_subject(&s).await;

  let found = s
    .resolve_subject_by_external_id("OSCA-0001")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.subject_id, subject.subject_id);

  let missing = s
    .resolve_subject_by_external_id("OSCA-9999")
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn duplicate_external_id_is_rejected() {
  let s = store().await;
  seed_subject(&s).await;

  let result = s
    .add_subject("OSCA-0001".to_owned(), "Someone Else".to_owned())
    .await;
  assert!(matches!(result, Err(Error::DuplicateExternalId(_))));
}

// ─── Enrollment writes ───────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_creates_single_active_row() {
  let s = store().await;
  let subject = seed_subject(&s).await;

  let enrollment = s
    .enroll_active(new_template(&subject, FingerPosition::RightThumb, "abc123==", 80))
    .await
    .unwrap();

  assert!(enrollment.template.is_active);
  assert_eq!(enrollment.superseded, 0);

  let active = s.list_active_for_subject(subject.subject_id).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].template_id, enrollment.template.template_id);
  assert_eq!(active[0].payload, "abc123==");
  assert_eq!(active[0].quality_score, 80);
}

#[tokio::test]
async fn re_enrollment_retires_prior_row() {
  let s = store().await;
  let subject = seed_subject(&s).await;

  let first = s
    .enroll_active(new_template(&subject, FingerPosition::RightThumb, "abc123==", 80))
    .await
    .unwrap();

  let second = s
    .enroll_active(new_template(&subject, FingerPosition::RightThumb, "def456==", 85))
    .await
    .unwrap();
  assert_eq!(second.superseded, 1);

  // The prior row still exists but is retired.
  let old = s
    .get_template(first.template.template_id)
    .await
    .unwrap()
    .unwrap();
  assert!(!old.is_active);

  // Exactly one active row remains, and it is the new one.
  let active = s.list_active_for_subject(subject.subject_id).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].template_id, second.template.template_id);
}

#[tokio::test]
async fn enrollment_per_finger_is_independent() {
  let s = store().await;
  let subject = seed_subject(&s).await;

  s.enroll_active(new_template(&subject, FingerPosition::RightThumb, "aaaa", 70))
    .await
    .unwrap();
  s.enroll_active(new_template(&subject, FingerPosition::LeftIndex, "bbbb", 75))
    .await
    .unwrap();

  let active = s.list_active_for_subject(subject.subject_id).await.unwrap();
  assert_eq!(active.len(), 2);
}

#[tokio::test]
async fn concurrent_enrollments_leave_one_active() {
  let s = store().await;
  let subject = seed_subject(&s).await;

  let a = s.enroll_active(new_template(
    &subject,
    FingerPosition::RightThumb,
    "aaaa1111",
    80,
  ));
  let b = s.enroll_active(new_template(
    &subject,
    FingerPosition::RightThumb,
    "bbbb2222",
    81,
  ));

  let (ra, rb) = tokio::join!(a, b);
  ra.unwrap();
  rb.unwrap();

  let active = s.list_active_for_subject(subject.subject_id).await.unwrap();
  assert_eq!(active.len(), 1, "one-active invariant violated");
}

#[tokio::test]
async fn deactivate_active_reports_count() {
  let s = store().await;
  let subject = seed_subject(&s).await;

  s.enroll_active(new_template(&subject, FingerPosition::LeftRing, "cccc", 60))
    .await
    .unwrap();

  let first = s
    .deactivate_active(subject.subject_id, FingerPosition::LeftRing)
    .await
    .unwrap();
  assert_eq!(first, 1);

  let again = s
    .deactivate_active(subject.subject_id, FingerPosition::LeftRing)
    .await
    .unwrap();
  assert_eq!(again, 0);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_active_spans_subjects_and_skips_retired() {
  let s = store().await;
  let alice = seed_subject(&s).await;
  let bob = s
    .add_subject("OSCA-0002".to_owned(), "Bob Santos".to_owned())
    .await
    .unwrap();

  s.enroll_active(new_template(&alice, FingerPosition::RightThumb, "aaaa", 70))
    .await
    .unwrap();
  // Re-enroll Alice's thumb so the first row is retired.
  s.enroll_active(new_template(&alice, FingerPosition::RightThumb, "AAAA", 72))
    .await
    .unwrap();
  s.enroll_active(new_template(&bob, FingerPosition::LeftThumb, "bbbb", 74))
    .await
    .unwrap();

  let active = s.list_active().await.unwrap();
  assert_eq!(active.len(), 2);
  assert!(active.iter().all(|t| t.is_active));
}

#[tokio::test]
async fn list_active_empty_population() {
  let s = store().await;
  let active = s.list_active().await.unwrap();
  assert!(active.is_empty());
}

#[tokio::test]
async fn get_template_missing_returns_none() {
  let s = store().await;
  let result = s.get_template(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn template_row_round_trips() {
  let s = store().await;
  let subject = seed_subject(&s).await;

  let enrolled = s
    .enroll_active(new_template(&subject, FingerPosition::LeftLittle, "XYZ==", 55))
    .await
    .unwrap();

  let fetched = s
    .get_template(enrolled.template.template_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.subject_id, subject.subject_id);
  assert_eq!(fetched.finger_position, FingerPosition::LeftLittle);
  assert_eq!(fetched.payload, "XYZ==");
  assert_eq!(fetched.quality_score, 55);
  assert_eq!(fetched.created_at, enrolled.template.created_at);
}
