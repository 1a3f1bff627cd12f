//! Enrollment — register a new active template for a subject.

use std::sync::Arc;

use uuid::Uuid;
use veriprint_core::{
  Error, Result, codec,
  store::{SubjectDirectory, TemplateStore},
  template::{Enrollment, FingerPosition, NewTemplate},
};

/// A raw capture submitted for enrollment.
#[derive(Debug, Clone)]
pub struct EnrollRequest {
  pub subject_id:      Uuid,
  pub finger_position: FingerPosition,
  /// Raw capture as delivered by the device, possibly a full data URI.
  pub capture:         String,
  pub quality_score:   u8,
}

/// Validates a capture and records it as the subject's single active
/// template for the given finger.
pub struct EnrollmentService<S> {
  store:  Arc<S>,
  config: crate::EngineConfig,
}

impl<S> EnrollmentService<S>
where
  S: TemplateStore + SubjectDirectory,
{
  pub fn new(store: Arc<S>, config: crate::EngineConfig) -> Self {
    Self { store, config }
  }

  /// Enroll a capture. On success the previously active template for the
  /// same `(subject, finger)` pair — if any — has been retired and the
  /// returned enrollment's template is the single active row.
  pub async fn enroll(&self, request: EnrollRequest) -> Result<Enrollment> {
    if request.quality_score > 100 {
      return Err(Error::InvalidTemplate(format!(
        "quality score {} out of range (0-100)",
        request.quality_score
      )));
    }
    if request.quality_score < self.config.enroll_quality_floor {
      return Err(Error::QualityTooLow {
        score: request.quality_score,
        floor: self.config.enroll_quality_floor,
      });
    }

    let subject = crate::bounded(
      "resolve subject",
      self.config.call_timeout,
      SubjectDirectory::resolve_subject(&*self.store, request.subject_id),
    )
    .await?
    .map_err(Error::store_read)?
    .ok_or(Error::SubjectNotFound(request.subject_id))?;

    let payload = codec::clean_template(&request.capture)?;

    // The store runs deactivate-then-insert in one transaction, so two
    // concurrent enrollments for the same finger cannot both stay active.
    let enrollment = crate::bounded(
      "enroll template",
      self.config.call_timeout,
      self.store.enroll_active(NewTemplate {
        subject_id: subject.subject_id,
        finger_position: request.finger_position,
        payload,
        quality_score: request.quality_score,
      }),
    )
    .await?
    .map_err(Error::store_write)?;

    if enrollment.superseded > 0 {
      tracing::info!(
        subject_id = %subject.subject_id,
        finger_position = request.finger_position.as_str(),
        superseded = enrollment.superseded,
        "re-enrollment retired prior template"
      );
    }

    Ok(enrollment)
  }
}
