//! Handlers for `/fingerprints` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/fingerprints/register` | Body: [`RegisterBody`]; returns 201 + template id |
//! | `POST` | `/fingerprints/verify` | Body: [`VerifyBody`]; 1:N, or 1:1 when `subject_id` is given |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use veriprint_core::{
  scorer::TemplateComparator,
  store::{SubjectAdmin, SubjectDirectory, TemplateStore},
  subject::SubjectRecord,
  template::FingerPosition,
};
use veriprint_engine::{EnrollRequest, IdentifyOutcome, ProbeRequest};

use crate::{AppState, error::ApiError};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub subject_id:      Uuid,
  pub template_data:   String,
  pub finger_position: FingerPosition,
  pub quality_score:   u8,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
  pub ok:          bool,
  pub template_id: Uuid,
}

/// `POST /fingerprints/register`
pub async fn register<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TemplateStore + SubjectDirectory + SubjectAdmin + Send + Sync + 'static,
  C: TemplateComparator + Send + Sync + 'static,
{
  let enrollment = state
    .enrollment
    .enroll(EnrollRequest {
      subject_id:      body.subject_id,
      finger_position: body.finger_position,
      capture:         body.template_data,
      quality_score:   body.quality_score,
    })
    .await?;

  Ok((
    StatusCode::CREATED,
    Json(RegisterResponse {
      ok:          true,
      template_id: enrollment.template.template_id,
    }),
  ))
}

// ─── Verify ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  /// When present, verification is 1:1 against this subject's templates;
  /// otherwise a full 1:N identification runs.
  pub subject_id:    Option<Uuid>,
  pub template_data: String,
  pub quality_score: u8,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
  pub matched:         bool,
  pub score:           f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject:         Option<SubjectRecord>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub finger_position: Option<FingerPosition>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template_id:     Option<Uuid>,
}

impl VerifyResponse {
  fn no_match(score: f64) -> Self {
    Self {
      matched: false,
      score,
      subject: None,
      finger_position: None,
      template_id: None,
    }
  }
}

/// `POST /fingerprints/verify`
///
/// Any failure — bad probe, store outage, timeout — is reported as
/// `matched: false`, indistinguishable from a genuine non-match. This is the
/// contract callers rely on; the real cause is logged server-side. See
/// DESIGN.md for why this ambiguity is preserved rather than fixed.
pub async fn verify<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<VerifyBody>,
) -> Json<VerifyResponse>
where
  S: TemplateStore + SubjectDirectory + SubjectAdmin + Send + Sync + 'static,
  C: TemplateComparator + Send + Sync + 'static,
{
  let probe = ProbeRequest {
    capture:       body.template_data,
    quality_score: body.quality_score,
  };

  let outcome = match body.subject_id {
    Some(subject_id) => {
      state
        .identification
        .verify_subject(subject_id, probe)
        .await
    }
    None => state.identification.identify(probe).await,
  };

  match outcome {
    Ok(IdentifyOutcome::Match(m)) => Json(VerifyResponse {
      matched:         true,
      score:           m.score,
      subject:         Some(m.subject),
      finger_position: Some(m.finger_position),
      template_id:     Some(m.template_id),
    }),
    Ok(IdentifyOutcome::NoMatch { best_score }) => {
      Json(VerifyResponse::no_match(best_score))
    }
    Err(e) => {
      tracing::warn!(error = %e, "identification failed; reporting no match");
      Json(VerifyResponse::no_match(0.0))
    }
  }
}
