//! Handlers for `/subjects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/subjects` | Admin seeding; body: `{"external_id":..,"display_name":..}` |
//! | `GET`  | `/subjects/:id` | 404 if not found |
//! | `GET`  | `/subjects/:id/templates` | Active templates for the subject |
//! | `GET`  | `/subjects/by-external/:external_id` | Lookup by card number |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use veriprint_core::{
  scorer::TemplateComparator,
  store::{SubjectAdmin, SubjectDirectory, TemplateStore},
  subject::SubjectRecord,
  template::Template,
};

use crate::{AppState, error::ApiError};

// ─── Create (admin seeding) ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub external_id:  String,
  pub display_name: String,
}

/// `POST /subjects`
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TemplateStore + SubjectDirectory + SubjectAdmin + Send + Sync + 'static,
  C: TemplateComparator + Send + Sync + 'static,
{
  let subject = state
    .store
    .add_subject(body.external_id, body.display_name)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(subject)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /subjects/:id`
pub async fn get_one<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SubjectRecord>, ApiError>
where
  S: TemplateStore + SubjectDirectory + SubjectAdmin + Send + Sync + 'static,
  C: TemplateComparator + Send + Sync + 'static,
{
  let subject = state
    .store
    .resolve_subject(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("subject {id} not found")))?;
  Ok(Json(subject))
}

// ─── Get by external id ───────────────────────────────────────────────────────

/// `GET /subjects/by-external/:external_id`
pub async fn get_by_external<S, C>(
  State(state): State<AppState<S, C>>,
  Path(external_id): Path<String>,
) -> Result<Json<SubjectRecord>, ApiError>
where
  S: TemplateStore + SubjectDirectory + SubjectAdmin + Send + Sync + 'static,
  C: TemplateComparator + Send + Sync + 'static,
{
  let subject = state
    .store
    .resolve_subject_by_external_id(&external_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("subject with external id {external_id:?} not found"))
    })?;
  Ok(Json(subject))
}

// ─── Active templates ─────────────────────────────────────────────────────────

/// `GET /subjects/:id/templates`
pub async fn templates<S, C>(
  State(state): State<AppState<S, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Template>>, ApiError>
where
  S: TemplateStore + SubjectDirectory + SubjectAdmin + Send + Sync + 'static,
  C: TemplateComparator + Send + Sync + 'static,
{
  state
    .store
    .resolve_subject(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("subject {id} not found")))?;

  let templates = state
    .store
    .list_active_for_subject(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(templates))
}
