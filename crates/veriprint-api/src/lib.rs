//! JSON REST API for Veriprint.
//!
//! Exposes an axum [`Router`] backed by any store implementing the core
//! traits. Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", veriprint_api::api_router(state))
//! ```

pub mod config;
pub mod error;
pub mod fingerprints;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use veriprint_core::{
  scorer::TemplateComparator,
  store::{SubjectAdmin, SubjectDirectory, TemplateStore},
};
use veriprint_engine::{EnrollmentService, IdentificationService};

pub use config::{EngineSettings, ServerConfig};
pub use error::ApiError;

/// Shared handler state: the store plus the two services built over it.
pub struct AppState<S, C> {
  pub store:          Arc<S>,
  pub enrollment:     Arc<EnrollmentService<S>>,
  pub identification: Arc<IdentificationService<S, C>>,
}

// Manual impl: `#[derive(Clone)]` would demand `S: Clone` and `C: Clone`,
// but only the Arcs are cloned.
impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:          self.store.clone(),
      enrollment:     self.enrollment.clone(),
      identification: self.identification.clone(),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(state: AppState<S, C>) -> Router<()>
where
  S: TemplateStore + SubjectDirectory + SubjectAdmin + Send + Sync + 'static,
  C: TemplateComparator + Send + Sync + 'static,
{
  Router::new()
    // Fingerprints
    .route("/fingerprints/register", post(fingerprints::register::<S, C>))
    .route("/fingerprints/verify", post(fingerprints::verify::<S, C>))
    // Subjects
    .route("/subjects", post(subjects::create::<S, C>))
    .route("/subjects/{id}", get(subjects::get_one::<S, C>))
    .route("/subjects/{id}/templates", get(subjects::templates::<S, C>))
    .route(
      "/subjects/by-external/{external_id}",
      get(subjects::get_by_external::<S, C>),
    )
    .with_state(state)
}
