//! Enrollment and identification services for Veriprint.
//!
//! Both services are thin async orchestrators over the traits defined in
//! `veriprint-core`: they validate input, run captures through the codec,
//! and drive the store and the optional external comparator, with every
//! I/O-bound await held to a configured deadline.

pub mod config;
pub mod enroll;
pub mod identify;

pub use config::EngineConfig;
pub use enroll::{EnrollRequest, EnrollmentService};
pub use identify::{IdentificationService, IdentifyOutcome, MatchResult, ProbeRequest};

use std::{future::Future, time::Duration};

use veriprint_core::{Error, Result};

/// Await `fut`, converting a blown deadline into [`Error::Timeout`].
pub(crate) async fn bounded<F>(
  op: &'static str,
  limit: Duration,
  fut: F,
) -> Result<F::Output>
where
  F: Future,
{
  tokio::time::timeout(limit, fut)
    .await
    .map_err(|_| Error::Timeout { op, limit })
}
