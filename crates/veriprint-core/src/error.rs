//! Error taxonomy shared by the enrollment and identification services.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::scorer::ComparatorError;

#[derive(Debug, Error)]
pub enum Error {
  /// The capture was empty (or reduced to nothing) after cleaning.
  /// User-correctable; the caller should request a fresh capture.
  #[error("invalid template capture: {0}")]
  InvalidTemplate(String),

  /// The referenced subject does not exist — a caller bug or a stale UI.
  #[error("subject not found: {0}")]
  SubjectNotFound(Uuid),

  /// The capture's quality score is below the acceptance floor.
  #[error("quality score {score} below floor {floor}")]
  QualityTooLow { score: u8, floor: u8 },

  /// Reading from the template store failed. Retryable by the caller.
  #[error("store read failed: {0}")]
  StoreRead(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Writing to the template store failed. Retryable by the caller.
  #[error("store write failed: {0}")]
  StoreWrite(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The injected comparator misbehaved. Non-fatal during identification;
  /// the affected candidate simply scores zero.
  #[error("comparator error: {0}")]
  Comparator(#[from] ComparatorError),

  /// An I/O-bound call exceeded its configured deadline.
  #[error("{op} timed out after {limit:?}")]
  Timeout { op: &'static str, limit: Duration },
}

impl Error {
  /// Wrap a backend error from a store read.
  pub fn store_read<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreRead(Box::new(e))
  }

  /// Wrap a backend error from a store write.
  pub fn store_write<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreWrite(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
