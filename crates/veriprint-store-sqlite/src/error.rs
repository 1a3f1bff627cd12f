//! Error type for `veriprint-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown finger position: {0:?}")]
  UnknownFingerPosition(String),

  /// An `external_id` collided with an existing subject.
  #[error("subject with external id {0:?} already exists")]
  DuplicateExternalId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
