//! Error type for `idn-area-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] idn_area_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A target table has not been provisioned; run migrations first.
  #[error("table {0} does not exist; run migrations first")]
  SchemaMissing(String),

  #[error("source file not found: {}", .0.display())]
  SourceFileMissing(PathBuf),

  #[error("could not read source file {}: {reason}", .path.display())]
  SourceUnreadable { path: PathBuf, reason: String },

  /// An insert or the final commit broke a key or foreign-key constraint.
  #[error("constraint violation: {0}")]
  ConstraintViolation(#[source] rusqlite::Error),
}

impl Error {
  /// Classify a failed write, separating constraint failures from the rest.
  pub(crate) fn from_write(e: rusqlite::Error) -> Self {
    if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
      Error::ConstraintViolation(e)
    } else {
      Error::Sqlite(e)
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
