//! Error types for `idn-area-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The code's length does not map to any administrative level.
  #[error("invalid area code format: {0:?}")]
  InvalidCodeFormat(String),

  #[error("unknown search type: {0:?}")]
  InvalidSearchKind(String),

  #[error("invalid table prefix: {0:?}")]
  InvalidTablePrefix(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
