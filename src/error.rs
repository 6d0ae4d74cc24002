use thiserror::Error;

/// Every failure the catalog surfaces to its caller.
///
/// Payloads are the human-readable message shown to the user; the CLI prints
/// them once and exits, nothing is retried.
#[derive(Debug, Error)]
pub enum CatalogError {
  /// The local database could not be opened, migrated or read.
  #[error("Storage unavailable: {0}")]
  StorageUnavailable(String),
  /// A put or delete was rejected by the storage engine.
  #[error("Write failed: {0}")]
  WriteFailed(String),
  /// Bad user input: empty registration fields, mismatched passwords, oversized images.
  #[error("{0}")]
  ValidationFailed(String),
  /// Missing account or wrong credentials.
  #[error("{0}")]
  AuthFailed(String),
  #[error("Book {0} not found")]
  NotFound(i64),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

pub(crate) fn storage_unavailable(err: impl std::fmt::Display) -> CatalogError {
  CatalogError::StorageUnavailable(err.to_string())
}

pub(crate) fn write_failed(err: impl std::fmt::Display) -> CatalogError {
  CatalogError::WriteFailed(err.to_string())
}
