//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by dataset loaders and the question store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("dataset not found: {dataset}")]
    NotFound { dataset: String },

    #[error("failed to parse dataset {dataset}: {message}")]
    Parse { dataset: String, message: String },

    #[error("failed to fetch dataset {dataset}: {message}")]
    Transport { dataset: String, message: String },
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
