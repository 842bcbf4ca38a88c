use std::path::PathBuf;

use prontuario_core::{ValidationError, ViolationId};

/// Errors from any store backend or data-file loader.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this id exists in the store.
    #[error("{0} not found")]
    NotFound(ViolationId),

    /// The draft failed validation before reaching the store.
    #[error("invalid draft: {0}")]
    Validation(#[from] ValidationError),

    /// The database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A data file could not be read or parsed.
    #[error("data file {}: {message}", path.display())]
    DataFile { path: PathBuf, message: String },
}

impl StoreError {
    pub(crate) fn data_file(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::DataFile {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
