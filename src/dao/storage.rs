use std::{error::Error, path::Path};

use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by the file-backed stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The durable score record could not be rewritten.
    #[error("failed to persist score record to {path}: {source}")]
    Persist {
        /// Location of the record that could not be written.
        path: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The pending-delta record could not be reset after a tick.
    #[error("failed to clear pending record at {path}: {source}")]
    Clear {
        /// Location of the pending record.
        path: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct a persistence error from any underlying failure.
    pub fn persist(path: &Path, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Persist {
            path: path.display().to_string(),
            source: Box::new(source),
        }
    }

    /// Construct a clear error from any underlying failure.
    pub fn clear(path: &Path, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Clear {
            path: path.display().to_string(),
            source: Box::new(source),
        }
    }
}
