use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend-neutral failure of a [`CatalogStore`](crate::dao::catalog_store::CatalogStore) call.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be reached or the query failed outright.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Backend error rendered as text.
        message: String,
        /// Backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A write expected to touch an existing row touched none.
    #[error("concurrent modification of {entity} `{id}`")]
    Concurrency {
        /// Kind of row, e.g. `game`.
        entity: &'static str,
        /// Identifier of the row.
        id: i64,
    },
    /// The backend rejected a row referencing a genre, game or platform that does not exist.
    #[error("foreign key violation: {message}")]
    ForeignKey {
        /// Backend description of the rejected write.
        message: String,
    },
}

impl StorageError {
    /// Wrap any backend failure as [`StorageError::Unavailable`].
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
