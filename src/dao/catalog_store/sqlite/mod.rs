mod config;
mod connection;
mod error;
mod models;
/// Store implementation and its queries.
pub mod store;

pub use config::SqliteConfig;
pub use error::SqliteDaoError;
pub use store::SqliteCatalogStore;

use crate::dao::storage::StorageError;

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::MissingRow { entity, id } => StorageError::Concurrency { entity, id },
            SqliteDaoError::ForeignKey { .. } => StorageError::ForeignKey {
                message: err.to_string(),
            },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
