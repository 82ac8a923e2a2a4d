use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Result alias for SQLite backend operations.
pub type SqliteResult<T> = std::result::Result<T, SqliteDaoError>;

/// Failures of the SQLite catalog backend.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The configured URL is not a valid `sqlite:` URL.
    #[error("failed to parse SQLite connection URL `{url}`")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Underlying error.
        #[source]
        source: SqlxError,
    },
    /// The directory holding the database file could not be created.
    #[error("failed to create database directory `{path}`")]
    CreateDirectory {
        /// Directory that could not be created.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The pool could not open a connection.
    #[error("failed to open SQLite connection pool")]
    Connect {
        /// Underlying error.
        #[source]
        source: SqlxError,
    },
    /// Embedded migrations failed to apply.
    #[error("failed to apply catalog migrations")]
    Migrate {
        /// Underlying error.
        #[source]
        source: MigrateError,
    },
    /// The liveness query failed.
    #[error("SQLite ping health check failed")]
    HealthPing {
        /// Underlying error.
        #[source]
        source: SqlxError,
    },
    /// An update matched no row.
    #[error("{entity} `{id}` no longer exists")]
    MissingRow {
        /// Kind of row, e.g. `game`.
        entity: &'static str,
        /// Identifier that matched nothing.
        id: i64,
    },
    /// A write referenced a row that does not exist.
    #[error("{operation} rejected: referenced row does not exist")]
    ForeignKey {
        /// Statement that failed, in words.
        operation: &'static str,
        /// Underlying error.
        #[source]
        source: SqlxError,
    },
    /// Any other failed statement.
    #[error("failed to {operation}")]
    Query {
        /// Statement that failed, in words.
        operation: &'static str,
        /// Underlying error.
        #[source]
        source: SqlxError,
    },
}

impl SqliteDaoError {
    /// Classify a query failure, singling out foreign key violations.
    pub fn query(operation: &'static str, source: SqlxError) -> Self {
        let is_foreign_key = source
            .as_database_error()
            .is_some_and(|db_err| db_err.is_foreign_key_violation());
        if is_foreign_key {
            SqliteDaoError::ForeignKey { operation, source }
        } else {
            SqliteDaoError::Query { operation, source }
        }
    }
}
