use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};

use super::error::{SqliteDaoError, SqliteResult};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings of the SQLite catalog store.
#[derive(Clone, Debug)]
pub struct SqliteConfig {
    /// Connection options passed to every pooled connection.
    pub options: SqliteConnectOptions,
    /// Upper bound of the pool.
    pub max_connections: u32,
    /// The database lives only as long as the pool keeps a connection open.
    pub in_memory: bool,
}

impl SqliteConfig {
    /// Parse a `sqlite:` URL, creating the database file on first use.
    pub fn from_url(url: &str) -> SqliteResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| SqliteDaoError::InvalidUrl {
                url: url.to_owned(),
                source,
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        Ok(Self {
            options,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            in_memory: url.contains(":memory:"),
        })
    }

    /// Private in-memory database. A single connection keeps every query on
    /// the same database.
    pub fn in_memory() -> SqliteResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|source| SqliteDaoError::InvalidUrl {
                url: "sqlite::memory:".to_owned(),
                source,
            })?
            .foreign_keys(true);

        Ok(Self {
            options,
            max_connections: 1,
            in_memory: true,
        })
    }
}
