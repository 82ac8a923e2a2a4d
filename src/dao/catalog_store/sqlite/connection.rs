use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tracing::{debug, info};

use super::{
    config::SqliteConfig,
    error::{SqliteDaoError, SqliteResult},
};

/// Open the pool described by `config` and bring the schema up to date.
pub async fn establish_connection(config: &SqliteConfig) -> SqliteResult<SqlitePool> {
    let filename = config.options.get_filename();
    if !config.in_memory {
        if let Some(parent) = filename.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| {
                SqliteDaoError::CreateDirectory {
                    path: parent.display().to_string(),
                    source,
                }
            })?;
        }
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
    if config.in_memory {
        // Closing the last connection would drop the whole database.
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }
    let pool = pool_options
        .connect_with(config.options.clone())
        .await
        .map_err(|source| SqliteDaoError::Connect { source })?;
    debug!(file = %filename.display(), "opened SQLite pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|source| SqliteDaoError::Migrate { source })?;
    info!("catalog schema is up to date");

    Ok(pool)
}
