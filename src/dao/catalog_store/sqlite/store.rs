use std::collections::HashMap;

use futures::future::BoxFuture;
use sqlx::SqlitePool;
use tracing::debug;

use super::{
    config::SqliteConfig,
    connection::establish_connection,
    error::{SqliteDaoError, SqliteResult},
    models::{SqliteGamePlatformRow, SqliteGameRow, SqliteNamedRow},
};
use crate::dao::{
    catalog_store::CatalogStore,
    models::{
        GameEntity, GameListItemEntity, GameWithGenreEntity, GenreEntity, NewGameEntity,
        PlatformEntity,
    },
    storage::StorageResult,
};

const SELECT_GAME_WITH_GENRE: &str = r#"
    SELECT g.id, g.name, g.image, g.release_year, g.genre_id, ge.name AS genre_name
    FROM games g
    JOIN genres ge ON ge.id = g.genre_id
"#;

/// [`CatalogStore`] backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Open the database and apply pending migrations.
    pub async fn connect(config: SqliteConfig) -> SqliteResult<Self> {
        let pool = establish_connection(&config).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn list_games(&self) -> SqliteResult<Vec<GameListItemEntity>> {
        let rows: Vec<SqliteGameRow> =
            sqlx::query_as(&format!("{SELECT_GAME_WITH_GENRE} ORDER BY g.id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|source| SqliteDaoError::query("list games", source))?;

        let links: Vec<SqliteGamePlatformRow> = sqlx::query_as(
            r#"
            SELECT gp.game_id, p.id AS platform_id, p.name AS platform_name
            FROM game_platforms gp
            JOIN platforms p ON p.id = gp.platform_id
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::query("list game platforms", source))?;

        let mut platforms_by_game: HashMap<i64, Vec<PlatformEntity>> = HashMap::new();
        for link in links {
            platforms_by_game
                .entry(link.game_id)
                .or_default()
                .push(link.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let joined: GameWithGenreEntity = row.into();
                let platforms = platforms_by_game
                    .remove(&joined.game.id)
                    .unwrap_or_default();
                (joined, platforms).into()
            })
            .collect())
    }

    async fn find_game(&self, id: i64) -> SqliteResult<Option<GameWithGenreEntity>> {
        let row: Option<SqliteGameRow> =
            sqlx::query_as(&format!("{SELECT_GAME_WITH_GENRE} WHERE g.id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|source| SqliteDaoError::query("load game", source))?;

        Ok(row.map(Into::into))
    }

    async fn game_exists(&self, id: i64) -> SqliteResult<bool> {
        let (exists,): (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM games WHERE id = ?)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|source| SqliteDaoError::query("check game existence", source))?;
        Ok(exists != 0)
    }

    async fn insert_game(&self, game: NewGameEntity) -> SqliteResult<GameEntity> {
        let result = sqlx::query(
            "INSERT INTO games (name, image, release_year, genre_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&game.name)
        .bind(&game.image)
        .bind(game.release_year)
        .bind(game.genre_id)
        .execute(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::query("insert game", source))?;

        let id = result.last_insert_rowid();
        debug!(id, name = %game.name, "inserted game");
        Ok(game.with_id(id))
    }

    async fn update_game(&self, game: GameEntity) -> SqliteResult<()> {
        let result = sqlx::query(
            "UPDATE games SET name = ?, image = ?, release_year = ?, genre_id = ? WHERE id = ?",
        )
        .bind(&game.name)
        .bind(&game.image)
        .bind(game.release_year)
        .bind(game.genre_id)
        .bind(game.id)
        .execute(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::query("update game", source))?;

        if result.rows_affected() == 0 {
            return Err(SqliteDaoError::MissingRow {
                entity: "game",
                id: game.id,
            });
        }
        Ok(())
    }

    async fn delete_game(&self, id: i64) -> SqliteResult<bool> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|source| SqliteDaoError::query("delete game", source))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_named(&self, table: NamedTable) -> SqliteResult<Vec<SqliteNamedRow>> {
        sqlx::query_as(&format!(
            "SELECT id, name FROM {} ORDER BY name",
            table.name()
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::query(table.list_operation(), source))
    }

    async fn find_named(&self, table: NamedTable, id: i64) -> SqliteResult<Option<SqliteNamedRow>> {
        sqlx::query_as(&format!(
            "SELECT id, name FROM {} WHERE id = ?",
            table.name()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::query(table.load_operation(), source))
    }

    async fn game_platforms(&self, game_id: i64) -> SqliteResult<Vec<PlatformEntity>> {
        let rows: Vec<SqliteGamePlatformRow> = sqlx::query_as(
            r#"
            SELECT gp.game_id, p.id AS platform_id, p.name AS platform_name
            FROM game_platforms gp
            JOIN platforms p ON p.id = gp.platform_id
            WHERE gp.game_id = ?
            ORDER BY p.name
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::query("load game platforms", source))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_platform(&self, game_id: i64, platform_id: i64) -> SqliteResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO game_platforms (game_id, platform_id) VALUES (?, ?)",
        )
        .bind(game_id)
        .bind(platform_id)
        .execute(&self.pool)
        .await
        .map_err(|source| SqliteDaoError::query("add platform", source))?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_platform(&self, game_id: i64, platform_id: i64) -> SqliteResult<bool> {
        let result =
            sqlx::query("DELETE FROM game_platforms WHERE game_id = ? AND platform_id = ?")
                .bind(game_id)
                .bind(platform_id)
                .execute(&self.pool)
                .await
                .map_err(|source| SqliteDaoError::query("remove platform", source))?;
        Ok(result.rows_affected() > 0)
    }

    async fn seed_reference_data(
        &self,
        genres: Vec<String>,
        platforms: Vec<String>,
    ) -> SqliteResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|source| SqliteDaoError::query("begin seeding", source))?;

        for (table, names) in [(NamedTable::Genres, genres), (NamedTable::Platforms, platforms)] {
            for name in names {
                sqlx::query(&format!(
                    "INSERT OR IGNORE INTO {} (name) VALUES (?)",
                    table.name()
                ))
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(|source| SqliteDaoError::query("seed reference data", source))?;
            }
        }

        tx.commit()
            .await
            .map_err(|source| SqliteDaoError::query("commit seeding", source))
    }

    async fn ping(&self) -> SqliteResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| SqliteDaoError::HealthPing { source })?;
        Ok(())
    }
}

/// Reference tables sharing the `(id, name)` shape.
#[derive(Clone, Copy)]
enum NamedTable {
    Genres,
    Platforms,
}

impl NamedTable {
    fn name(self) -> &'static str {
        match self {
            NamedTable::Genres => "genres",
            NamedTable::Platforms => "platforms",
        }
    }

    fn list_operation(self) -> &'static str {
        match self {
            NamedTable::Genres => "list genres",
            NamedTable::Platforms => "list platforms",
        }
    }

    fn load_operation(self) -> &'static str {
        match self {
            NamedTable::Genres => "load genre",
            NamedTable::Platforms => "load platform",
        }
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await.map_err(Into::into) })
    }

    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameWithGenreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn game_exists(&self, id: i64) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.game_exists(id).await.map_err(Into::into) })
    }

    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_game(game).await.map_err(Into::into) })
    }

    fn update_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.update_game(game).await.map_err(Into::into) })
    }

    fn delete_game(&self, id: i64) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await.map_err(Into::into) })
    }

    fn list_genres(&self) -> BoxFuture<'static, StorageResult<Vec<GenreEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = store.list_named(NamedTable::Genres).await?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
    }

    fn find_genre(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GenreEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let row = store.find_named(NamedTable::Genres, id).await?;
            Ok(row.map(Into::into))
        })
    }

    fn list_platforms(&self) -> BoxFuture<'static, StorageResult<Vec<PlatformEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = store.list_named(NamedTable::Platforms).await?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
    }

    fn find_platform(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<PlatformEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let row = store.find_named(NamedTable::Platforms, id).await?;
            Ok(row.map(Into::into))
        })
    }

    fn game_platforms(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Vec<PlatformEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.game_platforms(game_id).await.map_err(Into::into) })
    }

    fn add_platform(
        &self,
        game_id: i64,
        platform_id: i64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .add_platform(game_id, platform_id)
                .await
                .map_err(Into::into)
        })
    }

    fn remove_platform(
        &self,
        game_id: i64,
        platform_id: i64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .remove_platform(game_id, platform_id)
                .await
                .map_err(Into::into)
        })
    }

    fn seed_reference_data(
        &self,
        genres: Vec<String>,
        platforms: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .seed_reference_data(genres, platforms)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
