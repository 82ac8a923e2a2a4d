/// SQLite implementation backed by `sqlx`.
pub mod sqlite;

use crate::dao::models::{
    GameEntity, GameListItemEntity, GameWithGenreEntity, GenreEntity, NewGameEntity,
    PlatformEntity,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for the game catalog.
///
/// Every cross-entity read is its own method so callers issue joins
/// explicitly; nothing is lazily resolved behind an entity.
pub trait CatalogStore: Send + Sync {
    /// All games with their genre and platforms resolved.
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>>;
    /// One game with its genre resolved.
    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameWithGenreEntity>>>;
    /// Whether a game row with this identifier exists.
    fn game_exists(&self, id: i64) -> BoxFuture<'static, StorageResult<bool>>;
    /// Persist a new game and return it with its generated identifier.
    ///
    /// Fails with [`StorageError::ForeignKey`](crate::dao::storage::StorageError::ForeignKey)
    /// when the genre does not exist.
    fn insert_game(&self, game: NewGameEntity) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Replace the scalar columns of an existing game.
    ///
    /// Fails with [`StorageError::Concurrency`](crate::dao::storage::StorageError::Concurrency)
    /// when no row was updated.
    fn update_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a game and its association rows; returns whether a row existed.
    fn delete_game(&self, id: i64) -> BoxFuture<'static, StorageResult<bool>>;
    /// All genres ordered by name.
    fn list_genres(&self) -> BoxFuture<'static, StorageResult<Vec<GenreEntity>>>;
    /// One genre, if it exists.
    fn find_genre(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GenreEntity>>>;
    /// All platforms ordered by name.
    fn list_platforms(&self) -> BoxFuture<'static, StorageResult<Vec<PlatformEntity>>>;
    /// One platform, if it exists.
    fn find_platform(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<PlatformEntity>>>;
    /// Platforms currently associated with a game.
    fn game_platforms(&self, game_id: i64) -> BoxFuture<'static, StorageResult<Vec<PlatformEntity>>>;
    /// Associate a platform with a game; returns whether a new row was written.
    fn add_platform(
        &self,
        game_id: i64,
        platform_id: i64,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Dissociate a platform from a game; returns whether a row was removed.
    fn remove_platform(
        &self,
        game_id: i64,
        platform_id: i64,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Insert the named genres and platforms that are not present yet.
    fn seed_reference_data(
        &self,
        genres: Vec<String>,
        platforms: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap round trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
