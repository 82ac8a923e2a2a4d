use sqlx::FromRow;

use crate::dao::models::{
    GameEntity, GameListItemEntity, GameWithGenreEntity, GenreEntity, PlatformEntity,
};

/// `games` row joined with its `genres` row.
#[derive(Debug, FromRow)]
pub struct SqliteGameRow {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub release_year: i32,
    pub genre_id: i64,
    pub genre_name: String,
}

/// Row of the `genres` or `platforms` reference tables.
#[derive(Debug, FromRow)]
pub struct SqliteNamedRow {
    pub id: i64,
    pub name: String,
}

/// Association row resolved to the platform it references.
#[derive(Debug, FromRow)]
pub struct SqliteGamePlatformRow {
    pub game_id: i64,
    pub platform_id: i64,
    pub platform_name: String,
}

impl From<SqliteGameRow> for GameWithGenreEntity {
    fn from(row: SqliteGameRow) -> Self {
        Self {
            game: GameEntity {
                id: row.id,
                name: row.name,
                image: row.image,
                release_year: row.release_year,
                genre_id: row.genre_id,
            },
            genre: GenreEntity {
                id: row.genre_id,
                name: row.genre_name,
            },
        }
    }
}

impl From<(GameWithGenreEntity, Vec<PlatformEntity>)> for GameListItemEntity {
    fn from((joined, platforms): (GameWithGenreEntity, Vec<PlatformEntity>)) -> Self {
        Self {
            game: joined.game,
            genre: joined.genre,
            platforms,
        }
    }
}

impl From<SqliteNamedRow> for GenreEntity {
    fn from(row: SqliteNamedRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<SqliteNamedRow> for PlatformEntity {
    fn from(row: SqliteNamedRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<SqliteGamePlatformRow> for PlatformEntity {
    fn from(row: SqliteGamePlatformRow) -> Self {
        Self {
            id: row.platform_id,
            name: row.platform_name,
        }
    }
}
