/// Scalar columns of a persisted game row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key assigned by the store.
    pub id: i64,
    /// Title of the game.
    pub name: String,
    /// Image path or URL.
    pub image: String,
    /// Year of first release.
    pub release_year: i32,
    /// Foreign key to the genre row.
    pub genre_id: i64,
}

/// Game row about to be inserted; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGameEntity {
    /// Title of the game.
    pub name: String,
    /// Image path or URL.
    pub image: String,
    /// Year of first release.
    pub release_year: i32,
    /// Foreign key to the genre row.
    pub genre_id: i64,
}

impl NewGameEntity {
    /// Attach the identifier generated by the store.
    pub fn with_id(self, id: i64) -> GameEntity {
        GameEntity {
            id,
            name: self.name,
            image: self.image,
            release_year: self.release_year,
            genre_id: self.genre_id,
        }
    }
}

/// Genre reference row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreEntity {
    /// Primary key.
    pub id: i64,
    /// Display name, unique among genres.
    pub name: String,
}

/// Platform reference row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEntity {
    /// Primary key.
    pub id: i64,
    /// Display name, unique among platforms.
    pub name: String,
}

/// Game joined with its genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameWithGenreEntity {
    /// Scalar columns of the game.
    pub game: GameEntity,
    /// Genre referenced by `game.genre_id`.
    pub genre: GenreEntity,
}

/// Game joined with its genre and its associated platforms, as listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameListItemEntity {
    /// Scalar columns of the game.
    pub game: GameEntity,
    /// Genre referenced by `game.genre_id`.
    pub genre: GenreEntity,
    /// Associated platforms ordered by name.
    pub platforms: Vec<PlatformEntity>,
}
