use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::{
    dao::models::{
        GameEntity, GameListItemEntity, GameWithGenreEntity, GenreEntity, NewGameEntity,
        PlatformEntity,
    },
    dto::validation::{parse_identifier, parse_release_year, validate_required},
};

/// Form fields in display order, used to order per-field diagnostics.
const FORM_FIELDS: [&str; 4] = ["Name", "Image", "ReleaseYear", "GenreId"];

/// Raw game form exactly as submitted, kept as text so rejected values can be
/// shown back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct GameForm {
    /// Present on edit only; must match the identifier in the path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title; required.
    pub name: String,
    /// Image path or URL; may be empty.
    pub image: String,
    /// Release year as typed.
    pub release_year: String,
    /// Selected genre identifier as typed.
    pub genre_id: String,
}

/// Whitelisted fields accepted when creating a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGameInput {
    /// Title of the game.
    pub name: String,
    /// Image path or URL.
    pub image: String,
    /// Year of first release.
    pub release_year: i32,
    /// Identifier of an existing genre.
    pub genre_id: i64,
}

/// Whitelisted fields accepted when editing a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGameInput {
    /// Identifier taken from the path.
    pub id: i64,
    /// Title of the game.
    pub name: String,
    /// Image path or URL.
    pub image: String,
    /// Year of first release.
    pub release_year: i32,
    /// Identifier of an existing genre.
    pub genre_id: i64,
}

impl GameForm {
    /// Validate the submitted values and keep only the creatable fields.
    pub fn to_create_input(&self) -> Result<CreateGameInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_required("Name", &self.name) {
            errors.add("Name", e);
        }
        let release_year = parse_release_year(&self.release_year)
            .map_err(|e| errors.add("ReleaseYear", e))
            .ok();
        let genre_id = parse_identifier("GenreId", &self.genre_id)
            .map_err(|e| errors.add("GenreId", e))
            .ok();

        match (release_year, genre_id) {
            (Some(release_year), Some(genre_id)) if errors.is_empty() => Ok(CreateGameInput {
                name: self.name.clone(),
                image: self.image.clone(),
                release_year,
                genre_id,
            }),
            _ => Err(errors),
        }
    }

    /// Validate the submitted values for the game identified by `id`.
    pub fn to_update_input(&self, id: i64) -> Result<UpdateGameInput, ValidationErrors> {
        let input = self.to_create_input()?;
        Ok(UpdateGameInput {
            id,
            name: input.name,
            image: input.image,
            release_year: input.release_year,
            genre_id: input.genre_id,
        })
    }

    /// Identifier carried in the body, if it parses.
    pub fn body_id(&self) -> Option<i64> {
        self.id.as_deref().and_then(|id| id.trim().parse().ok())
    }

    /// Genre currently selected in the form, if it parses.
    pub fn selected_genre(&self) -> Option<i64> {
        self.genre_id.trim().parse().ok()
    }
}

impl From<CreateGameInput> for NewGameEntity {
    fn from(input: CreateGameInput) -> Self {
        Self {
            name: input.name,
            image: input.image,
            release_year: input.release_year,
            genre_id: input.genre_id,
        }
    }
}

impl From<UpdateGameInput> for GameEntity {
    fn from(input: UpdateGameInput) -> Self {
        Self {
            id: input.id,
            name: input.name,
            image: input.image,
            release_year: input.release_year,
            genre_id: input.genre_id,
        }
    }
}

/// Build a single-field error set, e.g. for a genre that vanished.
pub fn field_error(field: &'static str, code: &'static str, message: String) -> ValidationErrors {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}

/// Flatten validation errors into display messages keyed by form field.
pub fn field_messages(errors: &ValidationErrors) -> IndexMap<String, Vec<String>> {
    let field_errors = errors.field_errors();
    FORM_FIELDS
        .iter()
        .filter_map(|field| {
            field_errors.get(*field).map(|errs| {
                let messages = errs
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|message| message.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
        })
        .collect()
}

/// Payload of the add/remove platform forms.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlatformForm {
    /// Platform to add or remove.
    #[serde(rename = "platformId")]
    pub platform_id: i64,
}

/// Genre as shown in views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct GenreSummary {
    /// Genre identifier.
    pub id: i64,
    /// Genre name.
    pub name: String,
}

/// Platform as shown in views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlatformSummary {
    /// Platform identifier.
    pub id: i64,
    /// Platform name.
    pub name: String,
}

/// Scalar fields of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct GameSummary {
    /// Game identifier.
    pub id: i64,
    /// Title of the game.
    pub name: String,
    /// Image path or URL.
    pub image: String,
    /// Year of first release.
    pub release_year: i32,
    /// Identifier of the genre.
    pub genre_id: i64,
}

/// Game with its genre resolved, used by the detail and delete views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct GameDetails {
    /// Game identifier.
    pub id: i64,
    /// Title of the game.
    pub name: String,
    /// Image path or URL.
    pub image: String,
    /// Year of first release.
    pub release_year: i32,
    /// Resolved genre.
    pub genre: GenreSummary,
}

/// Game with genre and platforms resolved, as shown in the list view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct GameListItem {
    /// Game identifier.
    pub id: i64,
    /// Title of the game.
    pub name: String,
    /// Image path or URL.
    pub image: String,
    /// Year of first release.
    pub release_year: i32,
    /// Resolved genre.
    pub genre: GenreSummary,
    /// Associated platforms ordered by name.
    pub platforms: Vec<PlatformSummary>,
}

/// Everything the edit form needs about a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameEditData {
    /// Current scalar values.
    pub game: GameSummary,
    /// Platforms currently associated with the game.
    pub platforms: Vec<PlatformSummary>,
    /// Platforms that can still be added.
    pub available_platforms: Vec<PlatformSummary>,
}

impl From<GenreEntity> for GenreSummary {
    fn from(genre: GenreEntity) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

impl From<PlatformEntity> for PlatformSummary {
    fn from(platform: PlatformEntity) -> Self {
        Self {
            id: platform.id,
            name: platform.name,
        }
    }
}

impl From<GameEntity> for GameSummary {
    fn from(game: GameEntity) -> Self {
        Self {
            id: game.id,
            name: game.name,
            image: game.image,
            release_year: game.release_year,
            genre_id: game.genre_id,
        }
    }
}

impl From<GameWithGenreEntity> for GameDetails {
    fn from(entity: GameWithGenreEntity) -> Self {
        Self {
            id: entity.game.id,
            name: entity.game.name,
            image: entity.game.image,
            release_year: entity.game.release_year,
            genre: entity.genre.into(),
        }
    }
}

impl From<GameListItemEntity> for GameListItem {
    fn from(entity: GameListItemEntity) -> Self {
        Self {
            id: entity.game.id,
            name: entity.game.name,
            image: entity.game.image,
            release_year: entity.game.release_year,
            genre: entity.genre.into(),
            platforms: entity.platforms.into_iter().map(Into::into).collect(),
        }
    }
}
