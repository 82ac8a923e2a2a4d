//! Catalog operations behind the game routes. Every function performs its
//! existence checks against the store before mutating it and returns DTOs
//! ready for the view layer.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::{
    dao::storage::StorageError,
    dto::{
        game::{
            GameDetails, GameEditData, GameForm, GameListItem, GameSummary, GenreSummary,
            PlatformSummary, field_error,
        },
        options::{SelectOption, genre_options as build_genre_options},
    },
    error::ServiceError,
    state::SharedState,
};

fn game_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("game `{id}` not found"))
}

fn platform_not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("platform `{id}` not found"))
}

fn unknown_genre(form: GameForm, genre_id: i64) -> ServiceError {
    let errors = field_error(
        "GenreId",
        "unknown_genre",
        format!("Genre `{genre_id}` does not exist."),
    );
    ServiceError::invalid(form, errors)
}

/// Every game with its genre and platforms.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameListItem>, ServiceError> {
    let games = state.store().list_games().await?;
    Ok(games.into_iter().map(Into::into).collect())
}

/// One game with its genre.
pub async fn get_game(state: &SharedState, id: i64) -> Result<GameDetails, ServiceError> {
    let Some(game) = state.store().find_game(id).await? else {
        return Err(game_not_found(id));
    };
    Ok(game.into())
}

/// Genre selector for the create and edit forms.
pub async fn genre_options(
    state: &SharedState,
    selected: Option<i64>,
) -> Result<Vec<SelectOption>, ServiceError> {
    let genres = state.store().list_genres().await?;
    let genres: Vec<GenreSummary> = genres.into_iter().map(Into::into).collect();
    Ok(build_genre_options(genres, selected))
}

/// Validate and persist a new game. A rejected form comes back untouched in
/// [`ServiceError::Invalid`].
pub async fn create_game(state: &SharedState, form: GameForm) -> Result<GameSummary, ServiceError> {
    let input = match form.to_create_input() {
        Ok(input) => input,
        Err(errors) => return Err(ServiceError::invalid(form, errors)),
    };

    let store = state.store();
    if store.find_genre(input.genre_id).await?.is_none() {
        return Err(unknown_genre(form, input.genre_id));
    }

    let genre_id = input.genre_id;
    match store.insert_game(input.into()).await {
        Ok(game) => {
            info!(id = game.id, name = %game.name, "game created");
            Ok(game.into())
        }
        // Genre deleted between the check and the insert.
        Err(StorageError::ForeignKey { .. }) => Err(unknown_genre(form, genre_id)),
        Err(err) => Err(err.into()),
    }
}

/// Load a game for editing together with the platforms that can still be added.
pub async fn prepare_edit(state: &SharedState, id: i64) -> Result<GameEditData, ServiceError> {
    let store = state.store();
    let Some(found) = store.find_game(id).await? else {
        return Err(game_not_found(id));
    };

    let platforms = store.game_platforms(id).await?;
    let associated: HashSet<i64> = platforms.iter().map(|p| p.id).collect();
    let available_platforms = store
        .list_platforms()
        .await?
        .into_iter()
        .filter(|platform| !associated.contains(&platform.id))
        .map(PlatformSummary::from)
        .collect();

    Ok(GameEditData {
        game: found.game.into(),
        platforms: platforms.into_iter().map(Into::into).collect(),
        available_platforms,
    })
}

/// Replace the scalar fields of the game at `id`.
///
/// The body must carry the same identifier as the path. When the row is gone
/// by the time it is written the caller gets [`ServiceError::NotFound`]; any
/// other failed write is a [`ServiceError::Conflict`] and is not retried.
pub async fn update_game(
    state: &SharedState,
    id: i64,
    form: GameForm,
) -> Result<GameSummary, ServiceError> {
    if form.body_id() != Some(id) {
        return Err(ServiceError::NotFound(format!(
            "game id in body does not match `{id}`"
        )));
    }

    let input = match form.to_update_input(id) {
        Ok(input) => input,
        Err(errors) => return Err(ServiceError::invalid(form, errors)),
    };

    let store = state.store();
    if store.find_genre(input.genre_id).await?.is_none() {
        return Err(unknown_genre(form, input.genre_id));
    }

    let genre_id = input.genre_id;
    let game = input.into();
    match store.update_game(game).await {
        Ok(()) => {
            info!(id, "game updated");
            let Some(updated) = store.find_game(id).await? else {
                return Err(game_not_found(id));
            };
            Ok(updated.game.into())
        }
        Err(StorageError::Concurrency { .. }) => {
            if store.game_exists(id).await? {
                warn!(id, "game update conflicted with a concurrent write");
                Err(ServiceError::Conflict(format!(
                    "game `{id}` was modified concurrently"
                )))
            } else {
                debug!(id, "game vanished before update");
                Err(game_not_found(id))
            }
        }
        Err(StorageError::ForeignKey { .. }) => Err(unknown_genre(form, genre_id)),
        Err(err) => Err(err.into()),
    }
}

/// Associate a platform with a game. Already associated is a no-op.
pub async fn add_platform(
    state: &SharedState,
    game_id: i64,
    platform_id: i64,
) -> Result<(), ServiceError> {
    let store = state.store();
    if !store.game_exists(game_id).await? {
        return Err(game_not_found(game_id));
    }
    if store.find_platform(platform_id).await?.is_none() {
        return Err(platform_not_found(platform_id));
    }

    match store.add_platform(game_id, platform_id).await {
        Ok(true) => {
            debug!(game_id, platform_id, "platform added");
            Ok(())
        }
        Ok(false) => {
            debug!(game_id, platform_id, "platform already associated");
            Ok(())
        }
        // Game or platform deleted between the checks and the insert.
        Err(StorageError::ForeignKey { .. }) => {
            if store.game_exists(game_id).await? {
                Err(platform_not_found(platform_id))
            } else {
                Err(game_not_found(game_id))
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Dissociate a platform from a game. Not associated is a no-op.
pub async fn remove_platform(
    state: &SharedState,
    game_id: i64,
    platform_id: i64,
) -> Result<(), ServiceError> {
    let store = state.store();
    if !store.game_exists(game_id).await? {
        return Err(game_not_found(game_id));
    }

    let removed = store.remove_platform(game_id, platform_id).await?;
    debug!(game_id, platform_id, removed, "platform removal processed");
    Ok(())
}

/// Delete a game and its platform associations. Deleting a missing game succeeds.
pub async fn delete_game(state: &SharedState, id: i64) -> Result<(), ServiceError> {
    let deleted = state.store().delete_game(id).await?;
    if deleted {
        info!(id, "game deleted");
    } else {
        debug!(id, "game already absent; nothing to delete");
    }
    Ok(())
}
