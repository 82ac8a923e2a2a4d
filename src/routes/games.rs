use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::de::IgnoredAny;

use crate::{
    dto::{
        game::{GameDetails, GameForm, GameListItem, PlatformForm, field_messages},
        options::platform_options,
        views::{DeleteGameView, EditGameView, GameFormView},
    },
    error::{AppError, RejectedForm, ServiceError},
    routes::protection::ProtectedForm,
    services::game_service,
    state::{SessionContext, SharedState},
};

const GAMES_LIST: &str = "/games";

/// Catalog routes: list, details, create, edit, platform association, delete.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/games/create", get(create_form).post(create_game))
        .route("/games/{id}", get(game_details))
        .route("/games/edit/{id}", get(edit_form).post(update_game))
        .route("/games/{id}/platforms/add", post(add_platform))
        .route("/games/{id}/platforms/remove", post(remove_platform))
        .route(
            "/games/delete/{id}",
            get(delete_confirmation).post(delete_game),
        )
}

/// Identifiers that do not parse are treated like identifiers that do not exist.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(format!("game `{raw}` not found")))
}

fn edit_location(id: i64) -> String {
    format!("/games/edit/{id}")
}

/// Send the rejected form back with its diagnostics and a fresh genre list.
async fn rerender_form(
    state: &SharedState,
    session: SessionContext,
    rejected: RejectedForm,
) -> Result<Response, AppError> {
    let genres = game_service::genre_options(state, rejected.form.selected_genre()).await?;
    let view = GameFormView {
        csrf_token: session.csrf_token,
        errors: field_messages(&rejected.errors),
        game: rejected.form,
        genres,
    };
    Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
}

/// List every game with its genre and platforms.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses((status = 200, description = "Games in the catalog", body = [GameListItem]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameListItem>>, AppError> {
    Ok(Json(game_service::list_games(&state).await?))
}

/// Show one game with its genre.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game details", body = GameDetails),
        (status = 404, description = "No such game")
    )
)]
pub async fn game_details(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameDetails>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(game_service::get_game(&state, id).await?))
}

/// Blank creation form with the genre selector.
#[utoipa::path(
    get,
    path = "/games/create",
    tag = "games",
    responses((status = 200, description = "Creation form", body = GameFormView))
)]
pub async fn create_form(
    State(state): State<SharedState>,
    session: SessionContext,
) -> Result<Json<GameFormView>, AppError> {
    let genres = game_service::genre_options(&state, None).await?;
    Ok(Json(GameFormView {
        csrf_token: session.csrf_token,
        game: GameForm::default(),
        genres,
        errors: Default::default(),
    }))
}

/// Create a game, or send the form back when it does not validate.
#[utoipa::path(
    post,
    path = "/games/create",
    tag = "games",
    request_body(content = GameForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirects to the list"),
        (status = 403, description = "Missing or invalid forgery token"),
        (status = 422, description = "Rejected form", body = GameFormView)
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    ProtectedForm { session, input }: ProtectedForm<GameForm>,
) -> Result<Response, AppError> {
    match game_service::create_game(&state, input).await {
        Ok(_) => Ok(Redirect::to(GAMES_LIST).into_response()),
        Err(ServiceError::Invalid(rejected)) => rerender_form(&state, session, *rejected).await,
        Err(err) => Err(err.into()),
    }
}

/// Edit form with current values, associated platforms and the platforms left to add.
#[utoipa::path(
    get,
    path = "/games/edit/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Edit form", body = EditGameView),
        (status = 404, description = "No such game")
    )
)]
pub async fn edit_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    session: SessionContext,
) -> Result<Json<EditGameView>, AppError> {
    let id = parse_id(&id)?;
    let edit = game_service::prepare_edit(&state, id).await?;
    let genres = game_service::genre_options(&state, Some(edit.game.genre_id)).await?;

    Ok(Json(EditGameView {
        csrf_token: session.csrf_token,
        game: edit.game,
        platforms: edit.platforms,
        available_platforms: platform_options(edit.available_platforms),
        genres,
    }))
}

/// Save the edit form. The `Id` field must match the path.
#[utoipa::path(
    post,
    path = "/games/edit/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    request_body(content = GameForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved; redirects to the list"),
        (status = 403, description = "Missing or invalid forgery token"),
        (status = 404, description = "No such game, or body id differs from path id"),
        (status = 422, description = "Rejected form", body = GameFormView)
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ProtectedForm { session, input }: ProtectedForm<GameForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    match game_service::update_game(&state, id, input).await {
        Ok(_) => Ok(Redirect::to(GAMES_LIST).into_response()),
        Err(ServiceError::Invalid(rejected)) => rerender_form(&state, session, *rejected).await,
        Err(err) => Err(err.into()),
    }
}

/// Associate a platform, then return to the edit form.
#[utoipa::path(
    post,
    path = "/games/{id}/platforms/add",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    request_body(content = PlatformForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirects to the edit form"),
        (status = 403, description = "Missing or invalid forgery token"),
        (status = 404, description = "No such game or platform")
    )
)]
pub async fn add_platform(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ProtectedForm { input, .. }: ProtectedForm<PlatformForm>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    game_service::add_platform(&state, id, input.platform_id).await?;
    Ok(Redirect::to(&edit_location(id)))
}

/// Dissociate a platform, then return to the edit form.
#[utoipa::path(
    post,
    path = "/games/{id}/platforms/remove",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    request_body(content = PlatformForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirects to the edit form"),
        (status = 403, description = "Missing or invalid forgery token"),
        (status = 404, description = "No such game")
    )
)]
pub async fn remove_platform(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ProtectedForm { input, .. }: ProtectedForm<PlatformForm>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    game_service::remove_platform(&state, id, input.platform_id).await?;
    Ok(Redirect::to(&edit_location(id)))
}

/// Confirmation page shown before deleting a game.
#[utoipa::path(
    get,
    path = "/games/delete/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Delete confirmation", body = DeleteGameView),
        (status = 404, description = "No such game")
    )
)]
pub async fn delete_confirmation(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    session: SessionContext,
) -> Result<Json<DeleteGameView>, AppError> {
    let id = parse_id(&id)?;
    let game = game_service::get_game(&state, id).await?;
    Ok(Json(DeleteGameView {
        csrf_token: session.csrf_token,
        game,
    }))
}

/// Delete a game; deleting one that is already gone still redirects to the list.
#[utoipa::path(
    post,
    path = "/games/delete/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 303, description = "Deleted or already absent; redirects to the list"),
        (status = 403, description = "Missing or invalid forgery token")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    _confirmed: ProtectedForm<IgnoredAny>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    game_service::delete_game(&state, id).await?;
    Ok(Redirect::to(GAMES_LIST))
}
