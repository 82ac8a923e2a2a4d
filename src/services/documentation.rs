use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the game catalog.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::games::list_games,
        crate::routes::games::game_details,
        crate::routes::games::create_form,
        crate::routes::games::create_game,
        crate::routes::games::edit_form,
        crate::routes::games::update_game,
        crate::routes::games::add_platform,
        crate::routes::games::remove_platform,
        crate::routes::games::delete_confirmation,
        crate::routes::games::delete_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::game::GameForm,
            crate::dto::game::PlatformForm,
            crate::dto::game::GameSummary,
            crate::dto::game::GameDetails,
            crate::dto::game::GameListItem,
            crate::dto::game::GenreSummary,
            crate::dto::game::PlatformSummary,
            crate::dto::options::SelectOption,
            crate::dto::views::GameFormView,
            crate::dto::views::EditGameView,
            crate::dto::views::DeleteGameView,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Game catalog pages and form submissions"),
    )
)]
pub struct ApiDoc;
