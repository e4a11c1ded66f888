use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Gif Battle Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::create_game,
        crate::routes::game::get_game,
        crate::routes::game::join_game,
        crate::routes::game::leave_game,
        crate::routes::game::start_game,
        crate::routes::game::start_round,
        crate::routes::game::set_custom_prompt,
        crate::routes::game::regenerate_prompt,
        crate::routes::game::submit_gif,
        crate::routes::game::select_winner,
        crate::routes::game::start_next_round,
        crate::routes::game::games_for_player,
        crate::routes::sse::game_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::JoinGameRequest,
            crate::dto::game::LeaveGameRequest,
            crate::dto::game::SubmitGifRequest,
            crate::dto::game::SelectWinnerRequest,
            crate::dto::game::CustomPromptRequest,
            crate::dto::game::PlayerProfileInput,
            crate::dto::game::GameSnapshot,
            crate::dto::game::PlayerSnapshot,
            crate::dto::game::RoundSnapshot,
            crate::dto::game::PromptSnapshot,
            crate::dto::game::SubmissionSnapshot,
            crate::dto::game::GameListItem,
            crate::dto::game::PlayerBrief,
            crate::dao::models::GameStatus,
        )
    ),
    tags(
        (name = "game", description = "Game lifecycle and round operations"),
        (name = "sse", description = "Realtime game snapshot streams"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
