use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_valid::Valid;
use serde::Deserialize;

use crate::{
    dto::game::{
        CreateGameRequest, CustomPromptRequest, GameListItem, GameSnapshot, JoinGameRequest,
        LeaveGameRequest, SelectWinnerRequest, SubmitGifRequest,
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes covering the whole game lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/leave", post(leave_game))
        .route("/games/{id}/start", post(start_game))
        .route("/games/{id}/round/start", post(start_round))
        .route("/games/{id}/round/prompt", post(set_custom_prompt))
        .route("/games/{id}/round/prompt/regenerate", post(regenerate_prompt))
        .route("/games/{id}/round/submissions", post(submit_gif))
        .route("/games/{id}/round/winner", post(select_winner))
        .route("/games/{id}/round/next", post(start_next_round))
        .route("/players/{player_id}/games", get(games_for_player))
}

/// Query parameters accepted by the player game listing.
#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
}

/// Create a fresh game hosted by the requesting player.
#[utoipa::path(
    post,
    path = "/games",
    tag = "game",
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameSnapshot),
        (status = 429, description = "Creation rate limit hit")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateGameRequest>>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::create_game(&state, payload).await?;
    Ok(Json(snapshot))
}

/// Fetch the current snapshot of a game (also the invite resolution step).
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    responses(
        (status = 200, description = "Current game state", body = GameSnapshot),
        (status = 404, description = "No such game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::get_game(&state, &id).await?;
    Ok(Json(snapshot))
}

/// Join a game, reactivating a departed seat when one exists.
#[utoipa::path(
    post,
    path = "/games/{id}/join",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    request_body = JoinGameRequest,
    responses(
        (status = 200, description = "Roster after the join", body = GameSnapshot),
        (status = 409, description = "Game full or already ended")
    )
)]
pub async fn join_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<JoinGameRequest>>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::join_game(&state, &id, payload).await?;
    Ok(Json(snapshot))
}

/// Leave a game; the host role transfers if the host departs.
#[utoipa::path(
    post,
    path = "/games/{id}/leave",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    request_body = LeaveGameRequest,
    responses(
        (status = 200, description = "Roster after the departure", body = GameSnapshot)
    )
)]
pub async fn leave_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<LeaveGameRequest>>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::leave_game(&state, &id, payload).await?;
    Ok(Json(snapshot))
}

/// Start the game once enough players gathered.
#[utoipa::path(
    post,
    path = "/games/{id}/start",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    responses(
        (status = 200, description = "Round 1 created", body = GameSnapshot),
        (status = 409, description = "Not enough active players")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::start_game(&state, &id).await?;
    Ok(Json(snapshot))
}

/// Reveal the current round's prompt, opening submissions.
#[utoipa::path(
    post,
    path = "/games/{id}/round/start",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    responses(
        (status = 200, description = "Round opened for submissions", body = GameSnapshot)
    )
)]
pub async fn start_round(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::start_current_round(&state, &id).await?;
    Ok(Json(snapshot))
}

/// Replace the current round's prompt with a judge-written one.
#[utoipa::path(
    post,
    path = "/games/{id}/round/prompt",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    request_body = CustomPromptRequest,
    responses(
        (status = 200, description = "Prompt replaced", body = GameSnapshot),
        (status = 409, description = "Round already judged")
    )
)]
pub async fn set_custom_prompt(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<CustomPromptRequest>>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::set_custom_prompt(&state, &id, payload).await?;
    Ok(Json(snapshot))
}

/// Swap the current round's prompt for a different pool draw.
#[utoipa::path(
    post,
    path = "/games/{id}/round/prompt/regenerate",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    responses(
        (status = 200, description = "Prompt replaced", body = GameSnapshot)
    )
)]
pub async fn regenerate_prompt(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::regenerate_prompt(&state, &id).await?;
    Ok(Json(snapshot))
}

/// Submit a GIF for the current round.
#[utoipa::path(
    post,
    path = "/games/{id}/round/submissions",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    request_body = SubmitGifRequest,
    responses(
        (status = 200, description = "Submission recorded", body = GameSnapshot),
        (status = 409, description = "Already submitted, judge, or round closed")
    )
)]
pub async fn submit_gif(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<SubmitGifRequest>>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::submit_gif(&state, &id, payload).await?;
    Ok(Json(snapshot))
}

/// Pick the round winner and run win detection.
#[utoipa::path(
    post,
    path = "/games/{id}/round/winner",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    request_body = SelectWinnerRequest,
    responses(
        (status = 200, description = "Round judged", body = GameSnapshot),
        (status = 404, description = "Submission not found"),
        (status = 409, description = "Round already judged")
    )
)]
pub async fn select_winner(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<SelectWinnerRequest>>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::select_winner(&state, &id, payload).await?;
    Ok(Json(snapshot))
}

/// Rotate the judge and open the next round.
#[utoipa::path(
    post,
    path = "/games/{id}/round/next",
    tag = "game",
    params(("id" = String, Path, description = "Game code")),
    responses(
        (status = 200, description = "Next round created", body = GameSnapshot),
        (status = 409, description = "Game already completed")
    )
)]
pub async fn start_next_round(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::start_next_round(&state, &id).await?;
    Ok(Json(snapshot))
}

/// List the games a player participates in, most recent first.
#[utoipa::path(
    get,
    path = "/players/{player_id}/games",
    tag = "game",
    params(
        ("player_id" = String, Path, description = "Identity-provider id"),
        ("limit" = Option<usize>, Query, description = "Maximum rows to return")
    ),
    responses(
        (status = 200, description = "Games containing the player", body = [GameListItem])
    )
)]
pub async fn games_for_player(
    State(state): State<SharedState>,
    Path(player_id): Path<String>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<Vec<GameListItem>>, AppError> {
    let items = game_service::games_for_player(&state, &player_id, query.limit).await?;
    Ok(Json(items))
}
