use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{
    dto::sse::ServerEvent,
    error::AppError,
    services::{game_service, sse_events, sse_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/games/{id}/events",
    tag = "sse",
    params(("id" = String, Path, description = "Game code")),
    responses(
        (status = 200, description = "Game snapshot stream", content_type = "text/event-stream", body = String),
        (status = 404, description = "No such game")
    )
)]
/// Stream whole-game snapshots for one game: the current state on connect,
/// then every committed mutation.
pub async fn game_stream(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    // subscribe before the initial read so no committed update can slip
    // between the snapshot and the stream
    let receiver = sse_service::subscribe(&state, &id);
    let snapshot = game_service::get_game(&state, &id).await?;
    let initial = ServerEvent::json(
        Some(sse_events::EVENT_GAME_SNAPSHOT.to_string()),
        &snapshot,
    )
    .ok();

    info!(game_id = %id, "new game SSE connection");
    sse_events::broadcast_info(&state, &id, "game stream connected");
    Ok(sse_service::to_sse_stream(initial, receiver, id))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/games/{id}/events", get(game_stream))
}
