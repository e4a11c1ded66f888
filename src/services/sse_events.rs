use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{game::GameSnapshot, sse::ServerEvent},
    state::{SharedState, game::Game},
};

/// Event name carrying the full authoritative game state.
pub const EVENT_GAME_SNAPSHOT: &str = "game.snapshot";
/// Event name for human-readable stream messages.
pub const EVENT_INFO: &str = "info";

/// Broadcast the whole-game snapshot to every subscriber of the game.
///
/// Propagation is deliberately snapshot-based: no diffing, each delivered
/// payload replaces whatever the client had. Subscribers that lag simply
/// skip to a newer snapshot.
pub fn broadcast_game_snapshot(state: &SharedState, game: &Game) {
    let snapshot: GameSnapshot = game.clone().into();
    send_game_event(state, &game.id, EVENT_GAME_SNAPSHOT, &snapshot);
}

/// Send a human-readable info message onto a game's stream.
pub fn broadcast_info(state: &SharedState, game_id: &str, message: &str) {
    state.watch_hub().broadcast(
        game_id,
        ServerEvent::new(Some(EVENT_INFO.to_string()), message.to_string()),
    );
}

fn send_game_event(state: &SharedState, game_id: &str, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.watch_hub().broadcast(game_id, event),
        Err(err) => warn!(game_id, event, error = %err, "failed to serialize SSE payload"),
    }
}
