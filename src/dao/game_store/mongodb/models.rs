use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::dao::models::{GameEntity, GameStatus, PlayerEntity, RoundEntity};

/// Document shape stored in the games collection, keyed by the game code.
///
/// The `revision` counter increments on every committed write and backs the
/// CAS token: replace operations filter on `{_id, revision}` so a stale
/// writer matches nothing instead of clobbering a concurrent commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub revision: i64,
    pub name: String,
    pub host_id: String,
    pub players: Vec<PlayerEntity>,
    pub rounds: Vec<RoundEntity>,
    pub current_round: u32,
    pub status: GameStatus,
    pub max_players: u32,
    pub max_rounds: u32,
    pub max_score: u32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl MongoGameDocument {
    /// Wrap an entity at the given revision.
    pub fn from_entity(game: GameEntity, revision: i64) -> Self {
        Self {
            id: game.id,
            revision,
            name: game.name,
            host_id: game.host_id,
            players: game.players,
            rounds: game.rounds,
            current_round: game.current_round,
            status: game.status,
            max_players: game.max_players,
            max_rounds: game.max_rounds,
            max_score: game.max_score,
            created_at: DateTime::from_system_time(game.created_at),
            updated_at: DateTime::from_system_time(game.updated_at),
        }
    }

    /// Unwrap into the shared entity plus the revision it was stored at.
    pub fn into_entity(self) -> (GameEntity, i64) {
        let revision = self.revision;
        let entity = GameEntity {
            id: self.id,
            name: self.name,
            host_id: self.host_id,
            players: self.players,
            rounds: self.rounds,
            current_round: self.current_round,
            status: self.status,
            max_players: self.max_players,
            max_rounds: self.max_rounds,
            max_score: self.max_score,
            created_at: self.created_at.to_system_time(),
            updated_at: self.updated_at.to_system_time(),
        };
        (entity, revision)
    }
}
