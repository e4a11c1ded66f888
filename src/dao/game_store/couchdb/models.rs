use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CouchDaoError;
use crate::dao::models::{GameEntity, GameStatus, PlayerEntity, RoundEntity};

pub const GAME_PREFIX: &str = "game::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Body returned by CouchDB for a successful PUT, carrying the new `_rev`.
#[derive(Debug, Deserialize)]
pub struct PutResponse {
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

/// One game session as stored in CouchDB. The native `_rev` doubles as the
/// CAS token: a PUT with a stale revision is rejected with 409.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchGameDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub game: GameBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBody {
    pub name: String,
    pub host_id: String,
    pub players: Vec<PlayerEntity>,
    pub rounds: Vec<RoundEntity>,
    pub current_round: u32,
    pub status: GameStatus,
    pub max_players: u32,
    pub max_rounds: u32,
    pub max_score: u32,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl CouchGameDocument {
    /// Wrap an entity, attaching the revision for conditional updates.
    pub fn from_entity(game: GameEntity, rev: Option<String>) -> Self {
        Self {
            id: game_doc_id(&game.id),
            rev,
            game: GameBody {
                name: game.name,
                host_id: game.host_id,
                players: game.players,
                rounds: game.rounds,
                current_round: game.current_round,
                status: game.status,
                max_players: game.max_players,
                max_rounds: game.max_rounds,
                max_score: game.max_score,
                created_at: game.created_at,
                updated_at: game.updated_at,
            },
        }
    }

    /// Unwrap into the shared entity, recovering the game code from the
    /// prefixed document id.
    pub fn into_entity(self) -> Result<GameEntity, CouchDaoError> {
        let id = extract_game_id(&self.id)?;
        Ok(GameEntity {
            id,
            name: self.game.name,
            host_id: self.game.host_id,
            players: self.game.players,
            rounds: self.game.rounds,
            current_round: self.game.current_round,
            status: self.game.status,
            max_players: self.game.max_players,
            max_rounds: self.game.max_rounds,
            max_score: self.game.max_score,
            created_at: self.game.created_at,
            updated_at: self.game.updated_at,
        })
    }
}

pub fn game_doc_id(id: &str) -> String {
    format!("{GAME_PREFIX}{id}")
}

pub fn extract_game_id(doc_id: &str) -> Result<String, CouchDaoError> {
    doc_id
        .strip_prefix(GAME_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
        .ok_or(CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing game prefix",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_id_round_trips() {
        let doc_id = game_doc_id("abcd1234");
        assert_eq!(doc_id, "game::abcd1234");
        assert_eq!(extract_game_id(&doc_id).unwrap(), "abcd1234");
    }

    #[test]
    fn foreign_doc_ids_are_rejected() {
        assert!(extract_game_id("user::abcd1234").is_err());
        assert!(extract_game_id("game::").is_err());
        assert!(extract_game_id("abcd1234").is_err());
    }
}
