use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;

/// Lifecycle status of a game session. Strictly forward: a game never leaves
/// `completed` and never returns to `waiting`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Lobby state: players can gather, no round exists yet.
    Waiting,
    /// Rounds are being played.
    Playing,
    /// A player reached the score cap or the round cap was exhausted.
    Completed,
}

/// Aggregate game entity persisted by the storage layer. The whole session
/// lives in one document so every mutation commits atomically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Short alphanumeric code; document key and public invite token.
    pub id: String,
    /// Display name of the game, not validated for uniqueness.
    pub name: String,
    /// Identifier of the current host; reassigned when the host leaves.
    pub host_id: String,
    /// Participating players in join order. Players are deactivated on
    /// leave, never removed, so submission history stays resolvable.
    pub players: Vec<PlayerEntity>,
    /// Append-only round history; index `i` holds round `i + 1`.
    pub rounds: Vec<RoundEntity>,
    /// 1-based index of the round in play; 0 before the game starts.
    pub current_round: u32,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Seat cap fixed at creation.
    pub max_players: u32,
    /// Round cap fixed at creation.
    pub max_rounds: u32,
    /// Score cap fixed at creation.
    pub max_score: u32,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Refreshed on every committed mutation.
    pub updated_at: SystemTime,
}

/// Player embedded in a game document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identity-provider id, unique within the game.
    pub id: String,
    /// Display name, mutable after join.
    pub name: String,
    /// Exactly one player holds this flag while the roster is non-empty.
    pub is_host: bool,
    /// Exactly one active player holds this flag during play.
    pub is_judge: bool,
    /// Rounds won so far.
    pub score: u32,
    /// False once the player left; inactive players are skipped by judge
    /// rotation and player counts.
    pub is_active: bool,
}

/// One prompt/submission/judging cycle embedded in a game document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundEntity {
    /// 1-based sequence number, equal to its position + 1 in `rounds`.
    pub id: u32,
    /// Active prompt; replaceable until the round completes.
    pub prompt: PromptEntity,
    /// Player excluded from submitting, fixed at round creation.
    pub judge_id: String,
    /// Submissions received so far, at most one per player.
    pub submissions: Vec<GifSubmissionEntity>,
    /// Set exactly once when the judge picks the winner.
    pub winning_submission: Option<GifSubmissionEntity>,
    /// Flips false to true exactly once, never reverts.
    pub is_complete: bool,
    /// False until the judge reveals the prompt; submissions are rejected
    /// while false.
    pub has_started: bool,
}

/// A player's GIF entry for one round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GifSubmissionEntity {
    /// Unique id for this submission.
    pub id: String,
    /// Provider id of the media, stored verbatim.
    pub gif_id: String,
    /// Renderable URL of the media, stored verbatim.
    pub gif_url: String,
    /// Submitter id.
    pub player_id: String,
    /// Denormalized submitter name captured at submission time.
    pub player_name: String,
    /// Back-reference to the round id for history views.
    pub round: u32,
}

/// Prompt shown to players for one round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptEntity {
    /// Pool id (`p1`, `p2`, ...) or `custom-<uuid>` for judge-written ones.
    pub id: String,
    /// The prompt text itself.
    pub text: String,
    /// Optional grouping label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Judge id for custom prompts, absent for pool draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Subset of [`GameEntity`] returned by player-scoped listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameListItemEntity {
    /// Primary key of the game.
    pub id: String,
    /// Display name of the game.
    pub name: String,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Participating players, reduced to id and name.
    pub players: Vec<PlayerBriefEntity>,
    /// 1-based index of the round in play.
    pub current_round: u32,
    /// Last time the game entity was updated.
    pub updated_at: SystemTime,
}

/// Minimal player projection used in listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerBriefEntity {
    /// Stable identifier for the player.
    pub id: String,
    /// Display name chosen by the player.
    pub name: String,
}

impl From<PlayerEntity> for PlayerBriefEntity {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<GameEntity> for GameListItemEntity {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            status: entity.status,
            players: entity.players.into_iter().map(Into::into).collect(),
            current_round: entity.current_round,
            updated_at: entity.updated_at,
        }
    }
}
