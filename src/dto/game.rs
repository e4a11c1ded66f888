use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{GameListItemEntity, GameStatus, PlayerBriefEntity},
    dto::{format_system_time, validation::validate_player_id},
    state::game::{Game, GifSubmission, Player, Prompt, Round},
};

/// Identity triple presented by a signed-in client.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerProfileInput {
    /// Opaque identity-provider id.
    pub id: String,
    /// Display name chosen by the user.
    pub name: String,
}

impl Validate for PlayerProfileInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_player_id(&self.id) {
            errors.add("id", e);
        }

        if self.name.trim().is_empty() || self.name.chars().count() > 32 {
            errors.add("name", ValidationError::new("invalid_name"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload used to bootstrap a brand-new game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Display name of the game.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// The creating player; becomes host and round-1 judge.
    #[validate(nested)]
    pub host: PlayerProfileInput,
}

/// Payload used to join (or rejoin) a game through an invite link.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinGameRequest {
    /// The joining player.
    #[validate(nested)]
    pub player: PlayerProfileInput,
}

/// Payload used to leave a game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LeaveGameRequest {
    /// The departing player.
    #[validate(length(min = 1, max = 128))]
    pub player_id: String,
}

/// Payload carrying a GIF submission for the current round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitGifRequest {
    /// The submitting player.
    #[validate(length(min = 1, max = 128))]
    pub player_id: String,
    /// Provider id of the chosen media.
    #[validate(length(min = 1, max = 128))]
    pub gif_id: String,
    /// Renderable URL of the chosen media.
    #[validate(url)]
    pub gif_url: String,
}

/// Payload naming the winning submission of the current round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SelectWinnerRequest {
    /// Id of the winning submission.
    #[validate(length(min = 1, max = 64))]
    pub submission_id: String,
}

/// Payload carrying a judge-written prompt for the current round.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CustomPromptRequest {
    /// The prompt text shown to players.
    #[validate(length(min = 1, max = 200))]
    pub text: String,
}

/// Full authoritative view of a game, returned by REST reads and pushed on
/// every committed mutation over SSE.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSnapshot {
    pub id: String,
    pub name: String,
    pub host_id: String,
    pub status: GameStatus,
    pub current_round: u32,
    pub max_players: u32,
    pub max_rounds: u32,
    pub max_score: u32,
    pub created_at: String,
    pub updated_at: String,
    pub players: Vec<PlayerSnapshot>,
    pub rounds: Vec<RoundSnapshot>,
}

/// Public projection of a player.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSnapshot {
    pub id: String,
    pub name: String,
    pub is_host: bool,
    pub is_judge: bool,
    pub score: u32,
    pub is_active: bool,
}

/// Public projection of a round, including its full submission history.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundSnapshot {
    pub id: u32,
    pub prompt: PromptSnapshot,
    pub judge_id: String,
    pub submissions: Vec<SubmissionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_submission: Option<SubmissionSnapshot>,
    pub is_complete: bool,
    pub has_started: bool,
}

/// Public projection of a prompt.
#[derive(Debug, Serialize, ToSchema)]
pub struct PromptSnapshot {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Public projection of a submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionSnapshot {
    pub id: String,
    pub gif_id: String,
    pub gif_url: String,
    pub player_id: String,
    pub player_name: String,
    pub round: u32,
}

/// Row of the "my games" listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameListItem {
    pub id: String,
    pub name: String,
    pub status: GameStatus,
    pub players: Vec<PlayerBrief>,
    pub current_round: u32,
    pub updated_at: String,
}

/// Minimal player projection used in listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerBrief {
    pub id: String,
    pub name: String,
}

impl From<Prompt> for PromptSnapshot {
    fn from(value: Prompt) -> Self {
        Self {
            id: value.id,
            text: value.text,
            category: value.category,
            created_by: value.created_by,
        }
    }
}

impl From<GifSubmission> for SubmissionSnapshot {
    fn from(value: GifSubmission) -> Self {
        Self {
            id: value.id,
            gif_id: value.gif_id,
            gif_url: value.gif_url,
            player_id: value.player_id,
            player_name: value.player_name,
            round: value.round,
        }
    }
}

impl From<Player> for PlayerSnapshot {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            is_host: value.is_host,
            is_judge: value.is_judge,
            score: value.score,
            is_active: value.is_active,
        }
    }
}

impl From<Round> for RoundSnapshot {
    fn from(value: Round) -> Self {
        Self {
            id: value.id,
            prompt: value.prompt.into(),
            judge_id: value.judge_id,
            submissions: value.submissions.into_iter().map(Into::into).collect(),
            winning_submission: value.winning_submission.map(Into::into),
            is_complete: value.is_complete,
            has_started: value.has_started,
        }
    }
}

impl From<Game> for GameSnapshot {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            name: game.name,
            host_id: game.host_id,
            status: game.status,
            current_round: game.current_round,
            max_players: game.max_players,
            max_rounds: game.max_rounds,
            max_score: game.max_score,
            created_at: format_system_time(game.created_at),
            updated_at: format_system_time(game.updated_at),
            players: game.players.into_iter().map(Into::into).collect(),
            rounds: game.rounds.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PlayerBriefEntity> for PlayerBrief {
    fn from(value: PlayerBriefEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<GameListItemEntity> for GameListItem {
    fn from(entity: GameListItemEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            status: entity.status,
            players: entity.players.into_iter().map(Into::into).collect(),
            current_round: entity.current_round,
            updated_at: format_system_time(entity.updated_at),
        }
    }
}
