use std::time::SystemTime;

use rand::Rng;
use uuid::Uuid;

use crate::dao::models::{
    GameEntity, GameStatus, GifSubmissionEntity, PlayerEntity, PromptEntity, RoundEntity,
};

/// Length of the public game code used as document key and invite token.
const GAME_CODE_LENGTH: usize = 8;
/// Alphabet for game codes; ambiguous glyphs (0/o, 1/l) are left out so the
/// code survives being read aloud at a party.
const GAME_CODE_ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyz23456789";

/// Session limits fixed at game creation.
#[derive(Debug, Clone, Copy)]
pub struct GameRules {
    /// Maximum number of simultaneously active players.
    pub max_players: u32,
    /// The game completes once this many rounds have been played.
    pub max_rounds: u32,
    /// The game completes once a player reaches this score.
    pub max_score: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_players: 8,
            max_rounds: 10,
            max_score: 5,
        }
    }
}

/// Opaque identity handed over by the identity provider after sign-in.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    /// Stable user id; never re-derived by this service.
    pub id: String,
    /// Display name chosen by the user.
    pub name: String,
}

/// Player info tracked during a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identity-provider id, unique within the game.
    pub id: String,
    /// Display name, mutable after join.
    pub name: String,
    /// Host flag; exactly one player holds it while the roster is non-empty.
    pub is_host: bool,
    /// Judge flag for the round in play.
    pub is_judge: bool,
    /// Rounds won so far.
    pub score: u32,
    /// False once the player left the game.
    pub is_active: bool,
}

/// Prompt shown to players for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Pool id or `custom-<uuid>` for judge-written prompts.
    pub id: String,
    /// The prompt text itself.
    pub text: String,
    /// Optional grouping label.
    pub category: Option<String>,
    /// Judge id for custom prompts, absent for pool draws.
    pub created_by: Option<String>,
}

impl Prompt {
    /// Build a judge-written prompt with a fresh id and a `created_by` tag.
    pub fn custom(text: String, judge_id: String) -> Self {
        Self {
            id: format!("custom-{}", Uuid::new_v4().simple()),
            text,
            category: None,
            created_by: Some(judge_id),
        }
    }
}

/// A player's GIF entry for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifSubmission {
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

impl GifSubmission {
    /// Build a submission for `player`, snapshotting their display name.
    pub fn new(gif_id: String, gif_url: String, player: &Player, round: u32) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            gif_id,
            gif_url,
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            round,
        }
    }
}

/// One prompt/submission/judging cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// 1-based sequence number.
    pub id: u32,
    /// Active prompt; replaceable until the round completes.
    pub prompt: Prompt,
    /// Player excluded from submitting, fixed at round creation.
    pub judge_id: String,
    /// Submissions received so far, at most one per player.
    pub submissions: Vec<GifSubmission>,
    /// Set exactly once when the judge picks the winner.
    pub winning_submission: Option<GifSubmission>,
    /// Flips false to true exactly once.
    pub is_complete: bool,
    /// False until the judge reveals the prompt to the table.
    pub has_started: bool,
}

impl Round {
    /// Build a fresh round awaiting its prompt reveal.
    pub fn new(id: u32, judge_id: String, prompt: Prompt) -> Self {
        Self {
            id,
            prompt,
            judge_id,
            submissions: Vec::new(),
            winning_submission: None,
            is_complete: false,
            has_started: false,
        }
    }

    /// Look up a submission by its id.
    pub fn submission(&self, id: &str) -> Option<&GifSubmission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    /// Whether `player_id` already submitted in this round.
    pub fn has_submission_from(&self, player_id: &str) -> bool {
        self.submissions.iter().any(|s| s.player_id == player_id)
    }
}

/// Aggregated state for one game session. The whole session is one document
/// so that the mutation layer can commit every transition atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Short alphanumeric code; document key and public invite token.
    pub id: String,
    /// Display name of the game.
    pub name: String,
    /// Identifier of the current host.
    pub host_id: String,
    /// Participating players in join order.
    pub players: Vec<Player>,
    /// Append-only round history.
    pub rounds: Vec<Round>,
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

impl Game {
    /// Build a new waiting game hosted by `host`, who also judges round 1.
    pub fn new(name: String, host: PlayerProfile, rules: GameRules) -> Self {
        let timestamp = SystemTime::now();

        Self {
            id: generate_game_code(),
            name,
            host_id: host.id.clone(),
            players: vec![Player {
                id: host.id,
                name: host.name,
                is_host: true,
                is_judge: true,
                score: 0,
                is_active: true,
            }],
            rounds: Vec::new(),
            current_round: 0,
            status: GameStatus::Waiting,
            max_players: rules.max_players,
            max_rounds: rules.max_rounds,
            max_score: rules.max_score,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Players currently participating, in join order.
    pub fn active_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_active).collect()
    }

    /// Number of currently active players.
    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active).count()
    }

    /// Look up a player by id, active or not.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The round currently in play, if any.
    pub fn current_round(&self) -> Option<&Round> {
        self.current_round
            .checked_sub(1)
            .and_then(|index| self.rounds.get(index as usize))
    }

    pub(crate) fn current_round_mut(&mut self) -> Option<&mut Round> {
        self.current_round
            .checked_sub(1)
            .and_then(|index| self.rounds.get_mut(index as usize))
    }
}

/// Generate a fresh random game code.
fn generate_game_code() -> String {
    let mut rng = rand::rng();
    (0..GAME_CODE_LENGTH)
        .map(|_| {
            let index = rng.random_range(0..GAME_CODE_ALPHABET.len());
            GAME_CODE_ALPHABET[index] as char
        })
        .collect()
}

impl From<PromptEntity> for Prompt {
    fn from(value: PromptEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            category: value.category,
            created_by: value.created_by,
        }
    }
}

impl From<Prompt> for PromptEntity {
    fn from(value: Prompt) -> Self {
        Self {
            id: value.id,
            text: value.text,
            category: value.category,
            created_by: value.created_by,
        }
    }
}

impl From<GifSubmissionEntity> for GifSubmission {
    fn from(value: GifSubmissionEntity) -> Self {
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

impl From<GifSubmission> for GifSubmissionEntity {
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

impl From<RoundEntity> for Round {
    fn from(value: RoundEntity) -> Self {
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

impl From<Round> for RoundEntity {
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

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
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

impl From<Player> for PlayerEntity {
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

impl From<GameEntity> for Game {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            host_id: value.host_id,
            players: value.players.into_iter().map(Into::into).collect(),
            rounds: value.rounds.into_iter().map(Into::into).collect(),
            current_round: value.current_round,
            status: value.status,
            max_players: value.max_players,
            max_rounds: value.max_rounds,
            max_score: value.max_score,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Game> for GameEntity {
    fn from(value: Game) -> Self {
        Self {
            id: value.id,
            name: value.name,
            host_id: value.host_id,
            players: value.players.into_iter().map(Into::into).collect(),
            rounds: value.rounds.into_iter().map(Into::into).collect(),
            current_round: value.current_round,
            status: value.status,
            max_players: value.max_players,
            max_rounds: value.max_rounds,
            max_score: value.max_score,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
