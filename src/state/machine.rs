use thiserror::Error;

use crate::dao::models::GameStatus;
use crate::state::game::{Game, GifSubmission, PlayerProfile, Prompt, Round};

/// Minimum number of active players required to start a game.
pub const MIN_ACTIVE_PLAYERS: usize = 2;

/// Error returned when a game operation violates one of its preconditions.
///
/// These are deterministic domain failures: callers must surface them to the
/// user and never retry them automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is full")]
    GameFull,
    #[error("game has already ended")]
    GameEnded,
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("game has not started yet")]
    GameNotStarted,
    #[error("game is already completed")]
    GameCompleted,
    #[error("at least {required} active players are needed")]
    InsufficientPlayers { required: usize },
    #[error("player `{id}` is not an active member of this game")]
    PlayerNotFound { id: String },
    #[error("the judge cannot submit a gif")]
    JudgeCannotSubmit,
    #[error("player already submitted a gif in this round")]
    AlreadySubmitted,
    #[error("submission `{id}` not found in the current round")]
    SubmissionNotFound { id: String },
    #[error("the judge has not revealed the prompt yet")]
    RoundNotStarted,
    #[error("the current round has already been judged")]
    RoundAlreadyJudged,
}

/// How a join request was absorbed into the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A brand-new seat was appended.
    Added,
    /// A previously departed player was reactivated in place.
    Reactivated,
    /// The player was already active; nothing changed.
    AlreadyActive,
}

/// How a leave request was absorbed into the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The player was deactivated; when they were the host, the id of the
    /// active player the host role moved to.
    Deactivated { new_host: Option<String> },
    /// The player had already left; nothing changed.
    AlreadyInactive,
}

/// Result of a winner selection, used for notifications and responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerSelection {
    /// Id of the winning player.
    pub winner_id: String,
    /// Display name of the winning player at selection time.
    pub winner_name: String,
    /// The winner's score after the increment.
    pub winner_score: u32,
    /// Whether this selection ended the game.
    pub game_completed: bool,
}

impl Game {
    /// Add `profile` to the roster, reactivating them if they left earlier.
    ///
    /// Joining an already-active player is an idempotent no-op so a reused
    /// invite link never errors or duplicates a seat.
    pub fn join(&mut self, profile: PlayerProfile) -> Result<JoinOutcome, GameError> {
        if self.status == GameStatus::Completed {
            return Err(GameError::GameEnded);
        }

        let seats_left = self.active_player_count() < self.max_players as usize;
        let current_judge = self.current_round().map(|round| round.judge_id.clone());

        if let Some(player) = self.player_mut(&profile.id) {
            if player.is_active {
                return Ok(JoinOutcome::AlreadyActive);
            }
            if !seats_left {
                return Err(GameError::GameFull);
            }
            player.is_active = true;
            player.name = profile.name;
            // the round's judge_id is authoritative; a stale flag from a
            // round judged before leaving must not survive the rejoin
            player.is_judge = current_judge.as_deref() == Some(player.id.as_str());
            return Ok(JoinOutcome::Reactivated);
        }

        if !seats_left {
            return Err(GameError::GameFull);
        }

        self.players.push(crate::state::game::Player {
            id: profile.id,
            name: profile.name,
            is_host: false,
            is_judge: false,
            score: 0,
            is_active: true,
        });

        Ok(JoinOutcome::Added)
    }

    /// Deactivate `player_id`, transferring the host role to the first
    /// remaining active player when the host leaves.
    ///
    /// Deactivation and host transfer happen in the same mutation so the game
    /// is never observable without a host while active players remain.
    pub fn leave(&mut self, player_id: &str) -> Result<LeaveOutcome, GameError> {
        let Some(player) = self.player_mut(player_id) else {
            return Err(GameError::PlayerNotFound {
                id: player_id.to_string(),
            });
        };

        if !player.is_active {
            return Ok(LeaveOutcome::AlreadyInactive);
        }

        let was_host = player.is_host;
        player.is_active = false;
        player.is_host = false;

        let mut new_host = None;
        if was_host {
            if let Some(successor) = self.players.iter_mut().find(|p| p.is_active) {
                successor.is_host = true;
                self.host_id = successor.id.clone();
                new_host = Some(successor.id.clone());
            }
        }

        Ok(LeaveOutcome::Deactivated { new_host })
    }

    /// Begin play: round 1 is judged by the host and starts hidden.
    pub fn start(&mut self, prompt: Prompt) -> Result<(), GameError> {
        match self.status {
            GameStatus::Waiting => {}
            GameStatus::Playing => return Err(GameError::GameAlreadyStarted),
            GameStatus::Completed => return Err(GameError::GameEnded),
        }

        if self.active_player_count() < MIN_ACTIVE_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                required: MIN_ACTIVE_PLAYERS,
            });
        }

        let judge_id = self.host_id.clone();
        if self.player(&judge_id).is_none() {
            return Err(GameError::PlayerNotFound { id: judge_id });
        }

        for player in &mut self.players {
            player.is_judge = player.id == judge_id;
        }

        self.rounds.push(Round::new(1, judge_id, prompt));
        self.current_round = 1;
        self.status = GameStatus::Playing;

        Ok(())
    }

    /// Reveal the current round's prompt, opening it for submissions.
    ///
    /// Returns `false` without changing anything when the round is already
    /// open, so a double-tap on the reveal button stays harmless.
    pub fn start_round(&mut self) -> Result<bool, GameError> {
        self.ensure_playing()?;

        let round = self
            .current_round_mut()
            .ok_or(GameError::GameNotStarted)?;

        if round.has_started {
            return Ok(false);
        }

        round.has_started = true;
        Ok(true)
    }

    /// Replace the current round's prompt. Allowed until the round is judged.
    pub fn set_prompt(&mut self, prompt: Prompt) -> Result<(), GameError> {
        self.ensure_playing()?;

        let round = self
            .current_round_mut()
            .ok_or(GameError::GameNotStarted)?;

        if round.is_complete {
            return Err(GameError::RoundAlreadyJudged);
        }

        round.prompt = prompt;
        Ok(())
    }

    /// Record a submission for the current round.
    pub fn submit(
        &mut self,
        player_id: &str,
        gif_id: String,
        gif_url: String,
    ) -> Result<GifSubmission, GameError> {
        self.ensure_playing()?;

        let round_id = {
            let round = self.current_round().ok_or(GameError::GameNotStarted)?;
            if !round.has_started {
                return Err(GameError::RoundNotStarted);
            }
            if round.is_complete {
                return Err(GameError::RoundAlreadyJudged);
            }
            if round.judge_id == player_id {
                return Err(GameError::JudgeCannotSubmit);
            }
            if round.has_submission_from(player_id) {
                return Err(GameError::AlreadySubmitted);
            }
            round.id
        };

        let submission = {
            let player = self
                .player(player_id)
                .filter(|p| p.is_active)
                .ok_or_else(|| GameError::PlayerNotFound {
                    id: player_id.to_string(),
                })?;
            GifSubmission::new(gif_id, gif_url, player, round_id)
        };

        let round = self
            .current_round_mut()
            .ok_or(GameError::GameNotStarted)?;
        round.submissions.push(submission.clone());

        Ok(submission)
    }

    /// Close the current round: mark the winning submission, credit the
    /// winner, and complete the game when a termination condition is met.
    ///
    /// Win detection runs exactly once, right after the score increment:
    /// the game completes when the winner reached `max_score` or this was
    /// the last allowed round, whichever comes first.
    pub fn select_winner(&mut self, submission_id: &str) -> Result<WinnerSelection, GameError> {
        self.ensure_playing()?;

        let current_round = self.current_round;
        let max_score = self.max_score;
        let max_rounds = self.max_rounds;

        let winning = {
            let round = self
                .current_round_mut()
                .ok_or(GameError::GameNotStarted)?;

            if round.is_complete {
                return Err(GameError::RoundAlreadyJudged);
            }

            let winning = round
                .submission(submission_id)
                .cloned()
                .ok_or_else(|| GameError::SubmissionNotFound {
                    id: submission_id.to_string(),
                })?;

            round.winning_submission = Some(winning.clone());
            round.is_complete = true;
            winning
        };

        let winner = self
            .player_mut(&winning.player_id)
            .ok_or_else(|| GameError::PlayerNotFound {
                id: winning.player_id.clone(),
            })?;
        winner.score += 1;

        let winner_id = winner.id.clone();
        let winner_name = winner.name.clone();
        let winner_score = winner.score;

        let game_completed = winner_score >= max_score || current_round >= max_rounds;
        if game_completed {
            self.status = GameStatus::Completed;
        }

        Ok(WinnerSelection {
            winner_id,
            winner_name,
            winner_score,
            game_completed,
        })
    }

    /// Rotate the judge role and append the next round.
    pub fn start_next_round(&mut self, prompt: Prompt) -> Result<(), GameError> {
        match self.status {
            GameStatus::Playing => {}
            GameStatus::Completed => return Err(GameError::GameCompleted),
            GameStatus::Waiting => return Err(GameError::GameNotStarted),
        }

        let next_judge = self.next_judge_id()?;

        for player in &mut self.players {
            player.is_judge = player.id == next_judge;
        }

        let next_round = self.current_round + 1;
        self.rounds.push(Round::new(next_round, next_judge, prompt));
        self.current_round = next_round;

        Ok(())
    }

    /// The active player who judges the next round.
    ///
    /// Rotation walks the active-player list in join order, wrapping past the
    /// end. When the current judge already left the game their position can
    /// no longer be found, and rotation restarts at the first active player
    /// by join order.
    fn next_judge_id(&self) -> Result<String, GameError> {
        let active = self.active_players();
        if active.is_empty() {
            return Err(GameError::InsufficientPlayers {
                required: MIN_ACTIVE_PLAYERS,
            });
        }

        let current_judge = self
            .current_round()
            .map(|round| round.judge_id.clone())
            .unwrap_or_default();

        let next_index = active
            .iter()
            .position(|p| p.id == current_judge)
            .map(|index| (index + 1) % active.len())
            .unwrap_or(0);

        Ok(active[next_index].id.clone())
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Playing => Ok(()),
            GameStatus::Waiting => Err(GameError::GameNotStarted),
            GameStatus::Completed => Err(GameError::GameCompleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::GameRules;

    fn profile(id: &str) -> PlayerProfile {
        PlayerProfile {
            id: id.to_string(),
            name: id.to_uppercase(),
        }
    }

    fn prompt(id: &str) -> Prompt {
        Prompt {
            id: id.to_string(),
            text: format!("prompt {id}"),
            category: None,
            created_by: None,
        }
    }

    fn new_game() -> Game {
        Game::new("friday night".into(), profile("alice"), GameRules::default())
    }

    /// Game with alice (host) and bob, started, round 1 revealed.
    fn running_game() -> Game {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.start(prompt("p1")).unwrap();
        game.start_round().unwrap();
        game
    }

    #[test]
    fn creation_seats_host_as_judge() {
        let game = new_game();
        assert_eq!(game.status, GameStatus::Waiting);
        assert_eq!(game.current_round, 0);
        assert_eq!(game.host_id, "alice");
        assert_eq!(game.id.len(), 8);

        let host = game.player("alice").unwrap();
        assert!(host.is_host);
        assert!(host.is_judge);
        assert!(host.is_active);
        assert_eq!(host.score, 0);
    }

    #[test]
    fn start_requires_two_active_players() {
        let mut game = new_game();
        assert_eq!(
            game.start(prompt("p1")),
            Err(GameError::InsufficientPlayers { required: 2 })
        );
        assert_eq!(game.status, GameStatus::Waiting);
        assert!(game.rounds.is_empty());
    }

    #[test]
    fn start_creates_hidden_first_round_judged_by_host() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.start(prompt("p1")).unwrap();

        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.current_round, 1);
        let round = game.current_round().unwrap();
        assert_eq!(round.judge_id, "alice");
        assert!(!round.has_started);
        assert!(!round.is_complete);
        assert!(game.player("alice").unwrap().is_judge);
        assert!(!game.player("bob").unwrap().is_judge);
    }

    #[test]
    fn start_twice_fails() {
        let mut game = running_game();
        assert_eq!(game.start(prompt("p2")), Err(GameError::GameAlreadyStarted));
    }

    #[test]
    fn join_when_full() {
        let mut game = Game::new(
            "tiny".into(),
            profile("alice"),
            GameRules {
                max_players: 2,
                ..GameRules::default()
            },
        );
        game.join(profile("bob")).unwrap();
        assert_eq!(game.join(profile("carol")), Err(GameError::GameFull));
        assert_eq!(game.players.len(), 2);
    }

    #[test]
    fn join_is_idempotent_for_active_players() {
        let mut game = new_game();
        assert_eq!(game.join(profile("bob")).unwrap(), JoinOutcome::Added);
        assert_eq!(
            game.join(profile("bob")).unwrap(),
            JoinOutcome::AlreadyActive
        );
        assert_eq!(game.players.len(), 2);
    }

    #[test]
    fn join_reactivates_departed_player_in_place() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.leave("bob").unwrap();
        assert!(!game.player("bob").unwrap().is_active);

        assert_eq!(
            game.join(profile("bob")).unwrap(),
            JoinOutcome::Reactivated
        );
        assert_eq!(game.players.len(), 2);
        assert!(game.player("bob").unwrap().is_active);
    }

    #[test]
    fn rejoining_judge_flags_follow_the_current_round() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();
        game.start(prompt("p1")).unwrap();
        game.start_round().unwrap();

        // the round-1 judge leaves mid-round and rejoins the same round
        game.leave("alice").unwrap();
        game.join(profile("alice")).unwrap();
        assert!(game.player("alice").unwrap().is_judge);

        // a round later she is no longer judging, so a rejoin clears the flag
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        game.select_winner(&sub.id).unwrap();
        game.start_next_round(prompt("p2")).unwrap();
        game.leave("alice").unwrap();
        game.join(profile("alice")).unwrap();

        assert!(!game.player("alice").unwrap().is_judge);
        assert_eq!(
            game.players.iter().filter(|p| p.is_active && p.is_judge).count(),
            1
        );
    }

    #[test]
    fn join_completed_game_fails() {
        let mut game = running_game();
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        // max_score 5 not reached, force completion via round cap
        game.max_rounds = 1;
        game.select_winner(&sub.id).unwrap();
        assert_eq!(game.status, GameStatus::Completed);

        assert_eq!(game.join(profile("carol")), Err(GameError::GameEnded));
    }

    #[test]
    fn leave_unknown_player_fails() {
        let mut game = new_game();
        assert_eq!(
            game.leave("ghost"),
            Err(GameError::PlayerNotFound { id: "ghost".into() })
        );
    }

    #[test]
    fn leave_is_idempotent_for_inactive_players() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.leave("bob").unwrap();
        assert_eq!(game.leave("bob").unwrap(), LeaveOutcome::AlreadyInactive);
    }

    #[test]
    fn host_leaving_transfers_host_in_one_step() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();

        let outcome = game.leave("alice").unwrap();
        assert_eq!(
            outcome,
            LeaveOutcome::Deactivated {
                new_host: Some("bob".into())
            }
        );
        assert_eq!(game.host_id, "bob");
        assert!(game.player("bob").unwrap().is_host);
        assert!(!game.player("alice").unwrap().is_host);
        assert!(!game.player("alice").unwrap().is_active);
        // the departed host stays on the roster for history integrity
        assert_eq!(game.players.len(), 3);
        // exactly one host remains
        assert_eq!(game.players.iter().filter(|p| p.is_host).count(), 1);
    }

    #[test]
    fn last_player_leaving_leaves_no_host() {
        let mut game = new_game();
        let outcome = game.leave("alice").unwrap();
        assert_eq!(outcome, LeaveOutcome::Deactivated { new_host: None });
        assert_eq!(game.active_player_count(), 0);
    }

    #[test]
    fn submit_before_reveal_is_rejected() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.start(prompt("p1")).unwrap();

        assert_eq!(
            game.submit("bob", "g1".into(), "https://gif/1".into())
                .unwrap_err(),
            GameError::RoundNotStarted
        );
    }

    #[test]
    fn start_round_reveals_once() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.start(prompt("p1")).unwrap();

        assert!(game.start_round().unwrap());
        assert!(game.current_round().unwrap().has_started);
        // second reveal is a no-op, not an error
        assert!(!game.start_round().unwrap());
    }

    #[test]
    fn judge_cannot_submit() {
        let mut game = running_game();
        assert_eq!(
            game.submit("alice", "g1".into(), "https://gif/1".into())
                .unwrap_err(),
            GameError::JudgeCannotSubmit
        );
    }

    #[test]
    fn duplicate_submission_is_rejected() {
        let mut game = running_game();
        game.submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        assert_eq!(
            game.submit("bob", "g2".into(), "https://gif/2".into())
                .unwrap_err(),
            GameError::AlreadySubmitted
        );

        let round = game.current_round().unwrap();
        assert_eq!(round.submissions.len(), 1);
        assert_eq!(round.submissions[0].gif_id, "g1");
    }

    #[test]
    fn submission_snapshots_player_name_and_round() {
        let mut game = running_game();
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        assert_eq!(sub.player_name, "BOB");
        assert_eq!(sub.round, 1);
    }

    #[test]
    fn unknown_or_inactive_submitter_is_rejected() {
        let mut game = running_game();
        assert_eq!(
            game.submit("ghost", "g1".into(), "https://gif/1".into())
                .unwrap_err(),
            GameError::PlayerNotFound { id: "ghost".into() }
        );

        game.join(profile("carol")).unwrap();
        game.leave("carol").unwrap();
        assert_eq!(
            game.submit("carol", "g1".into(), "https://gif/1".into())
                .unwrap_err(),
            GameError::PlayerNotFound { id: "carol".into() }
        );
    }

    #[test]
    fn select_winner_credits_score_and_closes_round() {
        let mut game = running_game();
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();

        let selection = game.select_winner(&sub.id).unwrap();
        assert_eq!(selection.winner_id, "bob");
        assert_eq!(selection.winner_score, 1);
        assert!(!selection.game_completed);

        let round = game.current_round().unwrap();
        assert!(round.is_complete);
        assert_eq!(
            round.winning_submission.as_ref().unwrap().gif_id,
            "g1"
        );
        assert_eq!(game.player("bob").unwrap().score, 1);
        assert_eq!(game.status, GameStatus::Playing);
    }

    #[test]
    fn select_winner_twice_fails_with_round_already_judged() {
        let mut game = running_game();
        game.join(profile("carol")).unwrap();
        let sub_bob = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        let sub_carol = game
            .submit("carol", "g2".into(), "https://gif/2".into())
            .unwrap();

        game.select_winner(&sub_bob.id).unwrap();
        // the loser of a judging race observes the closed round, no overwrite
        assert_eq!(
            game.select_winner(&sub_carol.id).unwrap_err(),
            GameError::RoundAlreadyJudged
        );
        assert_eq!(
            game.current_round()
                .unwrap()
                .winning_submission
                .as_ref()
                .unwrap()
                .id,
            sub_bob.id
        );
        assert_eq!(game.player("carol").unwrap().score, 0);
    }

    #[test]
    fn select_winner_unknown_submission_fails() {
        let mut game = running_game();
        assert_eq!(
            game.select_winner("nope").unwrap_err(),
            GameError::SubmissionNotFound { id: "nope".into() }
        );
        assert!(!game.current_round().unwrap().is_complete);
    }

    #[test]
    fn reaching_max_score_completes_the_game() {
        let mut game = new_game();
        game.max_score = 1;
        game.join(profile("bob")).unwrap();
        game.start(prompt("p1")).unwrap();
        game.start_round().unwrap();

        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        let selection = game.select_winner(&sub.id).unwrap();

        assert!(selection.game_completed);
        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(
            game.start_next_round(prompt("p2")).unwrap_err(),
            GameError::GameCompleted
        );
    }

    #[test]
    fn exhausting_rounds_completes_the_game() {
        let mut game = new_game();
        game.max_rounds = 2;
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();
        game.start(prompt("p1")).unwrap();
        game.start_round().unwrap();

        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        assert!(!game.select_winner(&sub.id).unwrap().game_completed);

        game.start_next_round(prompt("p2")).unwrap();
        game.start_round().unwrap();
        let sub = game
            .submit("carol", "g2".into(), "https://gif/2".into())
            .unwrap();
        let selection = game.select_winner(&sub.id).unwrap();

        assert!(selection.game_completed);
        assert_eq!(game.status, GameStatus::Completed);
    }

    #[test]
    fn judge_rotates_through_active_players_in_join_order() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();
        game.start(prompt("p1")).unwrap();
        assert_eq!(game.current_round().unwrap().judge_id, "alice");

        game.start_next_round(prompt("p2")).unwrap();
        assert_eq!(game.current_round().unwrap().judge_id, "bob");
        assert!(game.player("bob").unwrap().is_judge);
        assert!(!game.player("alice").unwrap().is_judge);

        game.start_next_round(prompt("p3")).unwrap();
        assert_eq!(game.current_round().unwrap().judge_id, "carol");

        // wraps back to the first active player
        game.start_next_round(prompt("p4")).unwrap();
        assert_eq!(game.current_round().unwrap().judge_id, "alice");
        assert_eq!(game.current_round, 4);
        assert_eq!(game.rounds.len(), 4);
    }

    #[test]
    fn rotation_skips_inactive_players() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();
        game.start(prompt("p1")).unwrap();
        game.leave("bob").unwrap();

        game.start_next_round(prompt("p2")).unwrap();
        assert_eq!(game.current_round().unwrap().judge_id, "carol");
    }

    #[test]
    fn rotation_restarts_at_first_active_when_judge_left() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();
        game.start(prompt("p1")).unwrap();
        // alice judges round 1, then leaves mid-round
        game.leave("alice").unwrap();

        game.start_next_round(prompt("p2")).unwrap();
        // her position is gone, so rotation restarts at the first active
        // player by join order
        assert_eq!(game.current_round().unwrap().judge_id, "bob");
    }

    #[test]
    fn custom_prompt_replaces_pool_prompt() {
        let mut game = running_game();
        let judge_id = game.current_round().unwrap().judge_id.clone();
        let custom = Prompt::custom("when the demo works".into(), judge_id.clone());
        let custom_id = custom.id.clone();

        game.set_prompt(custom).unwrap();

        let round = game.current_round().unwrap();
        assert_eq!(round.prompt.id, custom_id);
        assert!(round.prompt.id.starts_with("custom-"));
        assert_eq!(round.prompt.created_by.as_deref(), Some(judge_id.as_str()));
    }

    #[test]
    fn prompt_is_frozen_after_judging() {
        let mut game = running_game();
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        game.select_winner(&sub.id).unwrap();

        assert_eq!(
            game.set_prompt(prompt("p9")).unwrap_err(),
            GameError::RoundAlreadyJudged
        );
    }

    #[test]
    fn completed_rounds_are_never_mutated_by_later_play() {
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();
        game.start(prompt("p1")).unwrap();
        game.start_round().unwrap();
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        game.select_winner(&sub.id).unwrap();

        let first_round = game.rounds[0].clone();
        game.start_next_round(prompt("p2")).unwrap();
        game.start_round().unwrap();
        game.submit("carol", "g2".into(), "https://gif/2".into())
            .unwrap();

        assert_eq!(game.rounds[0], first_round);
    }

    #[test]
    fn status_never_regresses() {
        let mut game = running_game();
        game.max_score = 1;
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        game.select_winner(&sub.id).unwrap();
        assert_eq!(game.status, GameStatus::Completed);

        assert_eq!(game.start(prompt("p2")), Err(GameError::GameEnded));
        assert_eq!(game.start_round().unwrap_err(), GameError::GameCompleted);
        assert_eq!(
            game.start_next_round(prompt("p2")).unwrap_err(),
            GameError::GameCompleted
        );
        assert_eq!(game.status, GameStatus::Completed);
    }

    #[test]
    fn no_round_submissions_come_from_its_judge() {
        // exercise a couple of rounds, then verify the invariant globally
        let mut game = new_game();
        game.join(profile("bob")).unwrap();
        game.join(profile("carol")).unwrap();
        game.start(prompt("p1")).unwrap();
        game.start_round().unwrap();
        let sub = game
            .submit("bob", "g1".into(), "https://gif/1".into())
            .unwrap();
        game.select_winner(&sub.id).unwrap();
        game.start_next_round(prompt("p2")).unwrap();
        game.start_round().unwrap();
        game.submit("alice", "g2".into(), "https://gif/2".into())
            .unwrap();
        game.submit("carol", "g3".into(), "https://gif/3".into())
            .unwrap();

        for round in &game.rounds {
            assert!(
                round
                    .submissions
                    .iter()
                    .all(|s| s.player_id != round.judge_id)
            );
        }
    }
}
