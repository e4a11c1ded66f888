use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::{
    dao::storage::StorageError,
    dto::game::{
        CreateGameRequest, CustomPromptRequest, GameListItem, GameSnapshot, JoinGameRequest,
        LeaveGameRequest, SelectWinnerRequest, SubmitGifRequest,
    },
    error::ServiceError,
    services::{
        notifier::{self, Notification},
        sse_events,
    },
    state::{
        SharedState,
        game::{Game, PlayerProfile, Prompt},
        machine::{GameError, JoinOutcome, LeaveOutcome, WinnerSelection},
        rate_limit::ActionClass,
    },
};

/// Conditional-write attempts before a transaction gives up with
/// [`ServiceError::Contention`].
const MAX_TXN_ATTEMPTS: u32 = 3;
/// Attempts at generating an unused game code before giving up.
const MAX_CODE_ATTEMPTS: u32 = 3;
/// Default number of rows returned by player game listings.
const DEFAULT_LIST_LIMIT: usize = 20;
/// Hard cap on player game listings.
const MAX_LIST_LIMIT: usize = 100;

/// Whether a mutation changed the document and must be written back.
enum Commit {
    Write,
    Skip,
}

/// Run one optimistic transaction against a game document.
///
/// The protocol every state change goes through: read the freshest document
/// and its CAS token, validate and apply the mutation against that state,
/// then write conditionally. A conflicting concurrent commit fails the write,
/// and the loop re-reads so the mutation is re-validated against the winner's
/// state; after [`MAX_TXN_ATTEMPTS`] losses the caller gets a retryable
/// contention error. Domain errors abort immediately and are never retried.
///
/// Exactly one document write happens per successful call (none when the
/// mutation reports [`Commit::Skip`]), followed by exactly one snapshot
/// broadcast to the game's subscribers.
async fn with_game_transaction<F>(
    state: &SharedState,
    game_id: &str,
    mut mutate: F,
) -> Result<Game, ServiceError>
where
    F: FnMut(&mut Game) -> Result<Commit, GameError>,
{
    let store = state.require_game_store().await?;

    let mut attempt = 0;
    loop {
        attempt += 1;

        let stored = store
            .find_game(game_id.to_string())
            .await?
            .ok_or_else(|| ServiceError::GameNotFound {
                id: game_id.to_string(),
            })?;

        let mut game: Game = stored.entity.into();
        match mutate(&mut game)? {
            Commit::Skip => return Ok(game),
            Commit::Write => {}
        }

        game.updated_at = SystemTime::now();
        match store.update_game(game.clone().into(), stored.cas).await {
            Ok(_) => {
                sse_events::broadcast_game_snapshot(state, &game);
                return Ok(game);
            }
            Err(StorageError::Conflict { .. }) if attempt < MAX_TXN_ATTEMPTS => {
                debug!(game_id, attempt, "conditional write lost the race; retrying");
            }
            Err(StorageError::Conflict { .. }) => {
                warn!(game_id, attempt, "transaction retries exhausted");
                return Err(ServiceError::Contention);
            }
            Err(other) => return Err(other.into()),
        }
    }
}

fn check_rate_limit(state: &SharedState, class: ActionClass) -> Result<(), ServiceError> {
    state
        .rate_limiter()
        .check_and_stamp(class)
        .map_err(|retry_after| ServiceError::RateLimited { retry_after })
}

/// Bootstrap a fresh game hosted by the requesting player.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameSnapshot, ServiceError> {
    check_rate_limit(state, ActionClass::Create)?;
    let store = state.require_game_store().await?;

    let host = PlayerProfile {
        id: request.host.id,
        name: request.host.name,
    };

    for _ in 0..MAX_CODE_ATTEMPTS {
        let game = Game::new(request.name.clone(), host.clone(), state.rules());
        match store.insert_game(game.clone().into()).await {
            Ok(()) => {
                info!(game_id = %game.id, host_id = %game.host_id, "game created");
                return Ok(game.into());
            }
            Err(StorageError::Conflict { .. }) => {
                // astronomically rare code collision; draw a fresh one
                warn!(game_id = %game.id, "game code already taken; regenerating");
            }
            Err(other) => return Err(other.into()),
        }
    }

    Err(ServiceError::Contention)
}

/// Fetch the current snapshot of a game. Resolving an invite link boils down
/// to this read followed by [`join_game`] with the viewer's identity.
pub async fn get_game(state: &SharedState, game_id: &str) -> Result<GameSnapshot, ServiceError> {
    let store = state.require_game_store().await?;
    let stored = store
        .find_game(game_id.to_string())
        .await?
        .ok_or_else(|| ServiceError::GameNotFound {
            id: game_id.to_string(),
        })?;

    Ok(Game::from(stored.entity).into())
}

/// Add a player to the roster, reactivating a departed seat when one exists.
pub async fn join_game(
    state: &SharedState,
    game_id: &str,
    request: JoinGameRequest,
) -> Result<GameSnapshot, ServiceError> {
    check_rate_limit(state, ActionClass::Join)?;

    let profile = PlayerProfile {
        id: request.player.id,
        name: request.player.name,
    };

    let game = with_game_transaction(state, game_id, |game| {
        Ok(match game.join(profile.clone())? {
            JoinOutcome::AlreadyActive => Commit::Skip,
            JoinOutcome::Added | JoinOutcome::Reactivated => Commit::Write,
        })
    })
    .await?;

    Ok(game.into())
}

/// Deactivate a player, transferring the host role when needed.
pub async fn leave_game(
    state: &SharedState,
    game_id: &str,
    request: LeaveGameRequest,
) -> Result<GameSnapshot, ServiceError> {
    let mut transferred: Option<String> = None;

    let game = with_game_transaction(state, game_id, |game| {
        Ok(match game.leave(&request.player_id)? {
            LeaveOutcome::AlreadyInactive => Commit::Skip,
            LeaveOutcome::Deactivated { new_host } => {
                transferred = new_host;
                Commit::Write
            }
        })
    })
    .await?;

    if let Some(new_host) = transferred {
        info!(game_id, new_host = %new_host, "host role transferred");
    }

    Ok(game.into())
}

/// Begin play: round 1, judged by the host, prompt drawn from the pool.
pub async fn start_game(state: &SharedState, game_id: &str) -> Result<GameSnapshot, ServiceError> {
    let prompt = state.prompt_pool().pick_random();

    let game = with_game_transaction(state, game_id, |game| {
        game.start(prompt.clone())?;
        Ok(Commit::Write)
    })
    .await?;

    info!(game_id, players = game.active_player_count(), "game started");
    Ok(game.into())
}

/// Reveal the current round's prompt, opening submissions.
pub async fn start_current_round(
    state: &SharedState,
    game_id: &str,
) -> Result<GameSnapshot, ServiceError> {
    let game = with_game_transaction(state, game_id, |game| {
        Ok(match game.start_round()? {
            true => Commit::Write,
            false => Commit::Skip,
        })
    })
    .await?;

    Ok(game.into())
}

/// Replace the current round's prompt with a judge-written one.
pub async fn set_custom_prompt(
    state: &SharedState,
    game_id: &str,
    request: CustomPromptRequest,
) -> Result<GameSnapshot, ServiceError> {
    let game = with_game_transaction(state, game_id, |game| {
        let judge_id = game
            .current_round()
            .map(|round| round.judge_id.clone())
            .ok_or(GameError::GameNotStarted)?;
        game.set_prompt(Prompt::custom(request.text.clone(), judge_id))?;
        Ok(Commit::Write)
    })
    .await?;

    Ok(game.into())
}

/// Swap the current round's prompt for a different pool draw.
pub async fn regenerate_prompt(
    state: &SharedState,
    game_id: &str,
) -> Result<GameSnapshot, ServiceError> {
    let game = with_game_transaction(state, game_id, |game| {
        let current_id = game
            .current_round()
            .map(|round| round.prompt.id.clone())
            .unwrap_or_default();
        game.set_prompt(state.prompt_pool().pick_different_from(&current_id))?;
        Ok(Commit::Write)
    })
    .await?;

    Ok(game.into())
}

/// Record a GIF submission for the current round.
pub async fn submit_gif(
    state: &SharedState,
    game_id: &str,
    request: SubmitGifRequest,
) -> Result<GameSnapshot, ServiceError> {
    check_rate_limit(state, ActionClass::Submit)?;

    let game = with_game_transaction(state, game_id, |game| {
        game.submit(
            &request.player_id,
            request.gif_id.clone(),
            request.gif_url.clone(),
        )?;
        Ok(Commit::Write)
    })
    .await?;

    Ok(game.into())
}

/// Close the current round with the judge's pick and run win detection.
pub async fn select_winner(
    state: &SharedState,
    game_id: &str,
    request: SelectWinnerRequest,
) -> Result<GameSnapshot, ServiceError> {
    let mut selection: Option<WinnerSelection> = None;

    let game = with_game_transaction(state, game_id, |game| {
        selection = Some(game.select_winner(&request.submission_id)?);
        Ok(Commit::Write)
    })
    .await?;

    if let Some(selection) = selection {
        notify_round_outcome(state, &game, &selection);
    }

    Ok(game.into())
}

/// Rotate the judge and append the next round.
pub async fn start_next_round(
    state: &SharedState,
    game_id: &str,
) -> Result<GameSnapshot, ServiceError> {
    let prompt = state.prompt_pool().pick_random();

    let game = with_game_transaction(state, game_id, |game| {
        game.start_next_round(prompt.clone())?;
        Ok(Commit::Write)
    })
    .await?;

    info!(game_id, round = game.current_round, "next round started");
    Ok(game.into())
}

/// List games the player participates in, most recently updated first.
pub async fn games_for_player(
    state: &SharedState,
    player_id: &str,
    limit: Option<usize>,
) -> Result<Vec<GameListItem>, ServiceError> {
    let store = state.require_game_store().await?;
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);

    let items = store
        .games_for_player(player_id.to_string(), limit)
        .await?;

    Ok(items.into_iter().map(Into::into).collect())
}

/// Fire best-effort notifications for a judged round. Never blocks or fails
/// the already-committed mutation.
fn notify_round_outcome(state: &SharedState, game: &Game, selection: &WinnerSelection) {
    let notifier = state.notifier();

    notifier::dispatch(
        notifier.clone(),
        vec![selection.winner_id.clone()],
        Notification {
            title: "You won the round!".into(),
            body: format!(
                "Your GIF took round {} of \"{}\"",
                game.current_round, game.name
            ),
            game_id: game.id.clone(),
        },
    );

    if selection.game_completed {
        let recipients = game
            .active_players()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        notifier::dispatch(
            notifier,
            recipients,
            Notification {
                title: "Game over".into(),
                body: format!(
                    "{} wins \"{}\" with {} points",
                    selection.winner_name, game.name, selection.winner_score
                ),
                game_id: game.id.clone(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use dashmap::DashMap;
    use futures::future::BoxFuture;

    use crate::{
        config::AppConfig,
        dao::{
            game_store::GameStore,
            models::{GameEntity, GameListItemEntity},
            storage::{CasToken, StorageResult, StoredGame},
        },
        dto::game::PlayerProfileInput,
        services::notifier::{Notifier, NotifyError},
        state::{AppState, rate_limit::RateLimitWindows},
    };

    /// In-memory store with the same conditional-write contract as the real
    /// backends: a revision counter per document, compared on every update.
    #[derive(Clone, Default)]
    struct MemoryStore {
        inner: Arc<MemoryStoreInner>,
    }

    #[derive(Default)]
    struct MemoryStoreInner {
        games: DashMap<String, (u64, GameEntity)>,
        /// Updates to fail with a conflict before letting writes through.
        inject_conflicts: AtomicU32,
    }

    impl MemoryStore {
        fn inject_conflicts(&self, count: u32) {
            self.inner.inject_conflicts.store(count, Ordering::SeqCst);
        }
    }

    impl GameStore for MemoryStore {
        fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
            let store = self.clone();
            Box::pin(async move {
                use dashmap::mapref::entry::Entry;
                match store.inner.games.entry(game.id.clone()) {
                    Entry::Occupied(_) => Err(StorageError::conflict("id exists")),
                    Entry::Vacant(slot) => {
                        slot.insert((1, game));
                        Ok(())
                    }
                }
            })
        }

        fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<StoredGame>>> {
            let store = self.clone();
            Box::pin(async move {
                Ok(store.inner.games.get(&id).map(|entry| {
                    let (revision, entity) = entry.value();
                    StoredGame {
                        entity: entity.clone(),
                        cas: CasToken(revision.to_string()),
                    }
                }))
            })
        }

        fn update_game(
            &self,
            game: GameEntity,
            cas: CasToken,
        ) -> BoxFuture<'static, StorageResult<CasToken>> {
            let store = self.clone();
            Box::pin(async move {
                let pending = &store.inner.inject_conflicts;
                if pending.load(Ordering::SeqCst) > 0 {
                    pending.fetch_sub(1, Ordering::SeqCst);
                    return Err(StorageError::conflict("injected"));
                }

                use dashmap::mapref::entry::Entry;
                match store.inner.games.entry(game.id.clone()) {
                    Entry::Occupied(mut slot) => {
                        let (revision, _) = slot.get();
                        if revision.to_string() != cas.0 {
                            return Err(StorageError::conflict("revision mismatch"));
                        }
                        let next = revision + 1;
                        slot.insert((next, game));
                        Ok(CasToken(next.to_string()))
                    }
                    Entry::Vacant(_) => Err(StorageError::conflict("missing document")),
                }
            })
        }

        fn games_for_player(
            &self,
            player_id: String,
            limit: usize,
        ) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>> {
            let store = self.clone();
            Box::pin(async move {
                let mut items: Vec<GameListItemEntity> = store
                    .inner
                    .games
                    .iter()
                    .filter(|entry| entry.value().1.players.iter().any(|p| p.id == player_id))
                    .map(|entry| entry.value().1.clone().into())
                    .collect();
                items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                items.truncate(limit);
                Ok(items)
            })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    struct RecordingNotifier {
        delivered: Arc<std::sync::Mutex<Vec<(String, String)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn deliver(
            &self,
            recipient: String,
            notification: Notification,
        ) -> BoxFuture<'static, Result<(), NotifyError>> {
            let delivered = self.delivered.clone();
            Box::pin(async move {
                delivered
                    .lock()
                    .unwrap()
                    .push((recipient, notification.title));
                Ok(())
            })
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            rate_limits: RateLimitWindows::disabled(),
            ..AppConfig::default()
        }
    }

    async fn test_state() -> (crate::state::SharedState, MemoryStore) {
        let state = AppState::new(test_config());
        let store = MemoryStore::default();
        state.set_game_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn profile(id: &str) -> PlayerProfileInput {
        PlayerProfileInput {
            id: id.to_string(),
            name: id.to_uppercase(),
        }
    }

    fn create_request(name: &str, host: &str) -> CreateGameRequest {
        CreateGameRequest {
            name: name.to_string(),
            host: profile(host),
        }
    }

    fn join_request(player: &str) -> JoinGameRequest {
        JoinGameRequest {
            player: profile(player),
        }
    }

    fn submit_request(player: &str, gif: &str) -> SubmitGifRequest {
        SubmitGifRequest {
            player_id: player.to_string(),
            gif_id: gif.to_string(),
            gif_url: format!("https://media.example/{gif}.gif"),
        }
    }

    /// Drive a game to the point where submissions are open.
    async fn running_game(state: &crate::state::SharedState) -> String {
        let snapshot = create_game(state, create_request("friday", "alice"))
            .await
            .unwrap();
        let id = snapshot.id;
        join_game(state, &id, join_request("bob")).await.unwrap();
        join_game(state, &id, join_request("carol")).await.unwrap();
        start_game(state, &id).await.unwrap();
        start_current_round(state, &id).await.unwrap();
        id
    }

    #[tokio::test]
    async fn create_join_start_flow() {
        let (state, _store) = test_state().await;

        let created = create_game(&state, create_request("friday", "alice"))
            .await
            .unwrap();
        assert_eq!(created.players.len(), 1);
        assert_eq!(created.host_id, "alice");

        let joined = join_game(&state, &created.id, join_request("bob"))
            .await
            .unwrap();
        assert_eq!(joined.players.len(), 2);

        let started = start_game(&state, &created.id).await.unwrap();
        assert_eq!(started.current_round, 1);
        assert_eq!(started.rounds.len(), 1);
        assert_eq!(started.rounds[0].judge_id, "alice");
        assert!(!started.rounds[0].has_started);
    }

    #[tokio::test]
    async fn operations_fail_in_degraded_mode() {
        let state = AppState::new(test_config());

        let err = create_game(&state, create_request("friday", "alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }

    #[tokio::test]
    async fn join_unknown_game_is_not_found() {
        let (state, _store) = test_state().await;

        let err = join_game(&state, "nope1234", join_request("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::GameNotFound { .. }));
    }

    #[tokio::test]
    async fn rejoining_active_player_commits_nothing() {
        let (state, store) = test_state().await;
        let created = create_game(&state, create_request("friday", "alice"))
            .await
            .unwrap();
        join_game(&state, &created.id, join_request("bob"))
            .await
            .unwrap();

        let revision_before = store.inner.games.get(&created.id).unwrap().0;
        let snapshot = join_game(&state, &created.id, join_request("bob"))
            .await
            .unwrap();

        assert_eq!(snapshot.players.len(), 2);
        let revision_after = store.inner.games.get(&created.id).unwrap().0;
        assert_eq!(revision_before, revision_after);
    }

    #[tokio::test]
    async fn create_is_rate_limited() {
        let config = AppConfig {
            rate_limits: RateLimitWindows {
                create: Duration::from_secs(60),
                join: Duration::ZERO,
                submit: Duration::ZERO,
            },
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        state
            .set_game_store(Arc::new(MemoryStore::default()))
            .await;

        create_game(&state, create_request("one", "alice"))
            .await
            .unwrap();
        let err = create_game(&state, create_request("two", "alice"))
            .await
            .unwrap_err();

        match err {
            ServiceError::RateLimited { retry_after } => {
                assert!(retry_after > Duration::ZERO);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn concurrent_submits_yield_exactly_one_success() {
        let (state, _store) = test_state().await;
        let id = running_game(&state).await;

        let first = submit_gif(&state, &id, submit_request("bob", "g1"));
        let second = submit_gif(&state, &id, submit_request("bob", "g2"));
        let (a, b) = tokio::join!(first, second);

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(
            failure,
            ServiceError::Game(GameError::AlreadySubmitted)
        ));

        let snapshot = get_game(&state, &id).await.unwrap();
        assert_eq!(snapshot.rounds[0].submissions.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_winner_picks_close_the_round_once() {
        let (state, _store) = test_state().await;
        let id = running_game(&state).await;

        submit_gif(&state, &id, submit_request("bob", "g1"))
            .await
            .unwrap();
        submit_gif(&state, &id, submit_request("carol", "g2"))
            .await
            .unwrap();

        let snapshot = get_game(&state, &id).await.unwrap();
        let sub_a = snapshot.rounds[0].submissions[0].id.clone();
        let sub_b = snapshot.rounds[0].submissions[1].id.clone();

        let pick_a = select_winner(
            &state,
            &id,
            SelectWinnerRequest {
                submission_id: sub_a,
            },
        );
        let pick_b = select_winner(
            &state,
            &id,
            SelectWinnerRequest {
                submission_id: sub_b,
            },
        );
        let (a, b) = tokio::join!(pick_a, pick_b);

        assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);
        let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(
            failure,
            ServiceError::Game(GameError::RoundAlreadyJudged)
        ));

        let snapshot = get_game(&state, &id).await.unwrap();
        assert!(snapshot.rounds[0].is_complete);
        assert!(snapshot.rounds[0].winning_submission.is_some());
    }

    #[tokio::test]
    async fn lost_writes_are_retried_against_fresh_state() {
        let (state, store) = test_state().await;
        let created = create_game(&state, create_request("friday", "alice"))
            .await
            .unwrap();

        store.inject_conflicts(2);
        let snapshot = join_game(&state, &created.id, join_request("bob"))
            .await
            .unwrap();

        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(store.inner.inject_conflicts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_contention() {
        let (state, store) = test_state().await;
        let created = create_game(&state, create_request("friday", "alice"))
            .await
            .unwrap();

        store.inject_conflicts(100);
        let err = join_game(&state, &created.id, join_request("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Contention));
    }

    #[tokio::test]
    async fn committed_mutations_broadcast_snapshots() {
        let (state, _store) = test_state().await;
        let created = create_game(&state, create_request("friday", "alice"))
            .await
            .unwrap();

        let mut rx = state.watch_hub().subscribe(&created.id);
        join_game(&state, &created.id, join_request("bob"))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("game.snapshot"));
        assert!(event.data.contains("\"bob\""));
    }

    #[tokio::test]
    async fn winning_the_game_notifies_players() {
        let delivered = Arc::new(std::sync::Mutex::new(Vec::new()));
        let config = AppConfig {
            rules: crate::state::game::GameRules {
                max_score: 1,
                ..Default::default()
            },
            rate_limits: RateLimitWindows::disabled(),
            prompts: Vec::new(),
        };
        let state = AppState::with_notifier(
            config,
            Arc::new(RecordingNotifier {
                delivered: delivered.clone(),
            }),
        );
        state
            .set_game_store(Arc::new(MemoryStore::default()))
            .await;

        let id = running_game(&state).await;
        submit_gif(&state, &id, submit_request("bob", "g1"))
            .await
            .unwrap();
        let snapshot = get_game(&state, &id).await.unwrap();
        let submission_id = snapshot.rounds[0].submissions[0].id.clone();

        let finished = select_winner(&state, &id, SelectWinnerRequest { submission_id })
            .await
            .unwrap();
        assert!(matches!(
            finished.status,
            crate::dao::models::GameStatus::Completed
        ));

        tokio::time::sleep(Duration::from_millis(30)).await;
        let delivered = delivered.lock().unwrap();
        // round-won note to bob, game-over note to every active player
        assert!(
            delivered
                .iter()
                .any(|(to, title)| to == "bob" && title == "You won the round!")
        );
        assert!(
            delivered
                .iter()
                .any(|(to, title)| to == "alice" && title == "Game over")
        );
    }

    #[tokio::test]
    async fn prompt_regeneration_changes_the_prompt() {
        let (state, _store) = test_state().await;
        let id = running_game(&state).await;

        let before = get_game(&state, &id).await.unwrap();
        let prompt_before = before.rounds[0].prompt.id.clone();

        let after = regenerate_prompt(&state, &id).await.unwrap();
        assert_ne!(after.rounds[0].prompt.id, prompt_before);
    }

    #[tokio::test]
    async fn custom_prompt_is_tagged_with_the_judge() {
        let (state, _store) = test_state().await;
        let id = running_game(&state).await;

        let snapshot = set_custom_prompt(
            &state,
            &id,
            CustomPromptRequest {
                text: "when the retro runs long".into(),
            },
        )
        .await
        .unwrap();

        let prompt = &snapshot.rounds[0].prompt;
        assert!(prompt.id.starts_with("custom-"));
        assert_eq!(prompt.created_by.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn player_listing_is_recency_ordered_and_bounded() {
        let (state, _store) = test_state().await;

        let first = create_game(&state, create_request("first", "alice"))
            .await
            .unwrap();
        let second = create_game(&state, create_request("second", "alice"))
            .await
            .unwrap();

        // touch the first game so it becomes the most recent
        join_game(&state, &first.id, join_request("bob"))
            .await
            .unwrap();

        let items = games_for_player(&state, "alice", None).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, first.id);
        assert_eq!(items[1].id, second.id);

        let capped = games_for_player(&state, "alice", Some(1)).await.unwrap();
        assert_eq!(capped.len(), 1);

        let none = games_for_player(&state, "mallory", None).await.unwrap();
        assert!(none.is_empty());
    }
}
