pub mod game;
pub mod machine;
pub mod prompts;
pub mod rate_limit;
pub mod watch;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    dao::game_store::GameStore,
    error::ServiceError,
    services::notifier::{LogNotifier, Notifier},
    state::{game::GameRules, prompts::PromptPool, rate_limit::RateLimiter, watch::GameWatchHub},
};

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the storage handle, realtime fan-out,
/// and the injected gameplay components.
pub struct AppState {
    config: AppConfig,
    game_store: RwLock<Option<Arc<dyn GameStore>>>,
    watch_hub: GameWatchHub,
    rate_limiter: RateLimiter,
    prompts: PromptPool,
    notifier: Arc<dyn Notifier>,
    degraded: tokio::sync::watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_notifier(config, Arc::new(LogNotifier))
    }

    /// Construct the state with a custom notification transport.
    pub fn with_notifier(config: AppConfig, notifier: Arc<dyn Notifier>) -> SharedState {
        let (degraded_tx, _rx) = tokio::sync::watch::channel(true);
        let rate_limiter = RateLimiter::new(config.rate_limits);
        let prompts = PromptPool::new(config.prompts.clone());

        Arc::new(Self {
            config,
            game_store: RwLock::new(None),
            watch_hub: GameWatchHub::new(),
            rate_limiter,
            prompts,
            notifier,
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration this instance was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session limits applied to newly created games.
    pub fn rules(&self) -> GameRules {
        self.config.rules
    }

    /// Obtain a handle to the current game store, if one is installed.
    pub async fn game_store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.game_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the game store or fail with a degraded-mode error.
    pub async fn require_game_store(&self) -> Result<Arc<dyn GameStore>, ServiceError> {
        self.game_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new game store implementation and leave degraded mode.
    pub async fn set_game_store(&self, store: Arc<dyn GameStore>) {
        {
            let mut guard = self.game_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current game store and enter degraded mode.
    pub async fn clear_game_store(&self) {
        {
            let mut guard = self.game_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.game_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> tokio::sync::watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast the degraded flag when it changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Per-game snapshot fan-out used by the SSE streams.
    pub fn watch_hub(&self) -> &GameWatchHub {
        &self.watch_hub
    }

    /// Guard spacing out create/join/submit invocations.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Prompt pool games draw from.
    pub fn prompt_pool(&self) -> &PromptPool {
        &self.prompts
    }

    /// Best-effort notification transport.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }
}
