#[cfg(feature = "couch-store")]
pub mod couchdb;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{GameEntity, GameListItemEntity};
use crate::dao::storage::{CasToken, StorageResult, StoredGame};
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for game sessions.
///
/// `update_game` is a conditional write: it must fail with
/// [`StorageError::Conflict`](crate::dao::storage::StorageError::Conflict)
/// when `cas` no longer matches the stored revision, so the mutation layer
/// can re-read and retry instead of overwriting a concurrent commit.
pub trait GameStore: Send + Sync {
    /// Create a new game document, failing with a conflict if the id exists.
    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a game and the CAS token of the revision it was read at.
    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<StoredGame>>>;
    /// Replace a game document if and only if `cas` still matches.
    fn update_game(
        &self,
        game: GameEntity,
        cas: CasToken,
    ) -> BoxFuture<'static, StorageResult<CasToken>>;
    /// List games containing the given player, most recently updated first.
    fn games_for_player(
        &self,
        player_id: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
