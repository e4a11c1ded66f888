use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::MongoGameDocument,
};
use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameListItemEntity},
    storage::{CasToken, StorageError, StorageResult, StoredGame},
};

const GAME_COLLECTION_NAME: &str = "games";

/// MongoDB-backed game store using a per-document revision counter for
/// conditional writes.
#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.uri, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.uri, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;

        // membership queries for the "my games" listing
        let players_index = IndexModel::builder()
            .keys(doc! {"players.id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_players_idx".to_owned()))
                    .build(),
            )
            .build();
        collection
            .create_index(players_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAME_COLLECTION_NAME,
                index: "players.id",
                source,
            })?;

        // recency sort for the same listing
        let updated_index = IndexModel::builder()
            .keys(doc! {"updated_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_updated_idx".to_owned()))
                    .build(),
            )
            .build();
        collection
            .create_index(updated_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAME_COLLECTION_NAME,
                index: "updated_at",
                source,
            })?;

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoGameDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn insert_game(&self, game: GameEntity) -> StorageResult<()> {
        let id = game.id.clone();
        let document = MongoGameDocument::from_entity(game, 1);
        let collection = self.collection().await;

        match collection.insert_one(&document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StorageError::conflict(format!(
                "game `{id}` already exists"
            ))),
            Err(source) => Err(MongoDaoError::InsertGame { id, source }.into()),
        }
    }

    async fn find_game(&self, id: String) -> StorageResult<Option<StoredGame>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(doc! {"_id": &id})
            .await
            .map_err(|source| MongoDaoError::LoadGame {
                id: id.clone(),
                source,
            })?;

        Ok(document.map(|doc| {
            let (entity, revision) = doc.into_entity();
            StoredGame {
                entity,
                cas: CasToken(revision.to_string()),
            }
        }))
    }

    async fn update_game(&self, game: GameEntity, cas: CasToken) -> StorageResult<CasToken> {
        let id = game.id.clone();
        let expected: i64 = cas.0.parse().map_err(|_| {
            StorageError::from(MongoDaoError::InvalidRevision {
                id: id.clone(),
                revision: cas.0.clone(),
            })
        })?;

        let next = expected + 1;
        let document = MongoGameDocument::from_entity(game, next);
        let collection = self.collection().await;

        let result = collection
            .replace_one(doc! {"_id": &id, "revision": expected}, &document)
            .await
            .map_err(|source| MongoDaoError::SaveGame {
                id: id.clone(),
                source,
            })?;

        if result.matched_count == 0 {
            // either a concurrent writer bumped the revision or the document
            // vanished; both are conflicts from the caller's point of view
            return Err(StorageError::conflict(format!(
                "game `{id}` changed since it was read"
            )));
        }

        Ok(CasToken(next.to_string()))
    }

    async fn games_for_player(
        &self,
        player_id: String,
        limit: usize,
    ) -> StorageResult<Vec<GameListItemEntity>> {
        let collection = self.collection().await;

        let documents: Vec<MongoGameDocument> = collection
            .find(doc! {"players.id": &player_id})
            .sort(doc! {"updated_at": -1})
            .limit(limit as i64)
            .await
            .map_err(|source| MongoDaoError::ListGames {
                player_id: player_id.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames {
                player_id: player_id.clone(),
                source,
            })?;

        Ok(documents
            .into_iter()
            .map(|doc| {
                let (entity, _) = doc.into_entity();
                entity.into()
            })
            .collect())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11_000
    )
}

impl GameStore for MongoGameStore {
    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_game(game).await })
    }

    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<StoredGame>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await })
    }

    fn update_game(
        &self,
        game: GameEntity,
        cas: CasToken,
    ) -> BoxFuture<'static, StorageResult<CasToken>> {
        let store = self.clone();
        Box::pin(async move { store.update_game(game, cas).await })
    }

    fn games_for_player(
        &self,
        player_id: String,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.games_for_player(player_id, limit).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
