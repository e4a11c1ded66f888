use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::dto::sse::ServerEvent;

/// Capacity of each per-game broadcast channel. Slow subscribers that fall
/// further behind skip to newer snapshots; every snapshot is authoritative
/// so nothing is lost by coalescing.
const CHANNEL_CAPACITY: usize = 16;

/// Per-game fan-out of committed state snapshots.
///
/// Channels are created lazily on first subscription and dropped again once
/// a broadcast finds no remaining receivers, so idle games hold no memory.
#[derive(Debug, Default)]
pub struct GameWatchHub {
    channels: DashMap<String, broadcast::Sender<ServerEvent>>,
}

impl GameWatchHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for `game_id`, receiving every event broadcast
    /// after this call.
    pub fn subscribe(&self, game_id: &str) -> broadcast::Receiver<ServerEvent> {
        self.channels
            .entry(game_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Deliver `event` to every subscriber of `game_id`, pruning the channel
    /// when nobody is listening anymore.
    pub fn broadcast(&self, game_id: &str, event: ServerEvent) {
        let Some(sender) = self.channels.get(game_id).map(|entry| entry.value().clone()) else {
            return;
        };

        if sender.send(event).is_err() {
            self.channels
                .remove_if(game_id, |_, sender| sender.receiver_count() == 0);
        }
    }

    /// Number of games with at least one open channel.
    pub fn watched_games(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(data: &str) -> ServerEvent {
        ServerEvent {
            event: Some("game.snapshot".into()),
            data: data.to_string(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_broadcasts_for_their_game() {
        let hub = GameWatchHub::new();
        let mut rx = hub.subscribe("abc123");

        hub.broadcast("abc123", event("{\"round\":1}"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.data, "{\"round\":1}");
        assert_eq!(received.event.as_deref(), Some("game.snapshot"));
    }

    #[tokio::test]
    async fn games_are_isolated() {
        let hub = GameWatchHub::new();
        let mut rx_a = hub.subscribe("game-a");
        let _rx_b = hub.subscribe("game-b");

        hub.broadcast("game-b", event("b"));
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn abandoned_channels_are_pruned() {
        let hub = GameWatchHub::new();
        {
            let _rx = hub.subscribe("short-lived");
        }
        assert_eq!(hub.watched_games(), 1);

        hub.broadcast("short-lived", event("x"));
        assert_eq!(hub.watched_games(), 0);

        // broadcasting to a game nobody ever watched is a no-op
        hub.broadcast("never-watched", event("y"));
        assert_eq!(hub.watched_games(), 0);
    }
}
