use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{info, warn};

/// Payload handed to a notification transport.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Short headline, e.g. "Round over".
    pub title: String,
    /// Human-readable body.
    pub body: String,
    /// Game the notification refers to, for deep links.
    pub game_id: String,
}

/// Error raised by a notification transport. Always logged, never surfaced.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Best-effort delivery of game events to a recipient.
///
/// Implementations wrap external transports (push, SMS, email). Delivery is
/// explicitly allowed to fail: the game mutation has already committed by
/// the time a notification goes out, and a lost notification must never
/// fail or roll back game state.
pub trait Notifier: Send + Sync {
    /// Deliver `notification` to `recipient`.
    fn deliver(
        &self,
        recipient: String,
        notification: Notification,
    ) -> BoxFuture<'static, Result<(), NotifyError>>;
}

/// Default sink that records delivery intent in the logs.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(
        &self,
        recipient: String,
        notification: Notification,
    ) -> BoxFuture<'static, Result<(), NotifyError>> {
        Box::pin(async move {
            info!(
                recipient = %recipient,
                game_id = %notification.game_id,
                title = %notification.title,
                "notification"
            );
            Ok(())
        })
    }
}

/// Fan a notification out to `recipients` on background tasks.
///
/// Fire-and-forget: failures are logged at warn level and swallowed, so
/// notification transports can never block or fail a game-state mutation.
pub fn dispatch(notifier: Arc<dyn Notifier>, recipients: Vec<String>, notification: Notification) {
    for recipient in recipients {
        let notifier = notifier.clone();
        let payload = notification.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.deliver(recipient.clone(), payload).await {
                warn!(recipient = %recipient, error = %err, "notification delivery failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    struct RecordingNotifier {
        delivered: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn deliver(
            &self,
            recipient: String,
            _notification: Notification,
        ) -> BoxFuture<'static, Result<(), NotifyError>> {
            let delivered = self.delivered.clone();
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    return Err(NotifyError("transport down".into()));
                }
                delivered.lock().unwrap().push(recipient);
                Ok(())
            })
        }
    }

    fn note() -> Notification {
        Notification {
            title: "Round over".into(),
            body: "bob won".into(),
            game_id: "abc123".into(),
        }
    }

    #[tokio::test]
    async fn dispatch_reaches_every_recipient() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let notifier = Arc::new(RecordingNotifier {
            delivered: delivered.clone(),
            fail: false,
        });

        dispatch(notifier, vec!["alice".into(), "bob".into()], note());

        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut seen = delivered.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[tokio::test]
    async fn delivery_failures_are_swallowed() {
        let notifier = Arc::new(RecordingNotifier {
            delivered: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        });

        // must not panic or propagate
        dispatch(notifier, vec!["alice".into()], note());
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
