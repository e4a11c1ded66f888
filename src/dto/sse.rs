use serde::Serialize;

#[derive(Clone, Debug)]
/// Dispatched payload carried across a game's SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name (`game.snapshot`, `info`).
    pub event: Option<String>,
    /// Pre-serialized event body.
    pub data: String,
}

impl ServerEvent {
    /// Build an event with a plain-text payload.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}
