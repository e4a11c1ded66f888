/// Game requests and snapshot payloads.
pub mod game;
/// Health check payloads.
pub mod health;
/// Server-Sent Events payloads.
pub mod sse;
/// Custom field validators shared by request DTOs.
pub mod validation;

use std::time::SystemTime;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Format a system time as RFC 3339 for DTO payloads.
pub fn format_system_time(value: SystemTime) -> String {
    OffsetDateTime::from(value)
        .format(&Rfc3339)
        .unwrap_or_default()
}
