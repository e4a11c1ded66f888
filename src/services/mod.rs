/// OpenAPI documentation generation.
pub mod documentation;
/// Core game logic and the optimistic mutation protocol.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Best-effort notification dispatch.
pub mod notifier;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervision.
pub mod storage_supervisor;
