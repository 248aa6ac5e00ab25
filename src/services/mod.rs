/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Lobby browsing and empty-session collection.
pub mod lobby_service;
/// Client engine driving session transitions through the store.
pub mod session_service;
/// Session watch streams rendered as server-sent events.
pub mod watch_service;
