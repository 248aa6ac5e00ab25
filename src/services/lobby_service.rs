use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::{dao::session_store::SessionStore, error::ServiceError};

/// One joinable session shown in the lobby browser.
#[derive(Debug, Serialize, ToSchema)]
pub struct LobbySession {
    /// Session code to join with.
    pub code: String,
    /// Number of members currently in the session.
    pub member_count: usize,
}

/// List joinable sessions, collecting empty ones along the way.
///
/// A session whose last member left lingers as an empty document. Browsing
/// the lobby is the one moment every client passes through, so the cleanup
/// happens here, best-effort: a failed delete is logged and the entry is
/// simply not listed.
pub async fn browse(store: &Arc<dyn SessionStore>) -> Result<Vec<LobbySession>, ServiceError> {
    let mut joinable = Vec::new();

    for item in store.list().await? {
        if item.members.is_empty() {
            if let Err(err) = store.delete(item.code.clone()).await {
                warn!(code = %item.code, error = %err, "failed to collect empty session");
            }
            continue;
        }

        joinable.push(LobbySession {
            code: item.code,
            member_count: item.members.len(),
        });
    }

    Ok(joinable)
}
