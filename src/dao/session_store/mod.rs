#[cfg(feature = "http-store")]
pub mod http;
pub mod memory;

use std::pin::Pin;

use futures::{Stream, future::BoxFuture};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{SessionEntity, SessionListItemEntity};
use crate::dao::storage::StorageResult;

/// Full-document snapshot pushed to subscribers on every observable change.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSignal {
    /// The record as it currently exists.
    Snapshot(SessionEntity),
    /// The record was deleted or never existed.
    Missing,
}

/// Set-semantics mutation applied to the `members` field of a record.
///
/// This is the one write shape that deliberately avoids a full-document
/// overwrite so concurrent joins and leaves never clobber each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MemberDelta {
    /// Identity to add to the member set, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<String>,
    /// Identity to remove from the member set, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<String>,
}

impl MemberDelta {
    /// Delta adding one identity.
    pub fn add(identity: impl Into<String>) -> Self {
        Self {
            add: Some(identity.into()),
            remove: None,
        }
    }

    /// Delta removing one identity.
    pub fn remove(identity: impl Into<String>) -> Self {
        Self {
            add: None,
            remove: Some(identity.into()),
        }
    }

    /// True when the delta would not change anything.
    pub fn is_empty(&self) -> bool {
        self.add.is_none() && self.remove.is_none()
    }
}

/// Stream of snapshots for one session document. The current state is
/// yielded immediately on subscribe; dropping the stream unsubscribes.
pub type SessionStream = Pin<Box<dyn Stream<Item = SessionSignal> + Send>>;

/// Abstraction over the document store holding session records.
///
/// The only consistency guarantee implementations must provide is
/// per-document write ordering: writes to one code are applied in some
/// serial order and every subscriber eventually observes the same final
/// snapshot. Nothing is guaranteed across documents.
pub trait SessionStore: Send + Sync {
    /// Point read of a session record.
    fn get(&self, code: String) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>>;
    /// Full-document overwrite, last-write-wins.
    fn put(&self, code: String, record: SessionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Merge a membership delta into an existing record. Returns `false`
    /// when the document does not exist.
    fn merge_members(
        &self,
        code: String,
        delta: MemberDelta,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Delete a record outright. Returns `false` when nothing was there.
    fn delete(&self, code: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// List every live session record.
    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<SessionListItemEntity>>>;
    /// Subscribe to full-document snapshots for one code.
    fn subscribe(&self, code: String) -> BoxFuture<'static, StorageResult<SessionStream>>;
    /// Probe backend connectivity.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
