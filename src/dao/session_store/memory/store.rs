use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::dao::{
    models::{SessionEntity, SessionListItemEntity},
    session_store::{MemberDelta, SessionSignal, SessionStore, SessionStream},
    storage::StorageResult,
};

/// One document slot: the record (if it exists) plus the channel carrying
/// snapshots to subscribers. Mutations happen while holding the map entry,
/// which is what serializes writes to a single document.
struct DocSlot {
    record: Option<SessionEntity>,
    tx: watch::Sender<SessionSignal>,
}

impl DocSlot {
    fn empty() -> Self {
        let (tx, _rx) = watch::channel(SessionSignal::Missing);
        Self { record: None, tx }
    }
}

/// In-process session store backed by a concurrent map and per-document
/// watch channels.
///
/// The watch channel coalesces intermediate snapshots under load, which
/// matches the consistency contract: subscribers converge on the same final
/// snapshot, they are not promised every intermediate one.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    slots: Arc<DashMap<String, DocSlot>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn put_sync(&self, code: String, record: SessionEntity) {
        let mut slot = self.slots.entry(code).or_insert_with(DocSlot::empty);
        slot.record = Some(record.clone());
        slot.tx.send_replace(SessionSignal::Snapshot(record));
    }

    fn merge_members_sync(&self, code: &str, delta: MemberDelta) -> bool {
        let Some(mut slot) = self.slots.get_mut(code) else {
            return false;
        };
        let Some(record) = slot.record.as_mut() else {
            return false;
        };

        if let Some(add) = delta.add
            && !record.members.contains(&add)
        {
            record.members.push(add);
        }
        if let Some(remove) = delta.remove {
            record.members.retain(|member| member != &remove);
        }

        let snapshot = record.clone();
        slot.tx.send_replace(SessionSignal::Snapshot(snapshot));
        true
    }

    fn delete_sync(&self, code: &str) -> bool {
        let mut existed = false;
        let mut orphaned = false;

        if let Some(mut slot) = self.slots.get_mut(code) {
            existed = slot.record.take().is_some();
            slot.tx.send_replace(SessionSignal::Missing);
            orphaned = slot.tx.receiver_count() == 0;
        }

        if orphaned {
            // Nobody is watching and the record is gone; reclaim the slot.
            self.slots
                .remove_if(code, |_, slot| {
                    slot.record.is_none() && slot.tx.receiver_count() == 0
                });
        }

        existed
    }

    fn subscribe_sync(&self, code: String) -> SessionStream {
        let rx = self
            .slots
            .entry(code)
            .or_insert_with(DocSlot::empty)
            .tx
            .subscribe();
        // WatchStream yields the current value first, so a new subscriber
        // always sees the present state before any change.
        Box::pin(WatchStream::new(rx))
    }

    fn list_sync(&self) -> Vec<SessionListItemEntity> {
        self.slots
            .iter()
            .filter_map(|entry| {
                entry.value().record.as_ref().map(|record| SessionListItemEntity {
                    code: entry.key().clone(),
                    members: record.members.clone(),
                })
            })
            .collect()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, code: String) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .slots
                .get(&code)
                .and_then(|slot| slot.record.clone()))
        })
    }

    fn put(&self, code: String, record: SessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.put_sync(code, record);
            Ok(())
        })
    }

    fn merge_members(
        &self,
        code: String,
        delta: MemberDelta,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.merge_members_sync(&code, delta)) })
    }

    fn delete(&self, code: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.delete_sync(&code)) })
    }

    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<SessionListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_sync()) })
    }

    fn subscribe(&self, code: String) -> BoxFuture<'static, StorageResult<SessionStream>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.subscribe_sync(code)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use indexmap::IndexMap;

    use super::*;

    fn record(creator: &str) -> SessionEntity {
        SessionEntity {
            members: vec![creator.to_string()],
            member_names: IndexMap::from([(creator.to_string(), creator.to_string())]),
            creator: creator.to_string(),
            started: false,
            theme: "random".into(),
            word_index: 0,
            odd_members: vec![],
            odd_count: 1,
            last_word: None,
        }
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let store = MemorySessionStore::new();
        store.put("ab12".into(), record("Zany Fox")).await.unwrap();

        let loaded = store.get("ab12".into()).await.unwrap().unwrap();
        assert_eq!(loaded.creator, "Zany Fox");

        assert!(store.delete("ab12".into()).await.unwrap());
        assert!(store.get("ab12".into()).await.unwrap().is_none());
        assert!(!store.delete("ab12".into()).await.unwrap());
    }

    #[tokio::test]
    async fn merge_adds_once_and_removes() {
        let store = MemorySessionStore::new();
        store.put("ab12".into(), record("Zany Fox")).await.unwrap();

        store
            .merge_members("ab12".into(), MemberDelta::add("Bold Owl"))
            .await
            .unwrap();
        store
            .merge_members("ab12".into(), MemberDelta::add("Bold Owl"))
            .await
            .unwrap();

        let loaded = store.get("ab12".into()).await.unwrap().unwrap();
        assert_eq!(loaded.members, vec!["Zany Fox", "Bold Owl"]);

        store
            .merge_members("ab12".into(), MemberDelta::remove("Zany Fox"))
            .await
            .unwrap();
        let loaded = store.get("ab12".into()).await.unwrap().unwrap();
        assert_eq!(loaded.members, vec!["Bold Owl"]);
    }

    #[tokio::test]
    async fn merge_on_missing_document_reports_not_found() {
        let store = MemorySessionStore::new();
        let found = store
            .merge_members("zz99".into(), MemberDelta::add("Bold Owl"))
            .await
            .unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn concurrent_joins_both_survive() {
        let store = MemorySessionStore::new();
        store.put("ab12".into(), record("Zany Fox")).await.unwrap();

        let a = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .merge_members("ab12".into(), MemberDelta::add("Bold Owl"))
                    .await
            })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .merge_members("ab12".into(), MemberDelta::add("Mild Bee"))
                    .await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let loaded = store.get("ab12".into()).await.unwrap().unwrap();
        assert!(loaded.members.contains(&"Bold Owl".to_string()));
        assert!(loaded.members.contains(&"Mild Bee".to_string()));
        assert_eq!(loaded.members.len(), 3);
    }

    #[tokio::test]
    async fn subscription_sees_current_then_changes_then_missing() {
        let store = MemorySessionStore::new();
        store.put("ab12".into(), record("Zany Fox")).await.unwrap();

        let mut stream = store.subscribe("ab12".into()).await.unwrap();

        match stream.next().await.unwrap() {
            SessionSignal::Snapshot(snapshot) => assert_eq!(snapshot.members.len(), 1),
            other => panic!("expected initial snapshot, got {other:?}"),
        }

        store
            .merge_members("ab12".into(), MemberDelta::add("Bold Owl"))
            .await
            .unwrap();
        match stream.next().await.unwrap() {
            SessionSignal::Snapshot(snapshot) => assert_eq!(snapshot.members.len(), 2),
            other => panic!("expected updated snapshot, got {other:?}"),
        }

        store.delete("ab12".into()).await.unwrap();
        assert_eq!(stream.next().await.unwrap(), SessionSignal::Missing);
    }

    #[tokio::test]
    async fn subscribing_to_an_unknown_code_yields_missing_then_snapshot() {
        let store = MemorySessionStore::new();
        let mut stream = store.subscribe("new1".into()).await.unwrap();

        assert_eq!(stream.next().await.unwrap(), SessionSignal::Missing);

        store.put("new1".into(), record("Zany Fox")).await.unwrap();
        match stream.next().await.unwrap() {
            SessionSignal::Snapshot(snapshot) => assert_eq!(snapshot.creator, "Zany Fox"),
            other => panic!("expected snapshot after create, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_skips_deleted_documents() {
        let store = MemorySessionStore::new();
        store.put("ab12".into(), record("Zany Fox")).await.unwrap();
        store.put("cd34".into(), record("Bold Owl")).await.unwrap();
        store.delete("cd34".into()).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].code, "ab12");
    }
}
