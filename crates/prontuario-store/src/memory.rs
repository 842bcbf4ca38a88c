//! In-memory backend.
//!
//! All operations are synchronous under a `parking_lot::RwLock`; the lock
//! is never held across an `.await`. Clones share the same records and the
//! same change feed.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use prontuario_core::{ViolationDraft, ViolationId, ViolationRecord};
use tokio::sync::broadcast;

use crate::error::StoreError;
use crate::seed;
use crate::store::{ChangeEvent, ChangeFeed, ViolationStore};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<ViolationRecord>>>,
    feed: ChangeFeed,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `records` as given.
    pub fn with_records(records: Vec<ViolationRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            feed: ChangeFeed::new(),
        }
    }

    /// A store populated from drafts. Every draft is validated first.
    pub fn from_drafts(drafts: Vec<ViolationDraft>) -> Result<Self, StoreError> {
        Ok(Self::with_records(seed::materialize(drafts, Utc::now())?))
    }

    /// A store holding the built-in example records.
    pub fn with_examples() -> Self {
        Self::with_records(seed::example_records(Utc::now()))
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Add the example records when the store is empty. Returns how many
    /// were added.
    pub fn seed_if_empty(&self) -> usize {
        let mut records = self.records.write();
        if !records.is_empty() {
            return 0;
        }
        records.extend(seed::example_records(Utc::now()));
        let added = records.len();
        drop(records);
        self.feed.publish(ChangeEvent::reload());
        added
    }
}

impl ViolationStore for InMemoryStore {
    async fn fetch_all(&self) -> Result<Vec<ViolationRecord>, StoreError> {
        let mut records = self.records.read().clone();
        // Newest first, as the database backend returns them.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn insert(&self, draft: ViolationDraft) -> Result<ViolationRecord, StoreError> {
        let draft = draft.normalized();
        draft.validate()?;
        let record = ViolationRecord::from_draft(ViolationId::new(), draft, Utc::now());
        self.records.write().push(record.clone());
        self.feed.publish(ChangeEvent::inserted(record.id));
        Ok(record)
    }

    async fn update(
        &self,
        id: ViolationId,
        draft: ViolationDraft,
    ) -> Result<ViolationRecord, StoreError> {
        let draft = draft.normalized();
        draft.validate()?;
        let updated = {
            let mut records = self.records.write();
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::NotFound(id))?;
            *slot = slot.revised(draft, Utc::now());
            slot.clone()
        };
        self.feed.publish(ChangeEvent::updated(id));
        Ok(updated)
    }

    async fn delete(&self, id: ViolationId) -> Result<(), StoreError> {
        {
            let mut records = self.records.write();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(StoreError::NotFound(id));
            }
        }
        self.feed.publish(ChangeEvent::deleted(id));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChangeKind;
    use prontuario_core::Pmr;

    fn draft(articolo: &str) -> ViolationDraft {
        ViolationDraft {
            articolo: articolo.to_string(),
            comma: Some(String::new()),
            categoria: "VIVIBILITA'".to_string(),
            descrizione: "Occupazione abusiva di suolo pubblico".to_string(),
            pmr: Pmr::from_cents(10_000),
            sanzioni_accessorie: None,
            altro: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_normalizes() {
        let store = InMemoryStore::new();
        let record = store.insert(draft("Art. 4")).await.unwrap();
        assert_eq!(record.comma, None);
        assert_eq!(record.altro, None);
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn insert_rejects_invalid_draft() {
        let store = InMemoryStore::new();
        let err = store.insert(draft("")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let store = InMemoryStore::new();
        let record = store.insert(draft("Art. 4")).await.unwrap();

        let mut edit = record.to_draft();
        edit.descrizione = "Bivacco".to_string();
        let updated = store.update(record.id, edit).await.unwrap();

        assert_eq!(updated.id, record.id);
        assert_eq!(updated.descrizione, "Bivacco");
        assert_eq!(updated.created_at, record.created_at);
        assert_eq!(store.fetch_all().await.unwrap()[0].descrizione, "Bivacco");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = InMemoryStore::new();
        let id = ViolationId::new();
        assert!(matches!(
            store.update(id, draft("Art. 1")).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn mutations_publish_events() {
        let store = InMemoryStore::new();
        let mut rx = store.subscribe();

        let record = store.insert(draft("Art. 4")).await.unwrap();
        store.update(record.id, draft("Art. 5")).await.unwrap();
        store.delete(record.id).await.unwrap();

        let kinds: Vec<ChangeKind> = (0..3).map(|_| rx.try_recv().unwrap().kind).collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete]
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn fetch_all_is_newest_first() {
        let store = InMemoryStore::new();
        let first = store.insert(draft("Art. 1")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.insert(draft("Art. 2")).await.unwrap();

        let ids: Vec<ViolationId> = store
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn seed_if_empty_only_seeds_once() {
        let store = InMemoryStore::new();
        assert_eq!(store.seed_if_empty(), 2);
        assert_eq!(store.seed_if_empty(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clones_share_records() {
        let store = InMemoryStore::with_examples();
        let clone = store.clone();
        assert_eq!(clone.len(), store.len());
    }
}
