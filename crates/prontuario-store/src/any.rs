//! Runtime backend selection.

use prontuario_core::{ViolationDraft, ViolationId, ViolationRecord};
use tokio::sync::broadcast;

use crate::error::StoreError;
use crate::memory::InMemoryStore;
use crate::postgres::PgStore;
use crate::store::{ChangeEvent, ViolationStore};

/// One of the concrete backends, chosen from configuration at startup.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(InMemoryStore),
    Postgres(PgStore),
}

impl AnyStore {
    /// Short backend name for logs and the readiness probe.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl From<InMemoryStore> for AnyStore {
    fn from(store: InMemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgStore> for AnyStore {
    fn from(store: PgStore) -> Self {
        Self::Postgres(store)
    }
}

impl ViolationStore for AnyStore {
    async fn fetch_all(&self) -> Result<Vec<ViolationRecord>, StoreError> {
        match self {
            Self::Memory(s) => s.fetch_all().await,
            Self::Postgres(s) => s.fetch_all().await,
        }
    }

    async fn insert(&self, draft: ViolationDraft) -> Result<ViolationRecord, StoreError> {
        match self {
            Self::Memory(s) => s.insert(draft).await,
            Self::Postgres(s) => s.insert(draft).await,
        }
    }

    async fn update(
        &self,
        id: ViolationId,
        draft: ViolationDraft,
    ) -> Result<ViolationRecord, StoreError> {
        match self {
            Self::Memory(s) => s.update(id, draft).await,
            Self::Postgres(s) => s.update(id, draft).await,
        }
    }

    async fn delete(&self, id: ViolationId) -> Result<(), StoreError> {
        match self {
            Self::Memory(s) => s.delete(id).await,
            Self::Postgres(s) => s.delete(id).await,
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        match self {
            Self::Memory(s) => s.subscribe(),
            Self::Postgres(s) => s.subscribe(),
        }
    }
}
