//! # Data-Access Interface
//!
//! [`ViolationStore`] is the seam between the catalog and whatever holds
//! the records. Backends also publish a [`ChangeEvent`] stream so that the
//! catalog can reload when another writer touches the collection.
//!
//! Methods return `impl Future + Send` so that generic callers (the live
//! catalog watcher) can run them on spawned tasks.

use std::future::Future;

use prontuario_core::{ViolationDraft, ViolationId, ViolationRecord};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::StoreError;

/// Buffered change events per subscriber before it starts lagging.
pub const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// What happened to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// Something changed, details unknown; reload everything.
    Reload,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Reload => "reload",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change notification. `id` is absent for `Reload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub id: Option<ViolationId>,
}

impl ChangeEvent {
    pub fn inserted(id: ViolationId) -> Self {
        Self {
            kind: ChangeKind::Insert,
            id: Some(id),
        }
    }

    pub fn updated(id: ViolationId) -> Self {
        Self {
            kind: ChangeKind::Update,
            id: Some(id),
        }
    }

    pub fn deleted(id: ViolationId) -> Self {
        Self {
            kind: ChangeKind::Delete,
            id: Some(id),
        }
    }

    pub fn reload() -> Self {
        Self {
            kind: ChangeKind::Reload,
            id: None,
        }
    }
}

/// Broadcast sender shared by a backend and its clones.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish to all current subscribers. Having none is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let delivered = self.tx.send(event).unwrap_or(0);
        tracing::trace!(kind = %event.kind, delivered, "change event published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Data access for violation records.
pub trait ViolationStore: Send + Sync + 'static {
    /// Every record in the store, in backend order.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<ViolationRecord>, StoreError>> + Send;

    /// Persist a new record built from `draft`.
    fn insert(
        &self,
        draft: ViolationDraft,
    ) -> impl Future<Output = Result<ViolationRecord, StoreError>> + Send;

    /// Replace every editable field of record `id`.
    fn update(
        &self,
        id: ViolationId,
        draft: ViolationDraft,
    ) -> impl Future<Output = Result<ViolationRecord, StoreError>> + Send;

    /// Remove record `id`.
    fn delete(&self, id: ViolationId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
