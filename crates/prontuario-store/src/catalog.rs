//! # Live Catalog
//!
//! `LiveCatalog` owns the collection the filter/sort pipeline runs over.
//! It holds an immutable [`Snapshot`] behind a `parking_lot::RwLock`:
//! readers clone the `Arc` and release the lock immediately, writers swap
//! in a new snapshot with a higher revision. The lock is never held
//! across an `.await`.
//!
//! ## Consistency
//!
//! - Mutations go to the store first. Only on success is the local
//!   snapshot patched (insert appends, update replaces by id, delete
//!   removes by id) and re-sorted.
//! - The watcher started by [`LiveCatalog::spawn_watcher`] reloads the
//!   whole collection on every change event, so the snapshot converges on
//!   the store even when another writer was involved.
//! - A failed reload keeps the last-known-good snapshot and records the
//!   error message until the next successful reload.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use prontuario_core::{
    sort_canonical, CatalogStats, ViolationDraft, ViolationId, ViolationRecord, VisibleQuery,
    VisibleSelector,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::store::ViolationStore;

/// The collection at one revision.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Incremented on every change to `records`.
    pub revision: u64,
    /// Records in canonical order.
    pub records: Arc<[ViolationRecord]>,
    /// When the store was last read successfully.
    pub loaded_at: Option<DateTime<Utc>>,
    /// Message of the last failed reload, cleared by the next success.
    pub last_error: Option<String>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            revision: 0,
            records: Arc::from(Vec::new()),
            loaded_at: None,
            last_error: None,
        }
    }
}

/// The visible subset for one query.
#[derive(Debug, Clone)]
pub struct CatalogView {
    pub revision: u64,
    pub stats: CatalogStats,
    pub items: Arc<[ViolationRecord]>,
}

struct Inner<S> {
    store: S,
    snapshot: RwLock<Snapshot>,
    selector: Mutex<VisibleSelector>,
}

/// Shared handle to the catalog. Clones refer to the same collection.
pub struct LiveCatalog<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for LiveCatalog<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for LiveCatalog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.inner.snapshot.read();
        f.debug_struct("LiveCatalog")
            .field("revision", &snapshot.revision)
            .field("records", &snapshot.records.len())
            .field("last_error", &snapshot.last_error)
            .finish()
    }
}

impl<S: ViolationStore> LiveCatalog<S> {
    /// A catalog over `store` with an empty, never-loaded snapshot.
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                snapshot: RwLock::new(Snapshot::empty()),
                selector: Mutex::new(VisibleSelector::new()),
            }),
        }
    }

    /// Build a catalog and perform the initial load.
    pub async fn load(store: S) -> Result<Self, StoreError> {
        let catalog = Self::new(store);
        catalog.refresh().await?;
        Ok(catalog)
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot.read().clone()
    }

    /// Records of the current snapshot, in canonical order.
    pub fn records(&self) -> Arc<[ViolationRecord]> {
        Arc::clone(&self.inner.snapshot.read().records)
    }

    pub fn revision(&self) -> u64 {
        self.inner.snapshot.read().revision
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.snapshot.read().last_error.clone()
    }

    /// Whether at least one load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.inner.snapshot.read().loaded_at.is_some()
    }

    pub fn get(&self, id: ViolationId) -> Option<ViolationRecord> {
        self.inner
            .snapshot
            .read()
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Run the pipeline for `query` over the current snapshot.
    pub fn view(&self, query: &VisibleQuery) -> CatalogView {
        let snapshot = self.snapshot();
        let items = self
            .inner
            .selector
            .lock()
            .select(snapshot.revision, &snapshot.records, query);
        let stats = CatalogStats::new(snapshot.records.len(), items.len(), query);
        CatalogView {
            revision: snapshot.revision,
            stats,
            items,
        }
    }

    /// Reload everything from the store. Returns the record count.
    ///
    /// A fetch that started before a newer revision was published (a local
    /// write or a concurrent reload) is discarded once the catalog has
    /// loaded, so it cannot hide that write. The change event of the write
    /// triggers a fresh reload.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let started_at = self.revision();
        match self.inner.store.fetch_all().await {
            Ok(mut records) => {
                sort_canonical(&mut records);
                let count = records.len();
                let mut snapshot = self.inner.snapshot.write();
                snapshot.last_error = None;
                if snapshot.loaded_at.is_some() && snapshot.revision != started_at {
                    let revision = snapshot.revision;
                    drop(snapshot);
                    tracing::debug!(started_at, revision, "stale reload discarded");
                    return Ok(count);
                }
                snapshot.revision += 1;
                snapshot.records = records.into();
                snapshot.loaded_at = Some(Utc::now());
                let revision = snapshot.revision;
                drop(snapshot);
                tracing::info!(count, revision, "catalog reloaded");
                Ok(count)
            }
            Err(e) => {
                self.inner.snapshot.write().last_error = Some(e.to_string());
                tracing::warn!(error = %e, "catalog reload failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: ViolationDraft) -> Result<ViolationRecord, StoreError> {
        let record = self.inner.store.insert(draft).await?;
        let added = record.clone();
        self.patch(move |records| records.push(added));
        tracing::info!(id = %record.id, articolo = %record.articolo, "violation created");
        Ok(record)
    }

    pub async fn update(
        &self,
        id: ViolationId,
        draft: ViolationDraft,
    ) -> Result<ViolationRecord, StoreError> {
        let record = self.inner.store.update(id, draft).await?;
        let replacement = record.clone();
        self.patch(move |records| match records.iter_mut().find(|r| r.id == id) {
            Some(slot) => *slot = replacement,
            None => records.push(replacement),
        });
        tracing::info!(id = %id, "violation updated");
        Ok(record)
    }

    pub async fn delete(&self, id: ViolationId) -> Result<(), StoreError> {
        self.inner.store.delete(id).await?;
        self.patch(|records| records.retain(|r| r.id != id));
        tracing::info!(id = %id, "violation deleted");
        Ok(())
    }

    /// Apply `f` to a copy of the records and publish it as a new revision.
    fn patch(&self, f: impl FnOnce(&mut Vec<ViolationRecord>)) {
        let mut snapshot = self.inner.snapshot.write();
        let mut records = snapshot.records.to_vec();
        f(&mut records);
        sort_canonical(&mut records);
        snapshot.records = records.into();
        snapshot.revision += 1;
    }

    /// Reload on every change event until the store's change stream closes.
    ///
    /// Subscribes before returning, so events published after this call
    /// are never missed.
    pub fn spawn_watcher(&self) -> JoinHandle<()> {
        let mut events = self.inner.store.subscribe();
        let catalog = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        tracing::debug!(kind = %event.kind, "change event received");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "change events dropped, reloading");
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("change stream closed, watcher stopping");
                        break;
                    }
                }
                // Failures are recorded on the snapshot by refresh itself.
                let _ = catalog.refresh().await;
            }
        })
    }
}
