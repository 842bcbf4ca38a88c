//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. The catalog is built once at startup from
//! [`AppConfig`] and injected here; handlers never reach a global.

use prontuario_store::seed::load_drafts;
use prontuario_store::{AnyStore, InMemoryStore, LiveCatalog, PgStore, StoreError};

use crate::config::AppConfig;

/// Catalog type served by the API.
pub type Catalog = LiveCatalog<AnyStore>;

/// Shared application state. Clone-friendly: the catalog is an `Arc` handle.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(catalog: Catalog, config: AppConfig) -> Self {
        Self { catalog, config }
    }

    /// State over an already loaded in-memory store, for tests and tools.
    pub async fn in_memory(store: InMemoryStore) -> Result<Self, StoreError> {
        let catalog = LiveCatalog::load(AnyStore::from(store)).await?;
        Ok(Self::new(catalog, AppConfig::default()))
    }

    /// Build the store selected by `config`, load the catalog and start the
    /// change watcher.
    ///
    /// An unreachable database at startup is fatal. A database that is
    /// reachable but fails the first load is not: the service starts and the
    /// readiness probe reports the error until a reload succeeds.
    pub async fn bootstrap(config: AppConfig) -> Result<Self, StoreError> {
        let store = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                store.listen().await?;
                AnyStore::from(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, running with an in-memory store");
                let store = match &config.data_file {
                    Some(path) => InMemoryStore::from_drafts(load_drafts(path)?)?,
                    None => InMemoryStore::new(),
                };
                if config.seed_examples {
                    let added = store.seed_if_empty();
                    if added > 0 {
                        tracing::info!(added, "seeded example records");
                    }
                }
                AnyStore::from(store)
            }
        };
        tracing::info!(backend = store.backend_name(), "store ready");

        let catalog = LiveCatalog::new(store);
        if let Err(e) = catalog.refresh().await {
            tracing::error!(error = %e, "initial catalog load failed");
        }
        catalog.spawn_watcher();

        Ok(Self::new(catalog, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_in_memory_seeds_examples() {
        let state = AppState::bootstrap(AppConfig::default()).await.unwrap();
        assert_eq!(state.catalog.records().len(), 2);
        assert!(state.catalog.is_loaded());
        assert_eq!(state.catalog.store().backend_name(), "memory");
    }

    #[tokio::test]
    async fn bootstrap_without_seeding_starts_empty() {
        let config = AppConfig {
            seed_examples: false,
            ..AppConfig::default()
        };
        let state = AppState::bootstrap(config).await.unwrap();
        assert!(state.catalog.records().is_empty());
    }

    #[tokio::test]
    async fn bootstrap_fails_on_missing_data_file() {
        let config = AppConfig {
            data_file: Some("/nonexistent/sanzioni.yaml".into()),
            ..AppConfig::default()
        };
        assert!(matches!(
            AppState::bootstrap(config).await,
            Err(StoreError::DataFile { .. })
        ));
    }
}
