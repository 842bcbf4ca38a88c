//! # prontuario-store — Data Access for the Sanctions Catalog
//!
//! Everything between the pure catalog core and a persistent store:
//!
//! - [`ViolationStore`]: the data-access interface (fetch, insert, update,
//!   delete, change notifications). Injected into [`LiveCatalog`], never
//!   reached through a global.
//! - [`InMemoryStore`]: development and test backend.
//! - [`PgStore`]: PostgreSQL backend over the `sanzioni_violations` table,
//!   forwarding `NOTIFY` messages as change events.
//! - [`AnyStore`]: picks one of the two at runtime.
//! - [`LiveCatalog`]: owns the in-memory snapshot the pipeline runs over,
//!   and keeps it in sync with the store.
//! - [`seed`]: the built-in example records and YAML/JSON data files.

pub mod any;
pub mod catalog;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

pub use any::AnyStore;
pub use catalog::{CatalogView, LiveCatalog, Snapshot};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use store::{ChangeEvent, ChangeFeed, ChangeKind, ViolationStore};
