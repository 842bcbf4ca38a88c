//! # prontuario-core — Foundational Types for the Sanctions Catalog
//!
//! This crate holds everything about the catalog that does not touch I/O:
//! the violation record model, the category table and its color
//! classifier, citation number extraction, and the filter/sort pipeline
//! that turns a collection snapshot into the list the user sees.
//!
//! ## Key Design Principles
//!
//! 1. **Total functions.** `classify`, `extract_number` and
//!    `visible_records` accept any input, including missing or malformed
//!    fields, and always produce a value. Unknown categories become
//!    `ColorTag::Slate`, unparseable citations sort as 0.
//!
//! 2. **Snapshots in, new sequences out.** The pipeline borrows an
//!    immutable slice and returns a fresh ordering. Nothing in this crate
//!    mutates a collection it did not create.
//!
//! 3. **No floats for money.** `Pmr` is an integer count of euro cents.
//!
//! 4. **Ordered rules.** The classifier heuristics are an explicit list
//!    evaluated top to bottom; reordering them changes results.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `prontuario-*` crates (leaf of the DAG).
//! - No `unsafe` code, no `.unwrap()` outside tests.

pub mod catalog;
pub mod category;
pub mod citation;
pub mod error;
pub mod identity;
pub mod pmr;
pub mod record;
pub mod style;

pub use catalog::{
    sort_canonical, visible_records, CatalogStats, CategoryBadge, VisibleQuery, VisibleSelector,
};
pub use category::{
    category_by_value, classify, truncate_label, CategoryInfo, ColorTag, ALL_CATEGORIES,
    CATEGORIES, CATEGORY_COUNT,
};
pub use citation::{extract_number, CitationKey};
pub use error::{PmrError, ValidationError};
pub use identity::ViolationId;
pub use pmr::Pmr;
pub use record::{ViolationDraft, ViolationRecord};
pub use style::Style;
