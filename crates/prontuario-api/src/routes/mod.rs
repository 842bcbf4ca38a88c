//! # API Route Modules
//!
//! - `sanzioni` — catalog browsing (category filter, free-text search,
//!   canonical order) and record CRUD.
//! - `categorie` — the category table and the color classifier.

pub mod categorie;
pub mod sanzioni;
