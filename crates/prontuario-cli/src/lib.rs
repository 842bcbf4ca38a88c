//! # prontuario-cli — Command-Line Tool for the Sanctions Catalog
//!
//! ## Subcommands
//!
//! - `prontuario list` — Filter and sort a data file the way the catalog does.
//! - `prontuario classify` — Color tag and classes for category labels.
//! - `prontuario categories` — The category table.
//! - `prontuario check` — Validate every draft in a data file.
//!
//! ```bash
//! prontuario list --data sanzioni.yaml --categoria "CONVIVENZA CIVILE"
//! prontuario list --search recidiva --json
//! prontuario classify "COMMERCIO SU AREE PUBBLICHE" "ALTRO"
//! prontuario check sanzioni.json
//! ```

pub mod categories;
pub mod check;
pub mod classify;
pub mod list;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use prontuario_core::ViolationRecord;
use prontuario_store::seed;

/// Records from `data`, or the built-in examples when no file is given.
///
/// Every draft in the file must be valid.
pub fn load_records(data: Option<&Path>) -> Result<Vec<ViolationRecord>> {
    let Some(path) = data else {
        tracing::info!("no data file given, using the example records");
        return Ok(seed::example_records(Utc::now()));
    };
    let drafts = seed::load_drafts(path)?;
    seed::materialize(drafts, Utc::now())
        .with_context(|| format!("invalid record in {}", path.display()))
}
