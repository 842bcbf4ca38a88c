//! # Filter and Sort Pipeline
//!
//! Turns a snapshot of the whole collection into the records the user
//! sees, in canonical order:
//!
//! ```text
//! all records → category filter → text filter → sort by (articolo, comma)
//! ```
//!
//! - The category filter is an exact, case-sensitive comparison with the
//!   stored label. An empty category disables it.
//! - The text filter is active when the search term has non-whitespace
//!   content. The lower-cased term (untrimmed) must be a substring of one
//!   of the six searchable fields, lower-cased.
//! - The sort is stable on [`CitationKey`], so records with equal keys
//!   keep their snapshot order.
//!
//! The pipeline borrows the snapshot and never mutates it.
//! [`VisibleSelector`] memoizes the last result for callers that re-run
//! the pipeline on every render.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::category::{classify, truncate_label, ColorTag};
use crate::citation::CitationKey;
use crate::record::ViolationRecord;
use crate::style::Style;

/// Default width of the active-category badge.
pub const BADGE_LABEL_WIDTH: usize = 40;

/// The user's current filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleQuery {
    /// Selected category label; empty shows every category.
    #[serde(default)]
    pub category: String,
    /// Free-text search term.
    #[serde(default)]
    pub search: String,
}

impl VisibleQuery {
    pub fn new(category: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            search: search.into(),
        }
    }

    /// Whether either filter is active.
    pub fn is_filtered(&self) -> bool {
        !self.category.is_empty() || !self.search.trim().is_empty()
    }

    /// Run the pipeline with these inputs.
    pub fn apply<'a>(&self, all: &'a [ViolationRecord]) -> Vec<&'a ViolationRecord> {
        visible_records(all, &self.category, &self.search)
    }
}

/// The visible subset of `all` in canonical order.
pub fn visible_records<'a>(
    all: &'a [ViolationRecord],
    category: &str,
    search: &str,
) -> Vec<&'a ViolationRecord> {
    let term = (!search.trim().is_empty()).then(|| search.to_lowercase());

    let mut visible: Vec<&ViolationRecord> = all
        .iter()
        .filter(|r| category.is_empty() || r.categoria == category)
        .filter(|r| term.as_deref().map_or(true, |t| r.matches_search(t)))
        .collect();
    visible.sort_by_key(|r| CitationKey::of(r));
    visible
}

/// Sort an owned collection into canonical order, in place.
pub fn sort_canonical(records: &mut [ViolationRecord]) {
    records.sort_by_key(CitationKey::of);
}

/// Memoized pipeline: recomputes only when the snapshot revision or the
/// query changes.
///
/// The revision is the caller's promise that two snapshots with the same
/// number hold the same records (see `LiveCatalog::snapshot`).
#[derive(Debug, Default)]
pub struct VisibleSelector {
    cached: Option<Selection>,
    recomputations: u64,
}

#[derive(Debug)]
struct Selection {
    revision: u64,
    query: VisibleQuery,
    output: Arc<[ViolationRecord]>,
}

impl VisibleSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible records for `query` over `snapshot` at `revision`.
    pub fn select(
        &mut self,
        revision: u64,
        snapshot: &[ViolationRecord],
        query: &VisibleQuery,
    ) -> Arc<[ViolationRecord]> {
        if let Some(cached) = &self.cached {
            if cached.revision == revision && cached.query == *query {
                return Arc::clone(&cached.output);
            }
        }

        let output: Arc<[ViolationRecord]> = query
            .apply(snapshot)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
            .into();
        self.recomputations += 1;
        self.cached = Some(Selection {
            revision,
            query: query.clone(),
            output: Arc::clone(&output),
        });
        output
    }

    /// How many times the pipeline actually ran.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Drop the cached result.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

/// Badge shown for the selected category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBadge {
    /// Label cut to [`BADGE_LABEL_WIDTH`] characters.
    pub label: String,
    /// Full label, for tooltips.
    pub title: String,
    pub color: ColorTag,
    pub style: Style,
}

impl CategoryBadge {
    pub fn for_category(category: &str) -> Self {
        let color = classify(Some(category));
        Self {
            label: truncate_label(category, BADGE_LABEL_WIDTH).into_owned(),
            title: category.to_string(),
            color,
            style: color.style(),
        }
    }
}

/// Counts and active filters for the stats bar.
///
/// Filters count as active under the same rule as
/// [`VisibleQuery::is_filtered`]: a whitespace-only search is no search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    /// Records in the collection.
    pub total: usize,
    /// Records after filtering.
    pub visible: usize,
    /// Active search term.
    pub search: Option<String>,
    /// Active category.
    pub category: Option<String>,
    pub category_badge: Option<CategoryBadge>,
}

impl CatalogStats {
    pub fn new(total: usize, visible: usize, query: &VisibleQuery) -> Self {
        let search = (!query.search.trim().is_empty()).then(|| query.search.clone());
        let category = (!query.category.is_empty()).then(|| query.category.clone());
        let category_badge = category.as_deref().map(CategoryBadge::for_category);
        Self {
            total,
            visible,
            search,
            category,
            category_badge,
        }
    }

    /// Whether a results count should be shown next to the total.
    pub fn is_filtered(&self) -> bool {
        self.search.is_some() || self.category.is_some()
    }
}
