//! # Violation Records
//!
//! `ViolationRecord` is the only entity in the catalog. `ViolationDraft`
//! is the create/edit payload: everything a clerk enters, without the
//! identifier and timestamps owned by the store.
//!
//! Optional text fields stay `Option<String>` in storage. They are read as
//! empty strings only when a search term is matched against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::ViolationId;
use crate::pmr::Pmr;

/// Maximum length of `articolo` and `comma`.
pub const MAX_CITATION_LEN: usize = 64;
/// Maximum length of `categoria`.
pub const MAX_CATEGORY_LEN: usize = 255;
/// Maximum length of free-text fields.
pub const MAX_TEXT_LEN: usize = 4000;

/// One catalog entry: a violation, its legal citation, and its penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    pub id: ViolationId,
    /// Article citation, e.g. `"Art. 7"`.
    pub articolo: String,
    /// Paragraph citation, e.g. `"1"`.
    #[serde(default)]
    pub comma: Option<String>,
    /// Category label, normally one of the canonical labels.
    #[serde(default)]
    pub categoria: String,
    pub descrizione: String,
    pub pmr: Pmr,
    #[serde(default)]
    pub sanzioni_accessorie: Option<String>,
    #[serde(default)]
    pub altro: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ViolationRecord {
    /// Materialize a draft as a new record.
    pub fn from_draft(id: ViolationId, draft: ViolationDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            articolo: draft.articolo,
            comma: draft.comma,
            categoria: draft.categoria,
            descrizione: draft.descrizione,
            pmr: draft.pmr,
            sanzioni_accessorie: draft.sanzioni_accessorie,
            altro: draft.altro,
            created_at: now,
            updated_at: now,
        }
    }

    /// A copy of this record with every editable field replaced by `draft`.
    /// The id and creation time are kept.
    pub fn revised(&self, draft: ViolationDraft, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            created_at: self.created_at,
            ..Self::from_draft(self.id, draft, now)
        }
    }

    /// The editable fields of this record, as the edit form starts from.
    pub fn to_draft(&self) -> ViolationDraft {
        ViolationDraft {
            articolo: self.articolo.clone(),
            comma: self.comma.clone(),
            categoria: self.categoria.clone(),
            descrizione: self.descrizione.clone(),
            pmr: self.pmr,
            sanzioni_accessorie: self.sanzioni_accessorie.clone(),
            altro: self.altro.clone(),
        }
    }

    /// The six searchable fields, missing ones as `""`.
    pub fn search_fields(&self) -> [&str; 6] {
        [
            &self.descrizione,
            &self.articolo,
            self.comma.as_deref().unwrap_or(""),
            &self.categoria,
            self.sanzioni_accessorie.as_deref().unwrap_or(""),
            self.altro.as_deref().unwrap_or(""),
        ]
    }

    /// Whether any searchable field, lower-cased, contains `lowered_term`.
    pub fn matches_search(&self, lowered_term: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| !field.is_empty() && field.to_lowercase().contains(lowered_term))
    }
}

/// Create/edit payload for a violation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDraft {
    pub articolo: String,
    #[serde(default)]
    pub comma: Option<String>,
    #[serde(default)]
    pub categoria: String,
    pub descrizione: String,
    pub pmr: Pmr,
    #[serde(default)]
    pub sanzioni_accessorie: Option<String>,
    #[serde(default)]
    pub altro: Option<String>,
}

impl ViolationDraft {
    /// Check required fields and length limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("articolo", &self.articolo)?;
        required("categoria", &self.categoria)?;
        required("descrizione", &self.descrizione)?;

        max_len("articolo", &self.articolo, MAX_CITATION_LEN)?;
        max_len("categoria", &self.categoria, MAX_CATEGORY_LEN)?;
        max_len("descrizione", &self.descrizione, MAX_TEXT_LEN)?;
        if let Some(comma) = &self.comma {
            max_len("comma", comma, MAX_CITATION_LEN)?;
        }
        if let Some(text) = &self.sanzioni_accessorie {
            max_len("sanzioniAccessorie", text, MAX_TEXT_LEN)?;
        }
        if let Some(text) = &self.altro {
            max_len("altro", text, MAX_TEXT_LEN)?;
        }
        Ok(())
    }

    /// Blank optional fields become `None`; the form submits them as `""`.
    pub fn normalized(mut self) -> Self {
        self.comma = blank_to_none(self.comma);
        self.sanzioni_accessorie = blank_to_none(self.sanzioni_accessorie);
        self.altro = blank_to_none(self.altro);
        self
    }
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
