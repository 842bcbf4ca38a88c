//! # Seed Data and Data Files
//!
//! A data file is a sequence of drafts in YAML or JSON:
//!
//! ```yaml
//! - articolo: "Art. 7"
//!   comma: "1"
//!   categoria: "CONVIVENZA CIVILE"
//!   descrizione: "Mancato rispetto delle norme di convivenza civile"
//!   pmr: "50.00"
//!   sanzioniAccessorie: "Nessuna"
//! ```
//!
//! Files ending in `.json` are parsed as JSON, anything else as YAML
//! (which also accepts JSON).

use std::path::Path;

use chrono::{DateTime, Utc};
use prontuario_core::{Pmr, ViolationDraft, ViolationId, ViolationRecord};

use crate::error::StoreError;

/// Serialization format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// The two example records an empty catalog starts with.
pub fn example_drafts() -> Vec<ViolationDraft> {
    vec![
        ViolationDraft {
            articolo: "Art. 7".to_string(),
            comma: Some("1".to_string()),
            categoria: "CONVIVENZA CIVILE".to_string(),
            descrizione: "Mancato rispetto delle norme di convivenza civile".to_string(),
            pmr: Pmr::from_cents(5_000),
            sanzioni_accessorie: Some("Nessuna".to_string()),
            altro: None,
        },
        ViolationDraft {
            articolo: "Art. 12".to_string(),
            comma: Some("3".to_string()),
            categoria: "IGIENE E PUBBLICO DECORO".to_string(),
            descrizione: "Abbandono di rifiuti su suolo pubblico".to_string(),
            pmr: Pmr::from_cents(15_000),
            sanzioni_accessorie: Some("Obbligo di pulizia dell'area".to_string()),
            altro: Some("Recidiva: sanzione raddoppiata".to_string()),
        },
    ]
}

/// The example drafts as records stamped with `now`.
pub fn example_records(now: DateTime<Utc>) -> Vec<ViolationRecord> {
    example_drafts()
        .into_iter()
        .map(|draft| ViolationRecord::from_draft(ViolationId::new(), draft, now))
        .collect()
}

/// Normalize, validate and materialize drafts as records.
///
/// Fails on the first invalid draft.
pub fn materialize(
    drafts: Vec<ViolationDraft>,
    now: DateTime<Utc>,
) -> Result<Vec<ViolationRecord>, StoreError> {
    drafts
        .into_iter()
        .map(|draft| {
            let draft = draft.normalized();
            draft.validate()?;
            Ok(ViolationRecord::from_draft(ViolationId::new(), draft, now))
        })
        .collect()
}

/// Parse drafts from text. Drafts are not validated.
pub fn parse_drafts(text: &str, format: DataFormat) -> Result<Vec<ViolationDraft>, String> {
    match format {
        DataFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        DataFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    }
}

/// Read and parse a data file. Drafts are not validated.
pub fn load_drafts(path: &Path) -> Result<Vec<ViolationDraft>, StoreError> {
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::data_file(path, e))?;
    let drafts = parse_drafts(&text, DataFormat::from_path(path))
        .map_err(|message| StoreError::data_file(path, message))?;
    tracing::debug!(path = %path.display(), count = drafts.len(), "data file parsed");
    Ok(drafts)
}
