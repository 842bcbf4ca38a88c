//! # Categories and the Color Classifier
//!
//! The catalog groups violations under eleven canonical category labels.
//! Labels are stored as plain text on each record, so the classifier must
//! cope with anything a record may carry: the canonical spelling, variants
//! with different punctuation (`"MESTIERI, ATTIVITA'..."` with a space
//! after the comma), free text that was never in the table, or nothing.
//!
//! Classification runs in three steps:
//!
//! 1. empty input → [`ColorTag::Slate`];
//! 2. exact match against [`CATEGORIES`];
//! 3. lower-cased keyword rules in [`KEYWORD_RULES`] order, first match
//!    wins, falling back to `Slate`.
//!
//! The keyword rules never fire for the canonical labels themselves. They
//! are what keeps punctuation variants and future labels colored.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Semantic color tag used to group records visually by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Emerald,
    Blue,
    Teal,
    Purple,
    Orange,
    Amber,
    Lime,
    Cyan,
    Green,
    Indigo,
    /// Default for empty or unrecognized categories.
    Slate,
}

impl ColorTag {
    /// All twelve tags, canonical categories first, default last.
    pub fn all() -> &'static [ColorTag] {
        &[
            Self::Red,
            Self::Emerald,
            Self::Blue,
            Self::Teal,
            Self::Purple,
            Self::Orange,
            Self::Amber,
            Self::Lime,
            Self::Cyan,
            Self::Green,
            Self::Indigo,
            Self::Slate,
        ]
    }

    /// Lower-case tag name, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Emerald => "emerald",
            Self::Blue => "blue",
            Self::Teal => "teal",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Amber => "amber",
            Self::Lime => "lime",
            Self::Cyan => "cyan",
            Self::Green => "green",
            Self::Indigo => "indigo",
            Self::Slate => "slate",
        }
    }
}

impl std::fmt::Display for ColorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownColorTag(s.to_string()))
    }
}

/// One canonical category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// Label as stored on records.
    pub value: &'static str,
    /// Display name.
    pub label: &'static str,
    /// Abbreviated name for the search menu.
    pub short_label: &'static str,
    /// Color assigned to the category.
    pub color: ColorTag,
}

/// Number of canonical categories.
pub const CATEGORY_COUNT: usize = 11;

/// The canonical category table, in menu order.
pub const CATEGORIES: [CategoryInfo; CATEGORY_COUNT] = [
    CategoryInfo {
        value: "SICUREZZA URBANA E PUBBLICA INCOLUMITA'",
        label: "Sicurezza Urbana e Pubblica Incolumità",
        short_label: "Sicurezza Urbana",
        color: ColorTag::Red,
    },
    CategoryInfo {
        value: "CONVIVENZA CIVILE",
        label: "Convivenza Civile",
        short_label: "Convivenza Civile",
        color: ColorTag::Emerald,
    },
    CategoryInfo {
        value: "VIVIBILITA'",
        label: "Vivibilità",
        short_label: "Vivibilità",
        color: ColorTag::Blue,
    },
    CategoryInfo {
        value: "IGIENE E PUBBLICO DECORO",
        label: "Igiene e Pubblico Decoro",
        short_label: "Igiene e Decoro",
        color: ColorTag::Teal,
    },
    CategoryInfo {
        value: "QUIETE PUBBLICA E TRANQUILLITA' DELLE PERSONE",
        label: "Quiete Pubblica e Tranquillità",
        short_label: "Quiete Pubblica",
        color: ColorTag::Purple,
    },
    CategoryInfo {
        value: "MESTIERI,ATTIVITA' LAVORATIVE E MANIFESTAZIONI",
        label: "Mestieri, Attività Lavorative e Manifestazioni",
        short_label: "Mestieri e Attività",
        color: ColorTag::Orange,
    },
    CategoryInfo {
        value: "SICUREZZA E DEGRADO AMBIENTALE IN AMBITO RURALE",
        label: "Sicurezza e Degrado Ambientale Rurale",
        short_label: "Sicurezza Ambientale",
        color: ColorTag::Amber,
    },
    CategoryInfo {
        value: "MANTENIMENTO DI TERRENI,FOSSI,ALBERI,PIANTE E ARBUSTI",
        label: "Mantenimento Terreni, Fossi, Alberi e Piante",
        short_label: "Mantenimento Terreni",
        color: ColorTag::Lime,
    },
    CategoryInfo {
        value: "GESTIONE DELLE ACQUE PIOVANE ED IRRIGUE",
        label: "Gestione delle Acque Piovane ed Irrigue",
        short_label: "Gestione Acque",
        color: ColorTag::Cyan,
    },
    CategoryInfo {
        value: "PASCOLO E CONDUZIONE DI BESTIAME",
        label: "Pascolo e Conduzione di Bestiame",
        short_label: "Pascolo e Bestiame",
        color: ColorTag::Green,
    },
    CategoryInfo {
        value: "RISPETTO DEI BENI PRIVATI,COMUNALI,DEMANIALI",
        label: "Rispetto dei Beni Privati, Comunali, Demaniali",
        short_label: "Rispetto dei Beni",
        color: ColorTag::Indigo,
    },
];

/// Menu label for the "no category filter" entry.
pub const ALL_CATEGORIES: &str = "Tutte le categorie";

/// Look up a canonical category by its stored label (exact match).
pub fn category_by_value(value: &str) -> Option<&'static CategoryInfo> {
    CATEGORIES.iter().find(|c| c.value == value)
}

/// How a keyword rule tests a lower-cased label.
#[derive(Debug, Clone, Copy)]
enum Keywords {
    /// Any of the keywords is a substring.
    Any(&'static [&'static str]),
    /// Every keyword is a substring.
    All(&'static [&'static str]),
}

/// One heuristic: a keyword test and the tag it assigns.
#[derive(Debug, Clone, Copy)]
struct KeywordRule {
    keywords: Keywords,
    tag: ColorTag,
}

impl KeywordRule {
    fn matches(&self, lowered: &str) -> bool {
        match self.keywords {
            Keywords::Any(words) => words.iter().any(|w| lowered.contains(w)),
            Keywords::All(words) => words.iter().all(|w| lowered.contains(w)),
        }
    }
}

/// Keyword heuristics in evaluation order. Order decides overlaps.
const KEYWORD_RULES: [KeywordRule; 11] = [
    KeywordRule {
        keywords: Keywords::Any(&["mestieri", "attivita", "lavorative"]),
        tag: ColorTag::Orange,
    },
    KeywordRule {
        keywords: Keywords::Any(&["mantenimento", "terreni", "fossi"]),
        tag: ColorTag::Lime,
    },
    KeywordRule {
        keywords: Keywords::Any(&["rispetto", "beni"]),
        tag: ColorTag::Indigo,
    },
    KeywordRule {
        keywords: Keywords::All(&["sicurezza", "urbana"]),
        tag: ColorTag::Red,
    },
    KeywordRule {
        keywords: Keywords::Any(&["convivenza"]),
        tag: ColorTag::Emerald,
    },
    KeywordRule {
        keywords: Keywords::Any(&["vivibilita"]),
        tag: ColorTag::Blue,
    },
    KeywordRule {
        keywords: Keywords::Any(&["igiene", "decoro"]),
        tag: ColorTag::Teal,
    },
    KeywordRule {
        keywords: Keywords::Any(&["quiete", "tranquillita"]),
        tag: ColorTag::Purple,
    },
    KeywordRule {
        keywords: Keywords::Any(&["ambientale", "rurale"]),
        tag: ColorTag::Amber,
    },
    KeywordRule {
        keywords: Keywords::Any(&["acque", "piovane"]),
        tag: ColorTag::Cyan,
    },
    KeywordRule {
        keywords: Keywords::Any(&["pascolo", "bestiame"]),
        tag: ColorTag::Green,
    },
];

/// Map a category label to its color tag. Never fails.
pub fn classify(categoria: Option<&str>) -> ColorTag {
    let Some(label) = categoria.filter(|s| !s.is_empty()) else {
        return ColorTag::Slate;
    };

    if let Some(info) = category_by_value(label) {
        return info.color;
    }

    let lowered = label.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.tag)
        .unwrap_or(ColorTag::Slate)
}

/// Shorten a label to `max` characters, appending `...` when cut.
pub fn truncate_label(label: &str, max: usize) -> Cow<'_, str> {
    if label.chars().count() <= max {
        return Cow::Borrowed(label);
    }
    let mut cut: String = label.chars().take(max).collect();
    cut.push_str("...");
    Cow::Owned(cut)
}
