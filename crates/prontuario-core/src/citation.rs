//! # Citation Ordering
//!
//! Article and paragraph citations are free text (`"Art. 7"`, `"3"`,
//! `"Art. 7bis"`). The canonical display order only looks at the first
//! run of decimal digits in each, so `"Art. 7bis"` sorts with article 7
//! and a missing paragraph sorts before paragraph 1.

use serde::Serialize;

use crate::record::ViolationRecord;

/// First contiguous run of ASCII digits in `text`, parsed base-10.
///
/// Missing text, empty text, or text without digits yields 0. A run too
/// long for `u64` saturates at `u64::MAX`.
pub fn extract_number(text: Option<&str>) -> u64 {
    let Some(text) = text else {
        return 0;
    };
    let digits = text
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or("");
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Composite sort key: article number, then paragraph number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CitationKey {
    pub articolo: u64,
    pub comma: u64,
}

impl CitationKey {
    /// Key for a record.
    pub fn of(record: &ViolationRecord) -> Self {
        Self {
            articolo: extract_number(Some(&record.articolo)),
            comma: extract_number(record.comma.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_are_zero() {
        assert_eq!(extract_number(None), 0);
        assert_eq!(extract_number(Some("")), 0);
        assert_eq!(extract_number(Some("Art.")), 0);
    }

    #[test]
    fn first_digit_run() {
        assert_eq!(extract_number(Some("Art. 15")), 15);
        assert_eq!(extract_number(Some("3")), 3);
        assert_eq!(extract_number(Some("Art. 7bis")), 7);
        assert_eq!(extract_number(Some("Art. 12 comma 4")), 12);
        assert_eq!(extract_number(Some("007")), 7);
    }

    #[test]
    fn signs_and_decimals_are_not_parsed() {
        assert_eq!(extract_number(Some("-5")), 5);
        assert_eq!(extract_number(Some("2.5")), 2);
    }

    #[test]
    fn non_ascii_digits_are_ignored() {
        // Arabic-Indic digits are not decimal digits for citation purposes.
        assert_eq!(extract_number(Some("Art. ٣ 4")), 4);
    }

    #[test]
    fn oversized_run_saturates() {
        assert_eq!(
            extract_number(Some("Art. 99999999999999999999999")),
            u64::MAX
        );
    }

    #[test]
    fn key_orders_article_then_paragraph() {
        let a = CitationKey { articolo: 7, comma: 0 };
        let b = CitationKey { articolo: 7, comma: 1 };
        let c = CitationKey { articolo: 12, comma: 0 };
        assert!(a < b);
        assert!(b < c);
    }
}
