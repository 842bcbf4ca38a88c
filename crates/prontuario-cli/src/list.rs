//! # List CLI — Browse a data file through the catalog pipeline.
//!
//! Applies the same category filter, search and canonical order as the
//! service, then prints a table (or JSON) followed by the stats line.
//!
//! ```bash
//! prontuario list --data sanzioni.yaml --search "suolo pubblico"
//! ```

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use prontuario_core::{truncate_label, CatalogStats, ViolationRecord, VisibleQuery};

use crate::load_records;

/// Arguments for `prontuario list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// YAML or JSON data file. Defaults to the built-in example records.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Show only this category (exact match).
    #[arg(long)]
    pub categoria: Option<String>,

    /// Case-insensitive search across citation, category and text fields.
    #[arg(long)]
    pub search: Option<String>,

    /// Print `{ stats, items }` as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn query(&self) -> VisibleQuery {
        VisibleQuery::new(
            self.categoria.clone().unwrap_or_default(),
            self.search.clone().unwrap_or_default(),
        )
    }
}

/// Execute `prontuario list`.
pub fn run_list(args: &ListArgs) -> Result<u8> {
    let records = load_records(args.data.as_deref())?;
    let query = args.query();
    let visible = query.apply(&records);
    let stats = CatalogStats::new(records.len(), visible.len(), &query);
    tracing::debug!(total = stats.total, visible = stats.visible, "pipeline applied");

    if args.json {
        let out = serde_json::json!({ "stats": stats, "items": visible });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_table(&visible, &stats));
    }
    Ok(0)
}

/// Table of visible records followed by the stats line.
pub fn render_table(visible: &[&ViolationRecord], stats: &CatalogStats) -> String {
    let mut out = String::new();
    if visible.is_empty() {
        let message = if stats.total == 0 {
            "Nessuna violazione presente"
        } else {
            "Nessun risultato trovato"
        };
        let _ = writeln!(out, "{message}");
    } else {
        let _ = writeln!(
            out,
            "  {:<10} {:<6} {:>10}  {:<32} {}",
            "ARTICOLO", "COMMA", "PMR", "CATEGORIA", "DESCRIZIONE"
        );
        for record in visible {
            let _ = writeln!(
                out,
                "  {:<10} {:<6} {:>10}  {:<32} {}",
                record.articolo,
                record.comma.as_deref().unwrap_or("-"),
                record.pmr.to_string(),
                truncate_label(&record.categoria, 32),
                record.descrizione
            );
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", stats_line(stats));
    out
}

/// `Totale: N`, plus results and active filters when filtering.
pub fn stats_line(stats: &CatalogStats) -> String {
    let mut line = format!("Totale: {}", stats.total);
    if stats.is_filtered() {
        let _ = write!(line, "  Risultati: {}", stats.visible);
    }
    if let Some(search) = &stats.search {
        let _ = write!(line, "  \"{search}\"");
    }
    if let Some(badge) = &stats.category_badge {
        let _ = write!(line, "  [{}]", badge.label);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use prontuario_core::visible_records;
    use prontuario_store::seed;

    fn args(categoria: Option<&str>, search: Option<&str>) -> ListArgs {
        ListArgs {
            data: None,
            categoria: categoria.map(str::to_string),
            search: search.map(str::to_string),
            json: false,
        }
    }

    fn render(args: &ListArgs) -> String {
        let records = seed::example_records(Utc::now());
        let query = args.query();
        let visible = visible_records(&records, &query.category, &query.search);
        let stats = CatalogStats::new(records.len(), visible.len(), &query);
        render_table(&visible, &stats)
    }

    #[test]
    fn table_is_in_canonical_order() {
        let out = render(&args(None, None));
        let art7 = out.find("Art. 7").unwrap();
        let art12 = out.find("Art. 12").unwrap();
        assert!(art7 < art12);
        assert!(out.contains("150,00"));
        assert!(out.trim_end().ends_with("Totale: 2"));
    }

    #[test]
    fn filtered_stats_line() {
        let out = render(&args(Some("CONVIVENZA CIVILE"), None));
        assert!(!out.contains("Art. 12"));
        assert!(out.contains("Totale: 2  Risultati: 1  [CONVIVENZA CIVILE]"));
    }

    #[test]
    fn search_without_hits() {
        let out = render(&args(None, Some("parcheggio")));
        assert!(out.starts_with("Nessun risultato trovato"));
        assert!(out.contains("Risultati: 0  \"parcheggio\""));
    }

    #[test]
    fn empty_catalog_message() {
        let stats = CatalogStats::new(0, 0, &VisibleQuery::default());
        assert!(render_table(&[], &stats).starts_with("Nessuna violazione presente"));
    }

    #[test]
    fn run_list_over_examples() {
        let mut list = args(None, Some("recidiva"));
        list.json = true;
        assert_eq!(run_list(&list).unwrap(), 0);
    }
}
