//! # Categories CLI — Print the category table.

use anyhow::Result;
use prontuario_core::CATEGORIES;

/// Execute `prontuario categories`.
pub fn run_categories() -> Result<u8> {
    for line in category_lines() {
        println!("{line}");
    }
    println!();
    println!("Total: {} categories", CATEGORIES.len());
    Ok(0)
}

/// One `<tag>  <short label>  <stored value>` line per category.
///
/// The stored value is what `list --categoria` matches exactly.
pub fn category_lines() -> Vec<String> {
    CATEGORIES
        .iter()
        .map(|c| format!("  {:<8} {:<24} {}", c.color.as_str(), c.short_label, c.value))
        .collect()
}
