//! # Classify CLI — Color tag for category labels.

use anyhow::Result;
use clap::Args;
use prontuario_core::classify;

/// Arguments for `prontuario classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Category labels to classify.
    #[arg(required = true)]
    pub labels: Vec<String>,
}

/// Execute `prontuario classify`.
pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    for label in &args.labels {
        println!("{}", classify_line(label));
    }
    Ok(0)
}

/// `<tag>  <badge classes>  <label>`
pub fn classify_line(label: &str) -> String {
    let color = classify(Some(label));
    format!("{:<8} {:<48} {label}", color.as_str(), color.style().badge)
}
