//! # Check CLI — Validate a data file.
//!
//! Every draft is normalized and validated; all problems are reported, not
//! just the first. Exit code 1 when any draft is invalid.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use prontuario_core::{classify, ColorTag, ValidationError, ViolationDraft};
use prontuario_store::seed;

/// Arguments for `prontuario check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// YAML or JSON data file.
    pub file: PathBuf,
}

/// A draft that failed validation, by position in the file.
#[derive(Debug)]
pub struct Finding {
    pub index: usize,
    pub articolo: String,
    pub error: ValidationError,
}

/// Execute `prontuario check`.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let drafts = seed::load_drafts(&args.file)?;
    let total = drafts.len();

    for draft in &drafts {
        if !draft.categoria.trim().is_empty() && classify(Some(&draft.categoria)) == ColorTag::Slate
        {
            tracing::warn!(categoria = %draft.categoria, "category not recognized, shown as slate");
        }
    }

    let findings = check_drafts(drafts);
    for f in &findings {
        println!("  #{:<4} {:<12} {}", f.index + 1, f.articolo, f.error);
    }

    if findings.is_empty() {
        println!("{}: {total} records OK", args.file.display());
        Ok(0)
    } else {
        println!(
            "{}: {} of {total} records invalid",
            args.file.display(),
            findings.len()
        );
        Ok(1)
    }
}

/// Validate every draft, collecting the failures.
pub fn check_drafts(drafts: Vec<ViolationDraft>) -> Vec<Finding> {
    drafts
        .into_iter()
        .enumerate()
        .filter_map(|(index, draft)| {
            let draft = draft.normalized();
            draft.validate().err().map(|error| Finding {
                index,
                articolo: draft.articolo,
                error,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn data_file(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn examples_pass() {
        assert!(check_drafts(seed::example_drafts()).is_empty());
    }

    #[test]
    fn reports_every_invalid_draft() {
        let mut drafts = seed::example_drafts();
        drafts[0].descrizione = " ".into();
        drafts[1].categoria = String::new();
        let findings = check_drafts(drafts);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].error.field(), Some("descrizione"));
        assert_eq!(findings[1].index, 1);
        assert_eq!(findings[1].error.field(), Some("categoria"));
    }

    #[test]
    fn exit_codes() {
        let good = data_file(
            "- articolo: \"Art. 1\"\n  categoria: \"COMMERCIO\"\n  descrizione: \"Vendita ambulante\"\n  pmr: \"100,00\"\n",
        );
        let code = run_check(&CheckArgs {
            file: good.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(code, 0);

        let bad = data_file("- articolo: \"\"\n  categoria: \"COMMERCIO\"\n  descrizione: \"x\"\n  pmr: 1\n");
        let code = run_check(&CheckArgs {
            file: bad.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let err = run_check(&CheckArgs {
            file: PathBuf::from("/nonexistent/sanzioni.yaml"),
        });
        assert!(err.is_err());
    }
}
