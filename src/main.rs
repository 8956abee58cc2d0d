//! Command-line entry point.
//!
//! Owns every side effect: argument handling, reading the catalog export,
//! loading and persisting the seen-set, and writing the PDF. The seen-set
//! only moves forward after the document has been saved, so a failed run
//! never records labels that were not produced.

use anyhow::Context;
use clap::Parser;
use maglabels::{LayoutMode, PageGeometry, SeenSet, catalog, filter_new, layout, pdf};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Magazine label sheet generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Layout mode selecting the label size and tracking file
    #[arg(value_enum)]
    mode: LayoutMode,

    /// Catalog export to read (`.csv` is appended when no extension is given)
    input: String,

    /// Directory for the output PDF and the seen-set files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

/// Appends a `.csv` suffix when the input name carries no extension.
fn resolve_input_path(input: &str) -> PathBuf {
    let path = PathBuf::from(input);
    if path.extension().is_none() {
        path.with_extension("csv")
    } else {
        path
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let input = resolve_input_path(&args.input);
    if !input.exists() {
        anyhow::bail!("input file not found: {}", input.display());
    }

    let file =
        File::open(&input).with_context(|| format!("opening {}", input.display()))?;
    let records = catalog::read_records(BufReader::new(file))?;
    println!("Read {} rows from {}", records.len(), input.display());

    let seen_path = args.out_dir.join(args.mode.seen_set_filename());
    let seen = SeenSet::load(&seen_path)?;
    let (new_records, updated) = filter_new(records, &seen);

    if new_records.is_empty() {
        println!("No new labels.");
        return Ok(());
    }

    let config = args.mode.config();
    let page = PageGeometry::a4();
    let pages = layout::layout(&new_records, &config, &page)?;

    let output = args.out_dir.join(args.mode.output_filename());
    let mut doc = pdf::render(&pages, &config, &page);
    pdf::save(&mut doc, &output)?;

    // The seen-set is rewritten only after the document is on disk
    updated.save(&seen_path)?;

    println!("Generated {} labels.", new_records.len());
    println!("  PDF:      {}", output.display());
    println!("  Seen-set: {}", seen_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_input_appends_csv() {
        assert_eq!(resolve_input_path("catalog"), PathBuf::from("catalog.csv"));
    }

    #[test]
    fn test_resolve_input_keeps_extension() {
        assert_eq!(
            resolve_input_path("export.txt"),
            PathBuf::from("export.txt")
        );
        assert_eq!(
            resolve_input_path("catalog.csv"),
            PathBuf::from("catalog.csv")
        );
    }
}
