//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{import, ImportFormat, Ledger};

use super::{print_json, save_ledger};

pub fn cmd_import(
    ledger: &mut Ledger,
    file: &Path,
    format: Option<ImportFormat>,
    json: bool,
) -> Result<()> {
    let format = format.or_else(|| ImportFormat::from_path(file)).ok_or_else(|| {
        anyhow::anyhow!(
            "Could not detect import format from file name.\n\
             Specify --format with one of: csv, json"
        )
    })?;

    let reader =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let parsed = import::parse(reader, format)
        .with_context(|| format!("Failed to parse {} file: {}", format, file.display()))?;

    if !json {
        println!("📥 Importing {} from {}...", format, file.display());
        println!("   Found {} expenses", parsed.expenses.len());
    }

    let stats = ledger.import_expenses(parsed);
    if stats.imported > 0 {
        save_ledger(ledger)?;
    }

    if json {
        return print_json(&stats);
    }

    println!("✅ Import complete!");
    println!("   Imported: {}", stats.imported);
    println!("   Skipped (duplicates): {}", stats.duplicates);
    if stats.skipped > 0 {
        println!("   Skipped (invalid rows): {}", stats.skipped);
    }
    if !stats.new_categories.is_empty() {
        println!("   New categories: {}", stats.new_categories.join(", "));
    }

    if stats.imported > 0 {
        println!();
        println!("Run 'tally forecast next' to see where spending is heading.");
    }

    Ok(())
}
