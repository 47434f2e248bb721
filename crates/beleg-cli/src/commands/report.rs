//! Report command - aggregate statistics from the ledger.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use console::style;

use beleg_core::{BelegConfig, ExtractionStatus};

use crate::ledger::{Cell, Ledger, LedgerRow, COL_DATE, COL_GROSS, COL_STATUS, COL_VENDOR, HEADERS};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Export the raw ledger rows as CSV
    #[arg(long)]
    export: Option<PathBuf>,
}

pub fn run(args: ReportArgs, config: &BelegConfig) -> anyhow::Result<()> {
    let ledger = Ledger::new(
        config.folders.ledger.clone(),
        config.extraction.expense_categories.clone(),
    );

    if !ledger.exists() {
        println!(
            "No ledger found at {}. Process some invoices first.",
            config.folders.ledger.display()
        );
        return Ok(());
    }

    let rows = ledger.rows()?;

    let mut total_gross = 0.0f64;
    let mut status_counts: HashMap<String, usize> = HashMap::new();
    let mut vendor_counts: HashMap<String, usize> = HashMap::new();
    let mut month_counts: BTreeMap<String, usize> = BTreeMap::new();

    for row in &rows {
        let vendor = row.text(COL_VENDOR).unwrap_or("Unknown").to_string();
        *vendor_counts.entry(vendor).or_default() += 1;

        if let Some(date) = row
            .text(COL_DATE)
            .and_then(|d| NaiveDate::parse_from_str(d, "%d.%m.%Y").ok())
        {
            *month_counts
                .entry(date.format("%Y-%m").to_string())
                .or_default() += 1;
        }

        if let Some(gross) = row.number(COL_GROSS) {
            total_gross += gross;
        }

        let status = row.text(COL_STATUS).unwrap_or("OK").to_string();
        *status_counts.entry(status).or_default() += 1;
    }

    println!();
    println!("{}", style("INVOICE TRACKING REPORT").bold());
    println!();
    println!("Total invoices: {}", rows.len());
    println!("Total gross amount: {:.2} €", total_gross);

    println!();
    println!("{}", style("Extraction status:").bold());
    for status in [
        ExtractionStatus::Ok,
        ExtractionStatus::Uncertain,
        ExtractionStatus::ManualReviewNeeded,
    ] {
        if let Some(count) = status_counts.get(status.as_str()) {
            println!("  {}: {}", status, count);
        }
    }

    println!();
    println!("{}", style("Top vendors:").bold());
    let mut vendors: Vec<(String, usize)> = vendor_counts.into_iter().collect();
    vendors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (vendor, count) in vendors.into_iter().take(10) {
        println!("  {}: {} invoice(s)", vendor, count);
    }

    println!();
    println!("{}", style("Invoices by month:").bold());
    for (month, count) in month_counts.iter().rev().take(12) {
        println!("  {}: {} invoice(s)", month, count);
    }
    println!();

    if let Some(path) = args.export {
        export_csv(&path, &rows)?;
        println!(
            "{} Ledger exported to {}",
            style("✓").green(),
            path.display()
        );
    }

    Ok(())
}

fn export_csv(path: &Path, rows: &[LedgerRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(HEADERS)?;
    for row in rows {
        let record: Vec<String> = (0..HEADERS.len())
            .map(|col| match row.0.get(col) {
                Some(Cell::Text(s)) => s.clone(),
                Some(Cell::Number(n)) => n.to_string(),
                _ => String::new(),
            })
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
