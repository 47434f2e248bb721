//! Process command - extract, record and archive all pending invoices.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use beleg_core::{BelegConfig, ExtractionStatus, Extractor, InvoiceRecord, PdfExtractor};

use crate::archive::move_to_archive;
use crate::ledger::Ledger;

/// Outcome of one document, kept for the summary.
struct ProcessOutcome {
    record: InvoiceRecord,
    error: Option<String>,
}

pub fn run(config: &BelegConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let folders = &config.folders;

    fs::create_dir_all(&folders.inbox)
        .with_context(|| format!("creating {}", folders.inbox.display()))?;
    fs::create_dir_all(&folders.archive)
        .with_context(|| format!("creating {}", folders.archive.display()))?;

    let ledger = Ledger::new(
        folders.ledger.clone(),
        config.extraction.expense_categories.clone(),
    );
    ledger.ensure_exists()?;

    let files = pending_pdfs(&folders.inbox)?;
    if files.is_empty() {
        println!("No PDF files found in {}/.", folders.inbox.display());
        return Ok(());
    }

    println!(
        "{} Found {} PDF(s) to process",
        style("ℹ").blue(),
        files.len()
    );

    let existing = ledger.existing_filenames()?;
    let extractor = Extractor::new(&config.extraction);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut outcomes = Vec::new();
    let mut skipped = 0usize;

    for path in files {
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        pb.set_message(filename.clone());

        if existing.contains(&filename) {
            debug!("skipping {} (already recorded)", filename);
            skipped += 1;
            pb.inc(1);
            continue;
        }

        let record = extract_record(&extractor, &path, &filename, config.pdf.max_pages);
        outcomes.push(record_and_archive(&ledger, record, &path, &folders.archive));
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    print_summary(&outcomes, skipped, folders, start);
    Ok(())
}

/// PDFs waiting in the inbox folder, sorted by name.
pub(crate) fn pending_pdfs(inbox: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = inbox.join("*.pdf");
    let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .filter_map(|r| r.ok())
        .collect();
    files.sort();
    Ok(files)
}

/// The per-document boundary: any failure becomes a manual-review record
/// instead of aborting the batch.
fn extract_record(
    extractor: &Extractor,
    path: &Path,
    filename: &str,
    max_pages: usize,
) -> InvoiceRecord {
    match PdfExtractor::open(path).and_then(|pdf| pdf.extract_text(max_pages)) {
        Ok(text) => extractor.extract(filename, &text),
        Err(e) => {
            warn!("failed to read {}: {}", path.display(), e);
            extractor.failure_record(filename, e.to_string())
        }
    }
}

fn record_and_archive(
    ledger: &Ledger,
    record: InvoiceRecord,
    path: &Path,
    archive_root: &Path,
) -> ProcessOutcome {
    if let Err(e) = ledger.append(&record) {
        error!("failed to record {}: {}", record.filename, e);
        return ProcessOutcome {
            record,
            error: Some(e.to_string()),
        };
    }

    match move_to_archive(path, &record.vendor, archive_root) {
        Ok(destination) => {
            debug!(
                "archived {} to {}",
                record.filename,
                destination.display()
            );
            ProcessOutcome {
                record,
                error: None,
            }
        }
        Err(e) => {
            error!("failed to archive {}: {}", record.filename, e);
            ProcessOutcome {
                record,
                error: Some(e.to_string()),
            }
        }
    }
}

fn print_summary(
    outcomes: &[ProcessOutcome],
    skipped: usize,
    folders: &beleg_core::FolderConfig,
    start: Instant,
) {
    let recorded = outcomes.iter().filter(|o| o.error.is_none()).count();
    let errors = outcomes.iter().filter(|o| o.error.is_some()).count();

    println!();
    println!(
        "{} Processed {} file(s) in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} recorded, {} skipped, {} errors",
        style(recorded).green(),
        style(skipped).yellow(),
        style(errors).red()
    );
    println!("   Ledger: {}", folders.ledger.display());

    let needs_attention: Vec<&ProcessOutcome> = outcomes
        .iter()
        .filter(|o| o.record.status != ExtractionStatus::Ok)
        .collect();

    if !needs_attention.is_empty() {
        println!();
        println!("{}", style("Needs attention:").yellow());
        for outcome in needs_attention {
            let marker = match outcome.record.status {
                ExtractionStatus::Uncertain => style("⚠").yellow(),
                _ => style("✗").red(),
            };
            println!(
                "  {} {} [{}] {}",
                marker,
                outcome.record.filename,
                outcome.record.status,
                outcome.record.notes_text()
            );
        }
    }

    if errors > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in outcomes.iter().filter(|o| o.error.is_some()) {
            println!(
                "  - {}: {}",
                outcome.record.filename,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
