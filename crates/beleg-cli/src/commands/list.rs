//! List command - show pending invoices without processing.

use std::fs;

use console::style;

use beleg_core::BelegConfig;

use super::process::pending_pdfs;

pub fn run(config: &BelegConfig) -> anyhow::Result<()> {
    fs::create_dir_all(&config.folders.inbox)?;

    let files = pending_pdfs(&config.folders.inbox)?;
    if files.is_empty() {
        println!("No PDF files found in {}/.", config.folders.inbox.display());
        return Ok(());
    }

    println!();
    println!(
        "Found {} PDF(s) in {}/:",
        files.len(),
        config.folders.inbox.display()
    );
    println!();

    for file in &files {
        let size_kb = fs::metadata(file)
            .map(|m| m.len() as f64 / 1024.0)
            .unwrap_or(0.0);
        println!(
            "  {} {} ({:.1} KB)",
            style("•").blue(),
            file.file_name().and_then(|s| s.to_str()).unwrap_or("?"),
            size_kb
        );
    }
    println!();

    Ok(())
}
