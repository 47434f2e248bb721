//! Moves processed invoices into vendor-named archive folders.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use beleg_core::vendor_key;

/// Relocate a processed document into `<archive_root>/<vendor key>/`.
///
/// On filename collision a numeric suffix is appended before the extension
/// (`invoice_1.pdf`, `invoice_2.pdf`, …). Returns the destination path.
pub fn move_to_archive(file: &Path, vendor: &str, archive_root: &Path) -> anyhow::Result<PathBuf> {
    let folder = archive_root.join(vendor_key(vendor));
    fs::create_dir_all(&folder)
        .with_context(|| format!("creating archive folder {}", folder.display()))?;

    let filename = file
        .file_name()
        .with_context(|| format!("source path {} has no filename", file.display()))?;
    let mut destination = folder.join(filename);

    if destination.exists() {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");
        let extension = file.extension().and_then(|e| e.to_str());

        let mut counter = 1;
        while destination.exists() {
            let name = match extension {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            };
            destination = folder.join(name);
            counter += 1;
        }
    }

    // rename does not cross filesystems; fall back to copy + remove
    if fs::rename(file, &destination).is_err() {
        fs::copy(file, &destination)
            .with_context(|| format!("copying {} to archive", file.display()))?;
        fs::remove_file(file)
            .with_context(|| format!("removing {} after archiving", file.display()))?;
    }

    debug!("archived {} to {}", file.display(), destination.display());
    Ok(destination)
}
