//! Copy referenced photo blobs into the vault's `photos/` pool.
//!
//! Source bundles name blobs inconsistently — by content hash or by
//! identifier, with `jpg` or `jpeg` spellings — so a fixed candidate list is
//! probed in order. The destination name is always
//! `<identifier>.<normalized extension>`, and an existing destination is
//! left alone, which keeps re-runs cheap without any timestamp bookkeeping
//! at the photo level.

use crate::content::normalize_extension;
use crate::model::Photo;
use eyre::{Context, Result};
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions tried against the content hash when no declared name matches.
const SWEEP_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "heic"];

/// Copy every photo of one entry. A blob missing from the source pool is a
/// verbose warning, not an error; a failed copy is an error for the entry.
pub fn copy_entry_photos(
    photos: &[Photo],
    source_dir: &Path,
    dest_dir: &Path,
    dry_run: bool,
    verbose: bool,
    pb: &ProgressBar,
) -> Result<()> {
    for photo in photos {
        let identifier = match photo.identifier.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => continue,
        };
        let md5 = photo.md5.as_deref().unwrap_or("");
        let raw = photo.media_type.as_deref().unwrap_or("jpeg").to_lowercase();
        let norm = normalize_extension(photo.media_type.as_deref());

        let Some(source) = locate_source(source_dir, md5, identifier, &raw, &norm) else {
            if verbose {
                pb.println(format!(
                    "  Warning: photo not found for identifier {}",
                    identifier
                ));
            }
            continue;
        };

        let dest = dest_dir.join(format!("{}.{}", identifier, norm));
        if dest.exists() {
            continue;
        }
        if dry_run {
            if verbose {
                pb.println(format!(
                    "  Would copy: {} -> {}",
                    file_name(&source),
                    file_name(&dest)
                ));
            }
            continue;
        }
        fs::copy(&source, &dest)
            .wrap_err_with(|| format!("Failed to copy photo: {}", source.display()))?;
        if verbose {
            pb.println(format!(
                "  Copied: {} -> {}",
                file_name(&source),
                file_name(&dest)
            ));
        }
    }
    Ok(())
}

/// Probe the known naming schemes, hash-based first, then sweep the common
/// image extensions against the hash.
fn locate_source(
    dir: &Path,
    md5: &str,
    identifier: &str,
    raw_ext: &str,
    norm_ext: &str,
) -> Option<PathBuf> {
    let candidates = [
        format!("{}.{}", md5, raw_ext),
        format!("{}.{}", md5, norm_ext),
        format!("{}.{}", identifier, raw_ext),
        format!("{}.{}", identifier, norm_ext),
        format!("{}.jpeg", md5),
        format!("{}.jpeg", identifier),
        format!("{}.jpg", md5),
        format!("{}.jpg", identifier),
    ];
    for name in candidates {
        let path = dir.join(name);
        if path.exists() {
            return Some(path);
        }
    }
    for ext in SWEEP_EXTENSIONS {
        let path = dir.join(format!("{}.{}", md5, ext));
        if path.exists() {
            return Some(path);
        }
    }
    None
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
