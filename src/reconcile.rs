//! Create/update/skip decisions for one entry against prior output.
//!
//! Matching keys on the `(<uuid8>).md` filename suffix, the only part of a
//! filename that survives title and timezone changes. Staleness compares the
//! entry's would-be `modified` stamp with the one recorded in the matched
//! file's frontmatter; both sides use the same format, so string order is
//! time order. Replacement writes the new file before removing the old name
//! — an interrupted run can leave a duplicate but never a gap.

use crate::frontmatter;
use crate::localtime::ZoneOffsets;
use crate::model::Entry;
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Skipped,
}

/// The write (or non-write) one entry needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No prior file carries this uuid prefix.
    Create,
    /// A prior file exists and the entry is newer; `stale` is removed after
    /// the rewrite when the derived name changed.
    Update { stale: PathBuf },
    /// A prior file exists and update mode is off.
    Blocked,
    /// A prior file exists and is already up to date.
    Current,
}

/// Find the prior output file carrying this uuid prefix, if any.
///
/// Several files can share a prefix after manual copies in the vault; the
/// lexicographically smallest name wins so reruns stay deterministic.
pub fn find_existing(entries_dir: &Path, uuid8: &str) -> Option<PathBuf> {
    let suffix = format!("({}).md", uuid8);
    let mut matches: Vec<PathBuf> = fs::read_dir(entries_dir)
        .ok()?
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
        .map(|entry| entry.path())
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Decide what this entry needs, given the destination directory's current
/// contents and the update-mode flag.
pub fn decide(entry: &Entry, entries_dir: &Path, update: bool, fallback: ZoneOffsets) -> Action {
    let existing = match find_existing(entries_dir, entry.uuid8()) {
        None => return Action::Create,
        Some(existing) => existing,
    };
    if !update {
        return Action::Blocked;
    }

    let recorded = fs::read_to_string(&existing)
        .ok()
        .and_then(|content| frontmatter::read_modified_stamp(&content));
    match recorded {
        // A file whose stamp cannot be read is treated as older than any entry.
        None => Action::Update { stale: existing },
        Some(recorded) => {
            let newer = frontmatter::local_modified_stamp(entry, fallback)
                .is_some_and(|stamp| stamp > recorded);
            if newer {
                Action::Update { stale: existing }
            } else {
                Action::Current
            }
        }
    }
}

/// Perform the action's side effect and report the outcome. `desired` is the
/// path under the newly derived filename; `content` the assembled document.
pub fn apply(action: &Action, desired: &Path, content: &str, dry_run: bool) -> Result<Outcome> {
    match action {
        Action::Create => {
            if !dry_run {
                fs::write(desired, content)
                    .wrap_err_with(|| format!("Failed to write: {}", desired.display()))?;
            }
            Ok(Outcome::Created)
        }
        Action::Update { stale } => {
            if !dry_run {
                fs::write(desired, content)
                    .wrap_err_with(|| format!("Failed to write: {}", desired.display()))?;
                if stale != desired {
                    fs::remove_file(stale).wrap_err_with(|| {
                        format!("Failed to remove stale file: {}", stale.display())
                    })?;
                }
            }
            Ok(Outcome::Updated)
        }
        Action::Blocked | Action::Current => Ok(Outcome::Skipped),
    }
}
