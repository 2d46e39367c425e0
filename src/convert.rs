//! The batch run: load the export, walk entries in input order, reconcile
//! each against prior output, copy photos, and report.
//!
//! Entries are processed strictly one at a time. A failure inside one entry
//! is caught here, printed with the entry's uuid, and counted; it never
//! aborts the batch. Only a missing or unparseable input document is fatal.

use crate::frontmatter::Frontmatter;
use crate::localtime::ZoneOffsets;
use crate::model::{Entry, Export};
use crate::photos;
use crate::reconcile::{self, Action, Outcome};
use crate::{content, naming};
use chrono::Local;
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Configuration required to run a conversion.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub update: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub fallback: ZoneOffsets,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Run the whole conversion. Fatal errors (unreadable or unparseable input)
/// come back as `Err`; per-entry problems only show up in `Stats::errors`.
pub fn execute(config: &ConvertConfig) -> Result<Stats> {
    let raw = fs::read_to_string(&config.input)
        .wrap_err_with(|| format!("Failed to read input: {}", config.input.display()))?;
    let export: Export = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Failed to parse JSON: {}", config.input.display()))?;

    let mut stats = Stats::default();
    if export.entries.is_empty() {
        if !config.quiet {
            eprintln!("No entries found in {}.", config.input.display());
        }
        return Ok(stats);
    }

    let entries_dir = config.output_dir.join("journal-entries");
    let photos_dir = entries_dir.join("photos");
    let source_photos_dir = config
        .input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("photos");

    if !config.dry_run {
        fs::create_dir_all(&photos_dir).wrap_err_with(|| {
            format!("Failed to create output directory: {}", photos_dir.display())
        })?;
    }

    if config.dry_run && !config.quiet {
        eprintln!("Dry run: no changes will be made.");
    }

    let pb = if config.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(export.entries.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
            )
            .unwrap()
            .progress_chars("=>-"),
        );
        bar.println(format!("Found {} entries.", export.entries.len()));
        bar
    };

    for entry in &export.entries {
        stats.total += 1;
        match process_entry(entry, &entries_dir, &photos_dir, &source_photos_dir, config, &pb) {
            Ok(Outcome::Created) => stats.created += 1,
            Ok(Outcome::Updated) => stats.updated += 1,
            Ok(Outcome::Skipped) => stats.skipped += 1,
            Err(e) => {
                stats.errors += 1;
                pb.println(format!("Error [{}]: {:#}", entry.uuid8(), e));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if !config.quiet {
        let mut summary = format!(
            "Done. {} entries: {} created, {} updated, {} skipped.",
            stats.total, stats.created, stats.updated, stats.skipped
        );
        if stats.errors > 0 {
            summary.push_str(&format!(" Completed with {} error(s).", stats.errors));
        }
        eprintln!("{}", summary);
    }

    if !config.dry_run {
        append_run_log(config, &stats).wrap_err("Failed to write conversion log")?;
        if !config.quiet {
            eprintln!(
                "Log written to: {}",
                config.output_dir.join("conversion_log.txt").display()
            );
        }
    }

    Ok(stats)
}

fn process_entry(
    entry: &Entry,
    entries_dir: &Path,
    photos_dir: &Path,
    source_photos_dir: &Path,
    config: &ConvertConfig,
    pb: &ProgressBar,
) -> Result<Outcome> {
    // Entries without body text produce no file at all.
    let text = match entry.text.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => {
            if config.verbose {
                pb.println(format!("Skipped (no text): {}", entry.uuid_or_unknown()));
            }
            return Ok(Outcome::Skipped);
        }
    };

    let filename = naming::derive_filename(entry, config.fallback);
    let action = reconcile::decide(entry, entries_dir, config.update, config.fallback);

    match &action {
        Action::Blocked => {
            if config.verbose {
                pb.println(format!("Skipped (exists): {}", filename));
            }
            return Ok(Outcome::Skipped);
        }
        Action::Current => {
            if config.verbose {
                pb.println(format!("Skipped (not modified): {}", filename));
            }
            return Ok(Outcome::Skipped);
        }
        Action::Create | Action::Update { .. } => {}
    }

    let fm = Frontmatter::build(entry, config.fallback);
    let document = content::assemble(&fm, text, &entry.photos);
    let desired = entries_dir.join(&filename);
    let outcome = reconcile::apply(&action, &desired, &document, config.dry_run)?;

    photos::copy_entry_photos(
        &entry.photos,
        source_photos_dir,
        photos_dir,
        config.dry_run,
        config.verbose,
        pb,
    )?;

    if config.verbose {
        match outcome {
            Outcome::Created => pb.println(format!("Created:  {}", filename)),
            Outcome::Updated => pb.println(format!("Updated:  {}", filename)),
            Outcome::Skipped => {}
        }
    }

    Ok(outcome)
}

/// Append one run record to the persistent history file.
fn append_run_log(config: &ConvertConfig, stats: &Stats) -> Result<()> {
    let path = config.output_dir.join("conversion_log.txt");
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let mode = if config.update { "update" } else { "skip" };
    let rule = "=".repeat(80);
    let thin_rule = "-".repeat(80);

    let record = format!(
        "{rule}\n\
         Run: {timestamp}\n\
         Input: {input}\n\
         Output: {output}\n\
         Mode: {mode}\n\
         {thin_rule}\n\
         Total entries processed: {total}\n\
         New files created: {created}\n\
         Files updated: {updated}\n\
         Files skipped: {skipped}\n\
         Errors: {errors}\n\
         {rule}\n\n",
        input = config.input.display(),
        output = config.output_dir.display(),
        total = stats.total,
        created = stats.created,
        updated = stats.updated,
        skipped = stats.skipped,
        errors = stats.errors,
    );

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("Failed to open: {}", path.display()))?;
    file.write_all(record.as_bytes())
        .wrap_err("Failed to append run record")?;
    Ok(())
}
