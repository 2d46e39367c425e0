use clap::Parser;
use dayone_obsidian_export::convert::{self, ConvertConfig};
use dayone_obsidian_export::localtime::{self, ZoneOffsets};
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert DayOne journal exports to Obsidian-compatible Markdown files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the DayOne JSON export.
    /// Defaults to "DayOne Export.json" if not set in config.
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Directory to write the converted vault into.
    /// Defaults to ./output if not set in config.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Overwrite previously converted entries when the export is newer.
    /// Without this flag, existing files are never touched.
    #[arg(short, long)]
    update: bool,

    /// Report every action without touching the filesystem.
    #[arg(long)]
    dry_run: bool,

    /// Print each file created, updated or skipped.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress standard output (progress bars).
    #[arg(short, long)]
    quiet: bool,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/dayone-obsidian-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Timezone assumed for entries whose zone is missing or unrecognized
    /// (e.g. "America/Denver").
    #[arg(long, value_name = "NAME")]
    fallback_zone: Option<String>,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    fallback_zone: Option<String>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        // Search: XDG/OS config dir, then nothing
        dirs::config_dir()
            .map(|d| d.join("dayone-obsidian-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn resolve_fallback(name: Option<String>) -> Result<ZoneOffsets> {
    match name {
        None => Ok(localtime::DEFAULT_FALLBACK),
        Some(name) => localtime::lookup(&name).ok_or_else(|| {
            eyre!(
                "Unknown fallback zone: {}\nKnown zones: {}",
                name,
                localtime::known_zones().join(", ")
            )
        }),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 2. Resolve input path (CLI > Config > Default)
    let input = cli
        .input
        .or(file_cfg.input)
        .unwrap_or_else(|| PathBuf::from("DayOne Export.json"));

    if !input.exists() {
        return Err(eyre!(
            "Input file not found: {}\nUse --input to point at the DayOne JSON export.",
            input.display()
        ));
    }

    // 3. Resolve output directory (CLI > Config > Default)
    let output_dir = cli
        .output
        .or(file_cfg.output)
        .unwrap_or_else(|| PathBuf::from("./output"));

    // 4. Resolve the fallback timezone (CLI > Config > Central time)
    let fallback = resolve_fallback(cli.fallback_zone.or(file_cfg.fallback_zone))?;

    // 5. Build the conversion config
    let config = ConvertConfig {
        input,
        output_dir,
        update: cli.update,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
        quiet: cli.quiet,
        fallback,
    };

    // 6. Run the business logic
    let stats = convert::execute(&config)?;
    Ok(if stats.errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
