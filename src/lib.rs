//! # dayone-obsidian-export
//!
//! A CLI tool that converts [DayOne](https://dayoneapp.com) journal exports into
//! Markdown files ready for an [Obsidian](https://obsidian.md) vault.
//!
//! ## What it does
//!
//! DayOne exports a journal as a single JSON document (`DayOne Export.json`)
//! plus a `photos/` directory of image blobs named by content hash. This tool
//! reads that bundle and writes each entry as a standalone Markdown file with
//! YAML frontmatter carrying the entry's metadata (timestamps in the entry's
//! own timezone, location, weather, tags, flags). DayOne's proprietary
//! `![](dayone-moment://...)` image tokens are rewritten to `![[photos/...]]`
//! wiki embeds and the referenced blobs are copied alongside the entries.
//!
//! The export bundle is only ever **read** — your journal is never modified.
//!
//! ## Incremental conversion
//!
//! Every filename ends in the first 8 characters of the entry's uuid, which is
//! how repeated runs find prior output even after a title or timezone change.
//! Without `--update`, existing files are never touched. With it, an entry is
//! rewritten only when its modification time is newer than the `modified:`
//! stamp recorded in the existing file's frontmatter.
//!
//! ## Usage
//!
//! ```sh
//! # Convert an export into a vault directory
//! dayone-obsidian-export -i "DayOne Export.json" -o ~/vault
//!
//! # Refresh a previous conversion, printing each decision
//! dayone-obsidian-export -u -v
//! ```
//!
//! Preferences can be persisted in `~/.config/dayone-obsidian-export/config.toml`.

pub mod content;
pub mod convert;
pub mod frontmatter;
pub mod localtime;
pub mod model;
pub mod naming;
pub mod photos;
pub mod reconcile;
