//! Type definitions for the DayOne JSON export bundle.
//!
//! Bundle layout on disk:
//! ```text
//! DayOne Export.json    -- { "metadata": {...}, "entries": [ ... ] }
//! photos/               -- image blobs, named by content hash or identifier
//! ```
//!
//! Only the fields the converter consumes are modeled here; everything else
//! in the export is ignored during deserialization. Real exports are sparse —
//! nearly every field can be absent — so the whole schema is optional and
//! callers pick their own fallbacks.

use serde::Deserialize;

/// Root of `DayOne Export.json`. A missing `entries` field is an empty export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Export {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// One journal record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Opaque identifier, globally unique per export.
    pub uuid: Option<String>,
    /// Markdown body. May start with a `# Heading` and may embed
    /// `![](dayone-moment://HEX)` photo tokens.
    pub text: Option<String>,
    /// Creation instant, RFC 3339 in UTC (`2023-07-04T15:30:00Z`).
    pub creation_date: Option<String>,
    /// Last-modified instant, RFC 3339 in UTC.
    pub modified_date: Option<String>,
    /// IANA-style name of the timezone the entry was written in.
    pub time_zone: Option<String>,
    pub location: Option<Location>,
    pub weather: Option<Weather>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub is_pinned: bool,
    pub creation_device: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Entry {
    /// The uuid, or the `UNKNOWN` placeholder when the export omitted it.
    pub fn uuid_or_unknown(&self) -> &str {
        self.uuid.as_deref().unwrap_or("UNKNOWN")
    }

    /// First 8 characters of the uuid (the whole uuid when shorter).
    /// This is the stable key that matches entries to prior output files.
    pub fn uuid8(&self) -> &str {
        let uuid = self.uuid_or_unknown();
        match uuid.char_indices().nth(8) {
            Some((idx, _)) => &uuid[..idx],
            None => uuid,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub conditions_description: Option<String>,
    pub temperature_celsius: Option<f64>,
}

/// One image attachment referenced from an entry body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Opaque identifier, unique within the export (distinct from entry uuids).
    pub identifier: Option<String>,
    /// Content hash; source blobs are usually named after it.
    pub md5: Option<String>,
    /// Declared extension, e.g. `jpg` or `png`.
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}
