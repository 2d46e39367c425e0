//! Frontmatter construction, serialization, and read-back.
//!
//! The `modified:` stamp emitted here is also what reconciliation reads back
//! out of prior output to decide staleness, so the emit format and the line
//! matcher live together in this module and cannot drift apart.

use crate::localtime::{self, ZoneOffsets};
use crate::model::{Entry, Weather};
use once_cell::sync::Lazy;
use regex::Regex;

/// Timestamp format for `date:` and `modified:`. Local wall clock, no offset
/// suffix; string order equals time order, which staleness comparison uses.
const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `modified:` line inside a frontmatter block.
static MODIFIED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^modified:\s*(.+)$").expect("valid regex"));

/// One frontmatter value. Coordinates are kept apart from plain lists
/// because Obsidian's map plugins require their elements quoted.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    List(Vec<String>),
    Coordinates(f64, f64),
}

/// Ordered key/value pairs; insertion order is emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: Vec<(&'static str, Value)>,
}

impl Frontmatter {
    fn push(&mut self, key: &'static str, value: Value) {
        self.fields.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    /// Collect the entry's metadata, sparsely: a key appears only when the
    /// source field is present and non-empty.
    pub fn build(entry: &Entry, fallback: ZoneOffsets) -> Self {
        let mut fm = Frontmatter::default();

        if let Some(uuid) = &entry.uuid {
            fm.push("uuid", Value::Str(uuid.clone()));
        }

        let zone = entry.time_zone.as_deref();
        if let Some(dt) = localtime::to_local(entry.creation_date.as_deref(), zone, fallback) {
            fm.push("date", Value::Str(dt.format(STAMP_FORMAT).to_string()));
        }
        if let Some(dt) = localtime::to_local(entry.modified_date.as_deref(), zone, fallback) {
            fm.push("modified", Value::Str(dt.format(STAMP_FORMAT).to_string()));
        }

        if let Some(location) = &entry.location {
            if let Some(address) = location.address.as_deref().filter(|a| !a.is_empty()) {
                fm.push("location", Value::Str(address.to_string()));
            }
            if let (Some(lat), Some(lon)) = (location.latitude, location.longitude) {
                fm.push("coordinates", Value::Coordinates(lat, lon));
            }
        }

        if let Some(weather) = format_weather(entry.weather.as_ref()) {
            fm.push("weather", Value::Str(weather));
        }

        if !entry.tags.is_empty() {
            fm.push("tags", Value::List(entry.tags.clone()));
        }
        if entry.starred {
            fm.push("starred", Value::Bool(true));
        }
        if entry.is_pinned {
            fm.push("pinned", Value::Bool(true));
        }
        if let Some(device) = entry.creation_device.as_deref().filter(|d| !d.is_empty()) {
            fm.push("device", Value::Str(device.to_string()));
        }
        if let Some(zone) = &entry.time_zone {
            fm.push("timezone", Value::Str(zone.clone()));
        }

        fm
    }

    /// Emit the block, `---` fenced above and below, no trailing newline.
    pub fn to_yaml(&self) -> String {
        let mut lines = vec!["---".to_string()];
        for (key, value) in &self.fields {
            match value {
                Value::Str(s) => lines.push(format!("{}: {}", key, quote_scalar(s))),
                Value::Bool(b) => lines.push(format!("{}: {}", key, b)),
                Value::List(items) => {
                    lines.push(format!("{}:", key));
                    lines.extend(items.iter().map(|item| format!("  - {}", item)));
                }
                Value::Coordinates(lat, lon) => {
                    lines.push(format!("{}:", key));
                    lines.push(format!("  - \"{}\"", lat));
                    lines.push(format!("  - \"{}\"", lon));
                }
            }
        }
        lines.push("---".to_string());
        lines.join("\n")
    }
}

/// Quote a scalar when it contains YAML-significant characters, escaping
/// inner double quotes. Everything else renders bare.
fn quote_scalar(s: &str) -> String {
    const SPECIAL: &[char] = &[':', '#', '"', '\'', '\n', '[', ']', '{', '}'];
    if s.contains(SPECIAL) {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else {
        s.to_string()
    }
}

/// `"Clear, 68°F"` — condition and/or Fahrenheit temperature, whichever the
/// entry carries.
fn format_weather(weather: Option<&Weather>) -> Option<String> {
    let weather = weather?;
    let mut parts = Vec::new();
    if let Some(description) = weather
        .conditions_description
        .as_deref()
        .filter(|d| !d.is_empty())
    {
        parts.push(description.to_string());
    }
    if let Some(celsius) = weather.temperature_celsius {
        parts.push(format!("{}°F", celsius_to_fahrenheit(celsius)));
    }
    if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

fn celsius_to_fahrenheit(celsius: f64) -> i64 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i64
}

/// The `modified` value as it would be written for this entry; what the
/// staleness check compares against [`read_modified_stamp`].
pub fn local_modified_stamp(entry: &Entry, fallback: ZoneOffsets) -> Option<String> {
    localtime::to_local(
        entry.modified_date.as_deref(),
        entry.time_zone.as_deref(),
        fallback,
    )
    .map(|dt| dt.format(STAMP_FORMAT).to_string())
}

/// Pull the recorded `modified:` value back out of a previously written
/// document, quotes stripped. Only the leading frontmatter block is
/// considered — a `modified:` line in the body never matches.
pub fn read_modified_stamp(content: &str) -> Option<String> {
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    MODIFIED_LINE
        .captures(&rest[..end])
        .map(|caps| caps[1].trim().trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localtime::DEFAULT_FALLBACK;
    use crate::model::Location;

    fn full_entry() -> Entry {
        Entry {
            uuid: Some("4BEA8A1D9F3E4D2A".to_string()),
            text: Some("body".to_string()),
            creation_date: Some("2023-07-04T15:30:00Z".to_string()),
            modified_date: Some("2023-07-04T16:00:00Z".to_string()),
            time_zone: Some("America/Chicago".to_string()),
            location: Some(Location {
                latitude: Some(41.8781),
                longitude: Some(-87.6298),
                address: Some("Chicago, IL".to_string()),
            }),
            weather: Some(Weather {
                conditions_description: Some("Clear".to_string()),
                temperature_celsius: Some(20.0),
            }),
            tags: vec!["a".to_string(), "b".to_string()],
            starred: true,
            is_pinned: false,
            creation_device: Some("iPhone".to_string()),
            photos: vec![],
        }
    }

    #[test]
    fn keys_follow_fixed_order() {
        let fm = Frontmatter::build(&full_entry(), DEFAULT_FALLBACK);
        let keys: Vec<_> = fm.keys().collect();
        assert_eq!(
            keys,
            [
                "uuid",
                "date",
                "modified",
                "location",
                "coordinates",
                "weather",
                "tags",
                "starred",
                "device",
                "timezone"
            ]
        );
    }

    #[test]
    fn absent_fields_emit_no_keys() {
        let entry = Entry {
            uuid: Some("A".to_string()),
            ..Default::default()
        };
        let fm = Frontmatter::build(&entry, DEFAULT_FALLBACK);
        let keys: Vec<_> = fm.keys().collect();
        assert_eq!(keys, ["uuid"]);
    }

    #[test]
    fn timestamps_are_local_and_quoted() {
        let fm = Frontmatter::build(&full_entry(), DEFAULT_FALLBACK);
        let yaml = fm.to_yaml();
        // July in Chicago is CDT (UTC-5); colons force quoting.
        assert!(yaml.contains("date: \"2023-07-04T10:30:00\""));
        assert!(yaml.contains("modified: \"2023-07-04T11:00:00\""));
    }

    #[test]
    fn weather_formats_condition_and_fahrenheit() {
        let fm = Frontmatter::build(&full_entry(), DEFAULT_FALLBACK);
        assert_eq!(
            fm.get("weather"),
            Some(&Value::Str("Clear, 68°F".to_string()))
        );
    }

    #[test]
    fn weather_with_only_temperature() {
        let w = Weather {
            conditions_description: None,
            temperature_celsius: Some(0.0),
        };
        assert_eq!(format_weather(Some(&w)).as_deref(), Some("32°F"));
    }

    #[test]
    fn coordinates_render_quoted() {
        let yaml = Frontmatter::build(&full_entry(), DEFAULT_FALLBACK).to_yaml();
        assert!(yaml.contains("coordinates:\n  - \"41.8781\"\n  - \"-87.6298\""));
    }

    #[test]
    fn booleans_render_lowercase_and_only_when_true() {
        let yaml = Frontmatter::build(&full_entry(), DEFAULT_FALLBACK).to_yaml();
        assert!(yaml.contains("starred: true"));
        assert!(!yaml.contains("pinned"));
    }

    #[test]
    fn special_characters_force_quoting() {
        assert_eq!(quote_scalar("plain text"), "plain text");
        assert_eq!(quote_scalar("a: b"), "\"a: b\"");
        assert_eq!(quote_scalar("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_scalar("note #1"), "\"note #1\"");
    }

    #[test]
    fn emitted_block_round_trips_through_a_yaml_parser() {
        let yaml = Frontmatter::build(&full_entry(), DEFAULT_FALLBACK).to_yaml();
        let inner = yaml.trim_end_matches('-');
        let doc: serde_yaml::Value = serde_yaml::from_str(inner).unwrap();
        assert_eq!(doc["uuid"].as_str(), Some("4BEA8A1D9F3E4D2A"));
        let tags: Vec<&str> = doc["tags"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(tags, ["a", "b"]);
        assert_eq!(doc["weather"].as_str(), Some("Clear, 68°F"));
    }

    #[test]
    fn modified_stamp_round_trips() {
        let entry = full_entry();
        let fm = Frontmatter::build(&entry, DEFAULT_FALLBACK);
        let doc = format!("{}\n\nbody text", fm.to_yaml());
        assert_eq!(
            read_modified_stamp(&doc),
            local_modified_stamp(&entry, DEFAULT_FALLBACK)
        );
    }

    #[test]
    fn read_modified_ignores_body_lines() {
        let doc = "---\nuuid: A\n---\n\nmodified: not-really";
        assert_eq!(read_modified_stamp(doc), None);
    }

    #[test]
    fn read_modified_on_plain_file_is_none() {
        assert_eq!(read_modified_stamp("just some markdown"), None);
    }
}
