//! Deterministic filenames: `<local date> <sanitized title> (<uuid8>).md`.
//!
//! Only the parenthesized uuid prefix is stable across runs — the date moves
//! with the entry's timezone and the title with its first line — so update
//! matching keys on the prefix alone.

use crate::localtime::{self, ZoneOffsets};
use crate::model::Entry;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_TITLE_LEN: usize = 50;

/// A line that is nothing but a Markdown image reference.
static IMAGE_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[.*\]\(.*\)$").expect("valid regex"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip characters that are illegal in filenames, collapse whitespace, and
/// bound the length, breaking at a word boundary when one exists reasonably
/// late. Counts characters, not bytes, so multibyte titles never split a
/// code point.
pub fn sanitize_filename(text: &str, max_len: usize) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        return "Untitled".to_string();
    }
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    let truncated: String = trimmed.chars().take(max_len).collect();
    // Break at the last space, but only if that keeps a reasonable length.
    let cut = match truncated.rfind(' ') {
        Some(pos) if truncated[..pos].chars().count() > 20 => &truncated[..pos],
        _ => truncated.as_str(),
    };
    let cut = cut.trim_end();
    if cut.is_empty() {
        "Untitled".to_string()
    } else {
        cut.to_string()
    }
}

/// Title for the filename.
///
/// A leading `# Heading` wins unless the heading text is itself just an
/// image reference. Otherwise the first line that is neither blank, an image
/// reference, nor malformed image syntax is used. `Untitled` when nothing
/// qualifies.
pub fn extract_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "Untitled".to_string();
    }

    if let Some(first) = trimmed.lines().next() {
        let first = first.trim();
        if first.starts_with('#') {
            let title = first.trim_start_matches('#').trim_start();
            if !IMAGE_ONLY.is_match(title.trim()) {
                return sanitize_filename(title, MAX_TITLE_LEN);
            }
        }
    }

    for line in trimmed.lines() {
        let line = line.trim();
        if !line.is_empty() && !IMAGE_ONLY.is_match(line) && !line.starts_with("![") {
            return sanitize_filename(line, MAX_TITLE_LEN);
        }
    }

    "Untitled".to_string()
}

/// `YYYY-MM-DD` of the entry's local creation time, or the `Unknown-Date`
/// placeholder when the instant is missing or malformed.
pub fn local_date_stamp(entry: &Entry, fallback: ZoneOffsets) -> String {
    localtime::to_local(
        entry.creation_date.as_deref(),
        entry.time_zone.as_deref(),
        fallback,
    )
    .map(|dt| dt.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| "Unknown-Date".to_string())
}

pub fn derive_filename(entry: &Entry, fallback: ZoneOffsets) -> String {
    let date = local_date_stamp(entry, fallback);
    let title = extract_title(entry.text.as_deref().unwrap_or(""));
    format!("{} {} ({}).md", date, title, entry.uuid8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localtime::DEFAULT_FALLBACK;

    #[test]
    fn sanitize_strips_illegal_characters() {
        assert_eq!(
            sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#, 50),
            "abcdefghij"
        );
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_filename("  a \t b\n\nc  ", 50), "a b c");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_filename("", 50), "Untitled");
        assert_eq!(sanitize_filename("  \t ", 50), "Untitled");
        assert_eq!(sanitize_filename(r#"<>:"/\|?*"#, 50), "Untitled");
    }

    #[test]
    fn sanitize_truncates_at_word_boundary() {
        let text = "The quick brown fox jumps over the lazy dog again and again";
        let out = sanitize_filename(text, 50);
        assert!(out.chars().count() <= 50);
        // Cut lands on the last full word under the limit.
        assert_eq!(out, "The quick brown fox jumps over the lazy dog again");
    }

    #[test]
    fn sanitize_hard_cuts_when_no_late_space() {
        let text = "Supercalifragilisticexpialidociousandthensomemoretext";
        let out = sanitize_filename(text, 50);
        assert_eq!(out.chars().count(), 50);
    }

    #[test]
    fn sanitize_output_is_always_clean() {
        let long = "x".repeat(200);
        for input in ["a:b:c", long.as_str(), "?? * <>", "héllo wörld"] {
            let out = sanitize_filename(input, 50);
            assert!(!out.is_empty());
            assert!(out.chars().count() <= 50);
            assert!(!out.contains(['<', '>', ':', '"', '/', '\\', '|', '?', '*']));
        }
    }

    #[test]
    fn title_prefers_heading() {
        assert_eq!(extract_title("# Morning Walk\n\nFog today."), "Morning Walk");
        assert_eq!(extract_title("### Deep heading\nbody"), "Deep heading");
    }

    #[test]
    fn title_skips_image_only_heading() {
        let text = "# ![](dayone-moment://ABCD)\nActual first line";
        assert_eq!(extract_title(text), "Actual first line");
    }

    #[test]
    fn title_skips_image_lines_and_malformed_images() {
        let text = "![](dayone-moment://ABCD)\n![broken\nReal title here";
        assert_eq!(extract_title(text), "Real title here");
    }

    #[test]
    fn title_falls_back_to_untitled() {
        assert_eq!(extract_title(""), "Untitled");
        assert_eq!(extract_title("![](a)\n![](b)"), "Untitled");
    }

    #[test]
    fn filename_embeds_stable_uuid_prefix() {
        let mut entry = Entry {
            uuid: Some("4BEA8A1D9F3E4D2A".to_string()),
            text: Some("# First title".to_string()),
            creation_date: Some("2023-07-04T15:30:00Z".to_string()),
            time_zone: Some("America/Chicago".to_string()),
            ..Default::default()
        };
        let before = derive_filename(&entry, DEFAULT_FALLBACK);
        assert_eq!(before, "2023-07-04 First title (4BEA8A1D).md");

        // Title changes, the parenthesized key does not.
        entry.text = Some("# A very different heading".to_string());
        let after = derive_filename(&entry, DEFAULT_FALLBACK);
        assert!(after.ends_with("(4BEA8A1D).md"));
        assert_ne!(before, after);
    }

    #[test]
    fn filename_without_creation_date_uses_placeholder() {
        let entry = Entry {
            uuid: Some("AB12".to_string()),
            text: Some("Some note".to_string()),
            ..Default::default()
        };
        assert_eq!(
            derive_filename(&entry, DEFAULT_FALLBACK),
            "Unknown-Date Some note (AB12).md"
        );
    }
}
