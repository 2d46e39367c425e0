//! Body rewriting: DayOne image tokens become Obsidian wiki embeds.

use crate::frontmatter::Frontmatter;
use crate::model::Photo;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// `![...](dayone-moment://HEX)`. The identifier may be empty for dangling
/// references, which are deleted outright.
static MOMENT_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[.*?\]\(dayone-moment://([A-Fa-f0-9]*)\)").expect("valid regex"));

/// Lowercase a declared photo extension, folding `jpg` into `jpeg` so the
/// output pool uses one spelling. Missing or empty extensions become `jpeg`.
pub fn normalize_extension(ext: Option<&str>) -> String {
    let ext = match ext {
        Some(e) if !e.is_empty() => e.to_lowercase(),
        _ => return "jpeg".to_string(),
    };
    if ext == "jpg" { "jpeg".to_string() } else { ext }
}

/// Replace every DayOne moment token with `![[photos/<id>.<ext>]]`, taking
/// the extension from the entry's photo list (default `jpeg` when the
/// identifier is not listed).
pub fn rewrite_image_links(text: &str, photos: &[Photo]) -> String {
    let extensions: HashMap<&str, String> = photos
        .iter()
        .filter_map(|p| {
            p.identifier
                .as_deref()
                .map(|id| (id, normalize_extension(p.media_type.as_deref())))
        })
        .collect();

    MOMENT_LINK
        .replace_all(text, |caps: &Captures| {
            let identifier = &caps[1];
            if identifier.is_empty() {
                return String::new();
            }
            let ext = extensions
                .get(identifier)
                .cloned()
                .unwrap_or_else(|| "jpeg".to_string());
            format!("![[photos/{}.{}]]", identifier, ext)
        })
        .into_owned()
}

/// Full document: frontmatter block, a blank line, then the rewritten body.
pub fn assemble(frontmatter: &Frontmatter, body: &str, photos: &[Photo]) -> String {
    format!(
        "{}\n\n{}",
        frontmatter.to_yaml(),
        rewrite_image_links(body, photos)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str, media_type: &str) -> Photo {
        Photo {
            identifier: Some(id.to_string()),
            md5: Some("cafe".to_string()),
            media_type: Some(media_type.to_string()),
        }
    }

    #[test]
    fn rewrites_known_identifier_with_normalized_extension() {
        let body = "Look:\n\n![](dayone-moment://AB12)\n";
        let out = rewrite_image_links(body, &[photo("AB12", "jpg")]);
        assert_eq!(out, "Look:\n\n![[photos/AB12.jpeg]]\n");
    }

    #[test]
    fn keeps_non_jpg_extensions() {
        let out = rewrite_image_links("![](dayone-moment://AB12)", &[photo("AB12", "PNG")]);
        assert_eq!(out, "![[photos/AB12.png]]");
    }

    #[test]
    fn unknown_identifier_defaults_to_jpeg() {
        let out = rewrite_image_links("![](dayone-moment://FFFF)", &[]);
        assert_eq!(out, "![[photos/FFFF.jpeg]]");
    }

    #[test]
    fn empty_identifier_token_is_deleted_entirely() {
        let out = rewrite_image_links("before ![](dayone-moment://) after", &[]);
        assert_eq!(out, "before  after");
    }

    #[test]
    fn alt_text_does_not_matter() {
        let out = rewrite_image_links("![my pic](dayone-moment://AB12)", &[photo("AB12", "jpeg")]);
        assert_eq!(out, "![[photos/AB12.jpeg]]");
    }

    #[test]
    fn ordinary_markdown_links_are_untouched() {
        let body = "![alt](https://example.com/x.png) and [a link](b.md)";
        assert_eq!(rewrite_image_links(body, &[]), body);
    }

    #[test]
    fn rewrites_every_occurrence() {
        let body = "![](dayone-moment://AA11)\n![](dayone-moment://BB22)";
        let out = rewrite_image_links(body, &[photo("AA11", "jpg"), photo("BB22", "heic")]);
        assert_eq!(out, "![[photos/AA11.jpeg]]\n![[photos/BB22.heic]]");
    }
}
