//! Renderer-agnostic display helpers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Bookmark;
use crate::Error;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl TagColor {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// `#rrggbb`
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Palette tag names are mapped onto.
pub const TAG_PALETTE: [TagColor; 7] = [
    TagColor::new(102, 140, 255),
    TagColor::new(140, 102, 255),
    TagColor::new(255, 128, 128),
    TagColor::new(77, 204, 153),
    TagColor::new(255, 179, 77),
    TagColor::new(230, 102, 179),
    TagColor::new(77, 191, 230),
];

/// Pick a palette color for a tag name.
///
/// FNV-1a over the UTF-8 bytes, so a name always maps to the same color.
#[must_use]
pub fn tag_color(name: &str) -> TagColor {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    let hash = name.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });
    let palette_len = TAG_PALETTE.len() as u64;
    #[allow(clippy::cast_possible_truncation)]
    let index = (hash % palette_len) as usize;
    TAG_PALETTE[index]
}

/// Parse `#rrggbb` / `rrggbb`, ignoring surrounding whitespace.
pub fn parse_hex_color(raw: &str) -> Option<TagColor> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(TagColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Title to show for a bookmark: its title, or the domain when untitled.
#[must_use]
pub fn display_title(bookmark: &Bookmark) -> &str {
    bookmark
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(bookmark.domain.as_str())
}

/// Upper-cased first character of the domain, used when no thumbnail exists.
#[must_use]
pub fn domain_initial(domain: &str) -> String {
    domain
        .chars()
        .next()
        .map(|ch| ch.to_uppercase().collect())
        .unwrap_or_default()
}

/// Tag names shown on a row plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChips<'a> {
    pub shown: Vec<&'a str>,
    pub overflow: usize,
}

#[must_use]
pub fn tag_chips(bookmark: &Bookmark, max: usize) -> TagChips<'_> {
    let shown: Vec<&str> = bookmark.tag_names().take(max).collect();
    let overflow = bookmark.tags.len().saturating_sub(shown.len());
    TagChips { shown, overflow }
}

/// Compact "time ago" label.
#[must_use]
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(then).num_seconds().max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// How bookmarks flagged as NSFW are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NsfwDisplayMode {
    #[default]
    Blur,
    Hide,
    Show,
}

impl NsfwDisplayMode {
    pub const ALL: [Self; 3] = [Self::Blur, Self::Hide, Self::Show];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Hide => "hide",
            Self::Show => "show",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Blur => "Blur Content",
            Self::Hide => "Hide from List",
            Self::Show => "Show Content",
        }
    }

    /// Whether the bookmark is left out of the list entirely.
    #[must_use]
    pub const fn hides(self, bookmark: &Bookmark) -> bool {
        bookmark.is_nsfw && matches!(self, Self::Hide)
    }

    /// Whether the bookmark's title and images are obscured.
    #[must_use]
    pub const fn blurs(self, bookmark: &Bookmark) -> bool {
        bookmark.is_nsfw && matches!(self, Self::Blur)
    }
}

impl fmt::Display for NsfwDisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NsfwDisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blur" => Ok(Self::Blur),
            "hide" => Ok(Self::Hide),
            "show" => Ok(Self::Show),
            other => Err(Error::InvalidInput(format!(
                "unknown NSFW display mode '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Tag;

    fn bookmark(title: Option<&str>, tags: &[&str]) -> Bookmark {
        Bookmark {
            id: "b1".to_string(),
            url: "https://example.com".to_string(),
            title: title.map(ToString::to_string),
            domain: "example.com".to_string(),
            favicon: None,
            thumbnail: None,
            tags: tags.iter().map(|name| Tag::new(*name)).collect(),
            is_read_later: false,
            is_archived: false,
            is_nsfw: false,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn tag_color_is_stable_per_name() {
        for name in ["rust", "reading", "a", ""] {
            assert_eq!(tag_color(name), tag_color(name));
            assert!(TAG_PALETTE.contains(&tag_color(name)));
        }
    }

    #[test]
    fn tag_colors_spread_over_palette() {
        let names = ["rust", "go", "swift", "web", "news", "ai", "design", "music"];
        let distinct: std::collections::HashSet<_> =
            names.iter().map(|name| tag_color(name)).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn parse_hex_color_accepts_with_and_without_hash() {
        assert_eq!(parse_hex_color("#668cff"), Some(TagColor::new(102, 140, 255)));
        assert_eq!(parse_hex_color(" 4DCC99 "), Some(TagColor::new(77, 204, 153)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(TagColor::new(102, 140, 255).to_hex(), "#668cff");
    }

    #[test]
    fn display_title_falls_back_to_domain() {
        assert_eq!(display_title(&bookmark(Some("Post"), &[])), "Post");
        assert_eq!(display_title(&bookmark(Some("  "), &[])), "example.com");
        assert_eq!(display_title(&bookmark(None, &[])), "example.com");
        assert_eq!(domain_initial("example.com"), "E");
        assert_eq!(domain_initial(""), "");
    }

    #[test]
    fn tag_chips_report_overflow() {
        let many = bookmark(None, &["a", "b", "c", "d", "e"]);
        let chips = tag_chips(&many, 3);
        assert_eq!(chips.shown, vec!["a", "b", "c"]);
        assert_eq!(chips.overflow, 2);

        let single = bookmark(None, &["a"]);
        let chips = tag_chips(&single, 3);
        assert_eq!(chips.overflow, 0);
    }

    #[test]
    fn relative_time_units() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let ago = |seconds: i64| now - chrono::Duration::seconds(seconds);
        assert_eq!(format_relative_time(ago(30), now), "just now");
        assert_eq!(format_relative_time(ago(120), now), "2m ago");
        assert_eq!(format_relative_time(ago(2 * 3600), now), "2h ago");
        assert_eq!(format_relative_time(ago(3 * 86_400), now), "3d ago");
        assert_eq!(format_relative_time(now + chrono::Duration::hours(1), now), "just now");
    }

    #[test]
    fn nsfw_modes_hide_or_blur_flagged_only() {
        let mut flagged = bookmark(None, &[]);
        flagged.is_nsfw = true;
        let clean = bookmark(None, &[]);

        assert!(NsfwDisplayMode::Hide.hides(&flagged));
        assert!(!NsfwDisplayMode::Hide.hides(&clean));
        assert!(NsfwDisplayMode::Blur.blurs(&flagged));
        assert!(!NsfwDisplayMode::Show.blurs(&flagged));
        assert_eq!("HIDE".parse::<NsfwDisplayMode>().unwrap(), NsfwDisplayMode::Hide);
    }
}
