//! Bookmark model

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tag;

/// A bookmark as returned by the PathFind server.
///
/// Records are treated as immutable snapshots: updates replace the whole
/// record with the server's copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Opaque server identifier
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Display domain derived by the server (e.g. `example.com`)
    #[serde(default)]
    pub domain: String,
    /// Favicon reference, see [`crate::media::ImageRef`]
    #[serde(default)]
    pub favicon: Option<String>,
    /// Thumbnail reference, see [`crate::media::ImageRef`]
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub is_read_later: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_nsfw: bool,
    /// Server creation timestamp, kept verbatim
    pub created_at: String,
}

impl Bookmark {
    /// Parse `created_at` into a UTC timestamp.
    ///
    /// Accepts RFC 3339 as well as the `YYYY-MM-DD HH:MM:SS` form some
    /// server builds emit. Returns `None` for anything else.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_server_timestamp(&self.created_at)
    }

    /// Names of the tags attached to this bookmark, in server order.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| tag.name.as_str())
    }
}

/// Parse a server timestamp string.
#[must_use]
pub fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
