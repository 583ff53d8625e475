//! Request and response bodies exchanged with the PathFind API.

use serde::{Deserialize, Serialize};

use super::Bookmark;

/// One page of bookmarks plus the server's pagination totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPage {
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u32,
}

const fn default_total_pages() -> u32 {
    1
}

impl Default for BookmarkPage {
    fn default() -> Self {
        Self {
            bookmarks: Vec::new(),
            total_pages: default_total_pages(),
            total: 0,
        }
    }
}

/// Partial update; fields left as `None` are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read_later: Option<bool>,
}

impl BookmarkUpdate {
    #[must_use]
    pub const fn archived(value: bool) -> Self {
        Self {
            is_archived: Some(value),
            is_read_later: None,
        }
    }

    #[must_use]
    pub const fn read_later(value: bool) -> Self {
        Self {
            is_archived: None,
            is_read_later: Some(value),
        }
    }
}

/// Body for creating a bookmark (used by the share handoff).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_read_later: bool,
}
