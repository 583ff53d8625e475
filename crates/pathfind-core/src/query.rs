//! Bookmark list query state: filter, sort, search and scope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Bookmark;
use crate::util::normalize_text_option;
use crate::Error;

/// Flag-based list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookmarkFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "readlater")]
    ReadLater,
    #[serde(rename = "archived")]
    Archived,
}

impl BookmarkFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::ReadLater, Self::Archived];

    /// Value sent in the `filter` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ReadLater => "readlater",
            Self::Archived => "archived",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::ReadLater => "Read Later",
            Self::Archived => "Archived",
        }
    }

    /// Whether a bookmark belongs in a list filtered this way.
    #[must_use]
    pub const fn matches(self, bookmark: &Bookmark) -> bool {
        match self {
            Self::All => true,
            Self::ReadLater => bookmark.is_read_later && !bookmark.is_archived,
            Self::Archived => bookmark.is_archived,
        }
    }
}

impl fmt::Display for BookmarkFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "readlater" | "read-later" | "read_later" => Ok(Self::ReadLater),
            "archived" => Ok(Self::Archived),
            other => Err(Error::InvalidInput(format!("unknown filter '{other}'"))),
        }
    }
}

/// List ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkSort {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl BookmarkSort {
    pub const ALL: [Self; 4] = [Self::Newest, Self::Oldest, Self::TitleAsc, Self::TitleDesc];

    /// Value sent in the `sort` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::TitleAsc => "title_asc",
            Self::TitleDesc => "title_desc",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
            Self::TitleAsc => "Title A→Z",
            Self::TitleDesc => "Title Z→A",
        }
    }
}

impl fmt::Display for BookmarkSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "title_asc" => Ok(Self::TitleAsc),
            "title_desc" => Ok(Self::TitleDesc),
            other => Err(Error::InvalidInput(format!("unknown sort '{other}'"))),
        }
    }
}

/// Custom scope narrowing the list to one tag or one collection.
///
/// Holding the scope in a single `Option<FilterScope>` makes "tag and
/// collection at once" unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterScope {
    Tag(String),
    Collection { id: String, name: String },
}

/// Everything the server needs to produce one page of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookmarkQuery {
    pub filter: BookmarkFilter,
    pub sort: BookmarkSort,
    /// Free-text search; `None` when the user typed nothing
    pub search: Option<String>,
    pub scope: Option<FilterScope>,
    pub page: u32,
}

impl BookmarkQuery {
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match &self.scope {
            Some(FilterScope::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    #[must_use]
    pub fn collection_id(&self) -> Option<&str> {
        match &self.scope {
            Some(FilterScope::Collection { id, .. }) => Some(id),
            _ => None,
        }
    }

    /// Query parameters in the order the API expects them.
    ///
    /// Absent search/tag/collection are omitted rather than sent empty.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("filter", self.filter.as_str().to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("q", search.clone()));
        }
        if let Some(tag) = self.tag() {
            params.push(("tag", tag.to_string()));
        }
        if let Some(collection) = self.collection_id() {
            params.push(("collection", collection.to_string()));
        }
        params
    }
}

/// Turn the raw search box contents into the value sent to the server.
#[must_use]
pub fn normalize_search(raw: &str) -> Option<String> {
    normalize_text_option(Some(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn filter_wire_values_round_trip_through_from_str() {
        for filter in BookmarkFilter::ALL {
            assert_eq!(filter.as_str().parse::<BookmarkFilter>().unwrap(), filter);
        }
        assert_eq!(
            "read-later".parse::<BookmarkFilter>().unwrap(),
            BookmarkFilter::ReadLater
        );
        assert!("starred".parse::<BookmarkFilter>().is_err());
    }

    #[test]
    fn filter_serializes_to_server_values() {
        assert_eq!(
            serde_json::to_string(&BookmarkFilter::ReadLater).unwrap(),
            r#""readlater""#
        );
        assert_eq!(
            serde_json::to_string(&BookmarkSort::TitleDesc).unwrap(),
            r#""title_desc""#
        );
    }

    #[test]
    fn read_later_filter_excludes_archived() {
        let mut bookmark = Bookmark {
            id: "a".to_string(),
            url: "https://example.com".to_string(),
            title: None,
            domain: "example.com".to_string(),
            favicon: None,
            thumbnail: None,
            tags: Vec::new(),
            is_read_later: true,
            is_archived: false,
            is_nsfw: false,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        assert!(BookmarkFilter::ReadLater.matches(&bookmark));

        bookmark.is_archived = true;
        assert!(!BookmarkFilter::ReadLater.matches(&bookmark));
        assert!(BookmarkFilter::Archived.matches(&bookmark));
        assert!(BookmarkFilter::All.matches(&bookmark));
    }

    #[test]
    fn empty_search_is_absent() {
        assert_eq!(normalize_search(""), None);
        assert_eq!(normalize_search("   "), None);
        assert_eq!(normalize_search(" rust "), Some("rust".to_string()));
    }

    #[test]
    fn params_omit_absent_fields() {
        let query = BookmarkQuery {
            page: 2,
            ..Default::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("filter", "all".to_string()),
                ("sort", "newest".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[test]
    fn params_include_scope() {
        let query = BookmarkQuery {
            search: Some("async".to_string()),
            scope: Some(FilterScope::Collection {
                id: "c9".to_string(),
                name: "Reading".to_string(),
            }),
            page: 1,
            ..Default::default()
        };
        let params = query.to_params();
        assert!(params.contains(&("q", "async".to_string())));
        assert!(params.contains(&("collection", "c9".to_string())));
        assert!(!params.iter().any(|(key, _)| *key == "tag"));
    }
}
