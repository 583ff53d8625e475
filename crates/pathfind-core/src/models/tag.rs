//! Tag and collection models

use serde::{Deserialize, Serialize};

/// A tag in the server's tag space.
///
/// `bookmark_count` is denormalized by the server and only meaningful on
/// responses from the tag listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tag name, unique within the server
    pub name: String,
    #[serde(default)]
    pub bookmark_count: u32,
}

impl Tag {
    /// Create a tag with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            bookmark_count: 0,
        }
    }
}

/// A server-defined grouping of bookmarks, usable as a filter scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_count_defaults_to_zero() {
        let tag: Tag = serde_json::from_str(r#"{"name":"rust"}"#).unwrap();
        assert_eq!(tag, Tag::new("rust"));
    }

    #[test]
    fn collection_parses_without_count() {
        let collection: Collection =
            serde_json::from_str(r#"{"id":"c1","name":"Reading"}"#).unwrap();
        assert_eq!(collection.name, "Reading");
        assert_eq!(collection.bookmark_count, None);
    }
}
