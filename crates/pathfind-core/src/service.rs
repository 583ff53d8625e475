//! Network boundary consumed by the bookmark list store.

use async_trait::async_trait;

use crate::models::{Bookmark, BookmarkPage, BookmarkUpdate, Collection, NewBookmark, Tag};
use crate::query::BookmarkQuery;
use crate::Result;

/// Remote bookmark operations.
///
/// [`crate::api::HttpBookmarkService`] talks to a real server; tests plug in
/// scripted in-memory implementations.
#[async_trait]
pub trait BookmarkService: Send + Sync {
    async fn fetch_bookmarks(&self, query: &BookmarkQuery) -> Result<BookmarkPage>;

    async fn delete_bookmark(&self, id: &str) -> Result<()>;

    /// Apply a partial update and return the server's full copy.
    async fn update_bookmark(&self, id: &str, update: &BookmarkUpdate) -> Result<Bookmark>;

    async fn fetch_collections(&self) -> Result<Vec<Collection>>;

    async fn fetch_tags(&self) -> Result<Vec<Tag>>;

    async fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark>;
}
