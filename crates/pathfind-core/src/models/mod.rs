//! Data models for PathFind

mod bookmark;
mod tag;
mod wire;

pub use bookmark::{parse_server_timestamp, Bookmark};
pub use tag::{Collection, Tag};
pub use wire::{BookmarkPage, BookmarkUpdate, NewBookmark};
