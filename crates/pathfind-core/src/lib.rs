//! pathfind-core - Core library for PathFind clients
//!
//! This crate contains the bookmark models, the HTTP client for the PathFind
//! API, and the bookmark list store shared by every PathFind front end.

pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod presentation;
pub mod query;
pub mod service;
pub mod session;
pub mod share;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{Bookmark, Collection, Tag};
pub use query::{BookmarkFilter, BookmarkSort, FilterScope};
pub use service::BookmarkService;
pub use store::{BookmarkListState, BookmarkListStore};
