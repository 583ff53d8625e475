use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pathfind_core::config::StaleResponsePolicy;
use pathfind_core::models::{BookmarkPage, BookmarkUpdate, Collection, NewBookmark, Tag};
use pathfind_core::presentation::NsfwDisplayMode;
use pathfind_core::query::BookmarkQuery;
use pathfind_core::session::Credentials;
use pathfind_core::share::{extract_shared_link, SharedItem};
use pathfind_core::{Bookmark, BookmarkListStore, BookmarkService};
use pretty_assertions::assert_eq;

use crate::cli::CompletionShell;
use crate::commands::common::{
    bookmark_to_list_item, find_bookmark, format_bookmark_lines, image_label, load_pages,
    merge_credentials, normalize_bookmark_identifier, render_tags, resolve_bookmark_prefix,
    shared_items_from_text, truncate_chars,
};
use crate::commands::completions::render_completions;
use crate::commands::config::resolve_server_url;
use crate::commands::save::resolve_save_input;
use crate::commands::toggle::{toggle_flag, ToggleFlag};
use crate::error::CliError;

fn bookmark(id: &str, tags: &[&str]) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        url: format!("https://example.com/{id}"),
        title: Some(format!("Post {id}")),
        domain: "example.com".to_string(),
        favicon: None,
        thumbnail: None,
        tags: tags.iter().map(|name| Tag::new(*name)).collect(),
        is_read_later: false,
        is_archived: false,
        is_nsfw: false,
        created_at: "2026-03-01T10:00:00Z".to_string(),
    }
}

/// Serves fixed pages and echoes updates back with the flags applied.
struct PagedService {
    pages: Vec<Vec<Bookmark>>,
    fetched_pages: Mutex<Vec<u32>>,
}

impl PagedService {
    fn new(pages: Vec<Vec<Bookmark>>) -> Arc<Self> {
        Arc::new(Self {
            pages,
            fetched_pages: Mutex::new(Vec::new()),
        })
    }

    fn fetched_pages(&self) -> Vec<u32> {
        self.fetched_pages.lock().unwrap().clone()
    }

    fn find(&self, id: &str) -> Option<Bookmark> {
        self.pages.iter().flatten().find(|entry| entry.id == id).cloned()
    }
}

#[async_trait]
impl BookmarkService for PagedService {
    async fn fetch_bookmarks(&self, query: &BookmarkQuery) -> pathfind_core::Result<BookmarkPage> {
        self.fetched_pages.lock().unwrap().push(query.page);
        let index = query.page.saturating_sub(1) as usize;
        let bookmarks = self.pages.get(index).cloned().unwrap_or_default();
        Ok(BookmarkPage {
            bookmarks,
            total_pages: u32::try_from(self.pages.len()).unwrap(),
            total: u32::try_from(self.pages.iter().map(Vec::len).sum::<usize>()).unwrap(),
        })
    }

    async fn delete_bookmark(&self, _id: &str) -> pathfind_core::Result<()> {
        Ok(())
    }

    async fn update_bookmark(
        &self,
        id: &str,
        update: &BookmarkUpdate,
    ) -> pathfind_core::Result<Bookmark> {
        let mut updated = self
            .find(id)
            .ok_or_else(|| pathfind_core::Error::InvalidInput(id.to_string()))?;
        if let Some(value) = update.is_archived {
            updated.is_archived = value;
        }
        if let Some(value) = update.is_read_later {
            updated.is_read_later = value;
        }
        Ok(updated)
    }

    async fn fetch_collections(&self) -> pathfind_core::Result<Vec<Collection>> {
        Ok(Vec::new())
    }

    async fn fetch_tags(&self) -> pathfind_core::Result<Vec<Tag>> {
        Ok(Vec::new())
    }

    async fn create_bookmark(&self, bookmark: &NewBookmark) -> pathfind_core::Result<Bookmark> {
        Ok(bookmark_with_url(&bookmark.url))
    }
}

fn bookmark_with_url(url: &str) -> Bookmark {
    let mut created = bookmark("created", &[]);
    created.url = url.to_string();
    created
}

fn store_for(service: &Arc<PagedService>) -> BookmarkListStore<PagedService> {
    BookmarkListStore::new(Arc::clone(service), StaleResponsePolicy::default())
}

#[test]
fn environment_overrides_profile_and_keychain() {
    let stored = Credentials::new("https://stored.example.com", "stored-key").unwrap();

    let merged = merge_credentials(
        "default",
        Some("https://env.example.com".to_string()),
        Some("env-key".to_string()),
        Some("https://profile.example.com".to_string()),
        Some(&stored),
    )
    .unwrap();
    assert_eq!(merged.server_url(), "https://env.example.com");
    assert_eq!(merged.api_key(), "env-key");

    let merged = merge_credentials(
        "default",
        None,
        None,
        Some("https://profile.example.com".to_string()),
        Some(&stored),
    )
    .unwrap();
    assert_eq!(merged.server_url(), "https://profile.example.com");
    assert_eq!(merged.api_key(), "stored-key");
}

#[test]
fn missing_key_or_server_is_reported() {
    let error = merge_credentials(
        "work",
        None,
        None,
        Some("https://pf.example.com".to_string()),
        None,
    )
    .unwrap_err();
    assert!(matches!(error, CliError::NotSignedIn(profile) if profile == "work"));

    let error = merge_credentials("work", None, Some("key".to_string()), None, None).unwrap_err();
    assert!(matches!(error, CliError::Config(_)));
}

#[test]
fn resolve_server_url_validates_scheme() {
    assert!(
        resolve_server_url(Some(" https://pf.example.com/ ".to_string()), None, None)
            .unwrap()
            .is_some()
    );
    assert!(resolve_server_url(Some("pf.example.com".to_string()), None, None).is_err());
    assert_eq!(resolve_server_url(None, Some("  ".to_string()), None).unwrap(), None);
}

#[test]
fn bookmark_prefix_resolution() {
    let bookmarks = vec![bookmark("abc123", &[]), bookmark("abd456", &[]), bookmark("xyz", &[])];

    assert_eq!(resolve_bookmark_prefix(&bookmarks, "abc").unwrap().id, "abc123");
    assert!(matches!(
        resolve_bookmark_prefix(&bookmarks, "ab"),
        Err(CliError::AmbiguousBookmarkId(message)) if message.contains("abc123")
    ));
    assert!(matches!(
        resolve_bookmark_prefix(&bookmarks, "nope"),
        Err(CliError::BookmarkNotFound(_))
    ));
}

#[test]
fn normalize_bookmark_identifier_rejects_empty() {
    assert!(matches!(
        normalize_bookmark_identifier("  "),
        Err(CliError::EmptyBookmarkId)
    ));
    assert_eq!(normalize_bookmark_identifier(" b1 ").unwrap(), "b1");
}

#[tokio::test(flavor = "current_thread")]
async fn find_bookmark_walks_pages_until_exact_match() {
    let service = PagedService::new(vec![
        vec![bookmark("a1", &[]), bookmark("a2", &[])],
        vec![bookmark("b1", &[])],
        vec![bookmark("c1", &[])],
    ]);
    let mut store = store_for(&service);

    let found = find_bookmark(&mut store, "b1").await.unwrap();
    assert_eq!(found.id, "b1");
    assert_eq!(service.fetched_pages(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread")]
async fn find_bookmark_falls_back_to_prefix() {
    let service = PagedService::new(vec![vec![bookmark("a1", &[])], vec![bookmark("c19", &[])]]);
    let mut store = store_for(&service);

    let found = find_bookmark(&mut store, "c1").await.unwrap();
    assert_eq!(found.id, "c19");
    assert_eq!(service.fetched_pages(), vec![1, 2]);
}

#[tokio::test(flavor = "current_thread")]
async fn load_pages_stops_at_requested_count_or_last_page() {
    let service = PagedService::new(vec![
        vec![bookmark("a", &[])],
        vec![bookmark("b", &[])],
        vec![bookmark("c", &[])],
    ]);
    let mut store = store_for(&service);
    load_pages(&mut store, 2).await.unwrap();
    assert_eq!(service.fetched_pages(), vec![1, 2]);
    assert_eq!(store.bookmarks().len(), 2);

    let service = PagedService::new(vec![vec![bookmark("a", &[])]]);
    let mut store = store_for(&service);
    load_pages(&mut store, 5).await.unwrap();
    assert_eq!(service.fetched_pages(), vec![1]);
}

#[tokio::test(flavor = "current_thread")]
async fn toggle_flag_reports_server_value() {
    let service = PagedService::new(vec![vec![bookmark("a", &[])]]);
    let mut store = store_for(&service);
    store.refresh().await;
    let target = store.bookmarks()[0].clone();

    assert!(toggle_flag(&mut store, ToggleFlag::ReadLater, &target)
        .await
        .unwrap());
    assert!(store.bookmarks()[0].is_read_later);

    assert!(toggle_flag(&mut store, ToggleFlag::Archived, &target)
        .await
        .unwrap());
    assert!(store.bookmarks()[0].is_archived);
}

#[tokio::test(flavor = "current_thread")]
async fn toggle_flag_surfaces_store_error() {
    let service = PagedService::new(vec![vec![bookmark("a", &[])]]);
    let mut store = store_for(&service);
    store.refresh().await;

    let error = toggle_flag(&mut store, ToggleFlag::Archived, &bookmark("ghost", &[]))
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::Request(message) if message.contains("ghost")));
}

#[test]
fn bookmark_lines_show_flags_tags_and_blur() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut tagged = bookmark("abcdefghij", &["a", "b", "c", "d", "e"]);
    tagged.is_read_later = true;
    let mut flagged = bookmark("nsfw1", &[]);
    flagged.is_nsfw = true;

    let lines = format_bookmark_lines(&[&tagged, &flagged], NsfwDisplayMode::Blur, now);
    assert!(lines[0].starts_with("abcdefgh  R-  Post abcdefghij"));
    assert!(lines[0].contains("2h ago"));
    assert!(lines[0].ends_with("#a #b #c +2"));
    assert!(lines[1].contains("[NSFW]"));
    assert!(!lines[1].contains("Post nsfw1"));

    let lines = format_bookmark_lines(&[&flagged], NsfwDisplayMode::Show, now);
    assert!(lines[0].contains("Post nsfw1"));
}

#[test]
fn render_tags_without_overflow() {
    assert_eq!(render_tags(&bookmark("a", &["rust", "web"])), "#rust #web");
    assert_eq!(render_tags(&bookmark("a", &[])), "");
}

#[test]
fn truncate_chars_collapses_whitespace() {
    assert_eq!(truncate_chars("  hello\n  world ", 20), "hello world");
    assert_eq!(truncate_chars("abcdefghij", 6), "abc...");
}

#[test]
fn list_item_resolves_relative_thumbnail() {
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
    let mut entry = bookmark("a", &["rust"]);
    entry.thumbnail = Some("/api/thumbnail?x=1".to_string());
    entry.title = None;

    let item = bookmark_to_list_item(&entry, "https://pf.example.com/", now);
    assert_eq!(item.title, "example.com");
    assert_eq!(
        item.thumbnail.as_deref(),
        Some("https://pf.example.com/api/thumbnail?x=1")
    );
    assert_eq!(item.favicon, None);
    assert_eq!(item.relative_time, "1d ago");
    assert_eq!(item.tags, vec!["rust".to_string()]);
}

#[test]
fn image_label_describes_inline_payloads() {
    assert_eq!(
        image_label(Some("data:image/png;base64,aGVsbG8="), "https://pf.example.com"),
        Some("inline image/png (5 bytes)".to_string())
    );
}

#[test]
fn shared_text_splits_title_and_url() {
    let items = shared_items_from_text("Great article https://example.com/post");
    assert_eq!(
        items,
        vec![
            SharedItem::AttributedText("Great article".to_string()),
            SharedItem::PlainText("https://example.com/post".to_string()),
        ]
    );

    let link = extract_shared_link(&items).unwrap();
    assert_eq!(link.url, "https://example.com/post");
    assert_eq!(link.title.as_deref(), Some("Great article"));

    assert_eq!(extract_shared_link(&shared_items_from_text("no link here")), None);
}

#[test]
fn save_input_prefers_arguments_over_stdin() {
    let from_args = resolve_save_input(&["https://example.com".to_string()], || {
        panic!("stdin must not be read when arguments are given")
    })
    .unwrap();
    assert_eq!(from_args, "https://example.com");

    let from_stdin =
        resolve_save_input(&[], || Ok(Some("https://piped.example.com".to_string()))).unwrap();
    assert_eq!(from_stdin, "https://piped.example.com");

    assert!(matches!(
        resolve_save_input(&[" ".to_string()], || Ok(None)),
        Err(CliError::NothingToSave)
    ));
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("pathfind"));
}
