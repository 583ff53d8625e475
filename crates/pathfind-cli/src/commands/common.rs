use std::env;
use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pathfind_core::api::HttpBookmarkService;
use pathfind_core::config::ClientConfig;
use pathfind_core::media::{resolve_image, ImageSource};
use pathfind_core::presentation::{display_title, format_relative_time, tag_chips, NsfwDisplayMode};
use pathfind_core::session::Credentials;
use pathfind_core::share::SharedItem;
use pathfind_core::{Bookmark, BookmarkListStore, BookmarkService};
use serde::Serialize;

use crate::auth::open_session;
use crate::config_profiles::{is_http_url, normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Pages scanned when looking a bookmark up by ID.
const MAX_LOOKUP_PAGES: u32 = 20;
const SHORT_ID_LEN: usize = 8;
const TITLE_WIDTH: usize = 48;
const MAX_TAG_CHIPS: usize = 3;

#[derive(Debug, Serialize)]
pub struct BookmarkListItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub tags: Vec<String>,
    pub is_read_later: bool,
    pub is_archived: bool,
    pub is_nsfw: bool,
    pub created_at: String,
    pub relative_time: String,
    pub thumbnail: Option<String>,
    pub favicon: Option<String>,
}

/// A profile with everything needed to talk to its server.
#[derive(Debug)]
pub struct ResolvedProfile {
    pub name: String,
    pub profile: CliProfile,
    pub credentials: Credentials,
}

pub type CliStore = BookmarkListStore<HttpBookmarkService>;

pub fn resolve_profile(global_profile: Option<&str>) -> Result<ResolvedProfile, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&name).cloned().unwrap_or_default();
    let session = open_session(&name);

    let credentials = merge_credentials(
        &name,
        normalize_text_option(env::var("PATHFIND_SERVER_URL").ok()),
        normalize_text_option(env::var("PATHFIND_API_KEY").ok()),
        profile.server_url(),
        session.credentials(),
    )?;

    Ok(ResolvedProfile {
        name,
        profile,
        credentials,
    })
}

/// Environment overrides win over the profile, which wins over the keychain.
pub fn merge_credentials(
    profile_name: &str,
    env_server_url: Option<String>,
    env_api_key: Option<String>,
    profile_server_url: Option<String>,
    stored: Option<&Credentials>,
) -> Result<Credentials, CliError> {
    let server_url = env_server_url
        .or(profile_server_url)
        .or_else(|| stored.map(|credentials| credentials.server_url().to_string()))
        .ok_or_else(|| {
            CliError::Config(format!(
                "Profile '{profile_name}' has no server URL. Run `pathfind config init --server-url <url>`."
            ))
        })?;
    let api_key = env_api_key
        .or_else(|| stored.map(|credentials| credentials.api_key().to_string()))
        .ok_or_else(|| CliError::NotSignedIn(profile_name.to_string()))?;

    Ok(Credentials::new(server_url, api_key)?)
}

pub fn open_service(
    credentials: &Credentials,
) -> Result<(ClientConfig, HttpBookmarkService), CliError> {
    let config = ClientConfig::new(credentials.server_url())?;
    let service = HttpBookmarkService::from_credentials(&config, credentials)?;
    Ok((config, service))
}

pub fn open_store(resolved: &ResolvedProfile) -> Result<CliStore, CliError> {
    let (config, service) = open_service(&resolved.credentials)?;
    Ok(BookmarkListStore::from_config(Arc::new(service), &config))
}

/// Surface the store's last failure as a command error.
pub fn ensure_store_ok<S: BookmarkService + ?Sized>(
    store: &BookmarkListStore<S>,
) -> Result<(), CliError> {
    match &store.state().error {
        Some(message) => Err(CliError::Request(message.clone())),
        None => Ok(()),
    }
}

/// Load pages until the cursor reaches `pages` or the last page.
pub async fn load_pages<S: BookmarkService + ?Sized>(
    store: &mut BookmarkListStore<S>,
    pages: u32,
) -> Result<(), CliError> {
    store.refresh().await;
    ensure_store_ok(store)?;
    while store.state().current_page < pages.max(1) && store.has_more_pages() {
        store.load_next_page().await;
        ensure_store_ok(store)?;
    }
    Ok(())
}

/// Find a bookmark by exact ID or unique ID prefix in the unfiltered list.
pub async fn find_bookmark<S: BookmarkService + ?Sized>(
    store: &mut BookmarkListStore<S>,
    id_query: &str,
) -> Result<Bookmark, CliError> {
    store.refresh().await;
    ensure_store_ok(store)?;
    loop {
        if let Some(bookmark) = store.bookmarks().iter().find(|bookmark| bookmark.id == id_query) {
            return Ok(bookmark.clone());
        }
        if !store.has_more_pages() || store.state().current_page >= MAX_LOOKUP_PAGES {
            break;
        }
        store.load_next_page().await;
        ensure_store_ok(store)?;
    }

    resolve_bookmark_prefix(store.bookmarks(), id_query).cloned()
}

pub fn resolve_bookmark_prefix<'a>(
    bookmarks: &'a [Bookmark],
    id_query: &str,
) -> Result<&'a Bookmark, CliError> {
    let matching = bookmarks
        .iter()
        .filter(|bookmark| bookmark.id.starts_with(id_query))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::BookmarkNotFound(id_query.to_string())),
        [bookmark] => Ok(*bookmark),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|bookmark| short_id(&bookmark.id))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousBookmarkId(format!(
                "ID prefix '{id_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn format_bookmark_lines(
    bookmarks: &[&Bookmark],
    mode: NsfwDisplayMode,
    now: DateTime<Utc>,
) -> Vec<String> {
    bookmarks
        .iter()
        .map(|bookmark| {
            let id = short_id(&bookmark.id);
            let flags = format!(
                "{}{}",
                if bookmark.is_read_later { 'R' } else { '-' },
                if bookmark.is_archived { 'A' } else { '-' }
            );
            let title = if mode.blurs(bookmark) {
                "[NSFW]".to_string()
            } else {
                truncate_chars(display_title(bookmark), TITLE_WIDTH)
            };
            let relative_time = relative_time(bookmark, now);
            let tags = render_tags(bookmark);

            if tags.is_empty() {
                format!("{id:<8}  {flags}  {title:<48}  {relative_time}")
            } else {
                format!("{id:<8}  {flags}  {title:<48}  {relative_time:<8}  {tags}")
            }
        })
        .collect()
}

pub fn bookmark_to_list_item(
    bookmark: &Bookmark,
    server_url: &str,
    now: DateTime<Utc>,
) -> BookmarkListItem {
    BookmarkListItem {
        id: bookmark.id.clone(),
        title: display_title(bookmark).to_string(),
        url: bookmark.url.clone(),
        domain: bookmark.domain.clone(),
        tags: bookmark.tag_names().map(ToString::to_string).collect(),
        is_read_later: bookmark.is_read_later,
        is_archived: bookmark.is_archived,
        is_nsfw: bookmark.is_nsfw,
        created_at: bookmark.created_at.clone(),
        relative_time: relative_time(bookmark, now),
        thumbnail: image_label(bookmark.thumbnail.as_deref(), server_url),
        favicon: image_label(bookmark.favicon.as_deref(), server_url),
    }
}

/// Remote URL, or a short description of an inline payload.
pub fn image_label(raw: Option<&str>, server_url: &str) -> Option<String> {
    match resolve_image(raw, server_url)? {
        ImageSource::Remote(url) => Some(url),
        ImageSource::Inline(image) => Some(format!(
            "inline {} ({} bytes)",
            image.mime_type.as_deref().unwrap_or("image"),
            image.bytes.len()
        )),
    }
}

pub fn render_tags(bookmark: &Bookmark) -> String {
    let chips = tag_chips(bookmark, MAX_TAG_CHIPS);
    let mut rendered = chips
        .shown
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>();
    if chips.overflow > 0 {
        rendered.push(format!("+{}", chips.overflow));
    }
    rendered.join(" ")
}

fn relative_time(bookmark: &Bookmark, now: DateTime<Utc>) -> String {
    bookmark
        .created_at_utc()
        .map_or_else(|| bookmark.created_at.clone(), |created| format_relative_time(created, now))
}

pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let mut truncated = collapsed
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_bookmark_identifier(id: &str) -> Result<String, CliError> {
    normalize_text_option(Some(id.to_string())).ok_or(CliError::EmptyBookmarkId)
}

/// Split free text into share items: URL-looking words become plain text
/// attachments and the remaining words become the suggested title.
pub fn shared_items_from_text(text: &str) -> Vec<SharedItem> {
    let mut items = Vec::new();
    let mut words = Vec::new();
    for word in text.split_whitespace() {
        if is_http_url(word) {
            items.push(SharedItem::PlainText(word.to_string()));
        } else {
            words.push(word);
        }
    }
    if !words.is_empty() {
        items.insert(0, SharedItem::AttributedText(words.join(" ")));
    }
    items
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text_option(Some(buffer)))
}
