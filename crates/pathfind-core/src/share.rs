//! Share handoff: turn what the host OS hands over into a saved bookmark.

use url::Url;

use crate::models::{Bookmark, NewBookmark};
use crate::service::BookmarkService;
use crate::util::normalize_text_option;
use crate::{Error, Result};

/// One attachment or text fragment handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedItem {
    /// A typed URL attachment
    Url(String),
    /// A plain-text attachment that may contain a URL
    PlainText(String),
    /// Descriptive text accompanying the share (page title, selection)
    AttributedText(String),
}

/// A URL ready to be saved, plus the title the host suggested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLink {
    pub url: String,
    pub title: Option<String>,
}

/// User choices made on the share sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Overrides the suggested title when set
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub read_later: bool,
}

/// Pick the link to save out of the shared items.
///
/// The title is the last non-empty attributed text. The URL comes from the
/// last URL attachment, or from plain text that parses as an `http(s)` URL.
/// Returns `None` when nothing savable was shared, in which case the host
/// should dismiss the sheet.
#[must_use]
pub fn extract_shared_link(items: &[SharedItem]) -> Option<SharedLink> {
    let mut url = None;
    let mut title = None;

    for item in items {
        match item {
            SharedItem::AttributedText(text) => {
                if let Some(text) = normalize_text_option(Some(text.clone())) {
                    title = Some(text);
                }
            }
            SharedItem::Url(raw) => {
                if let Some(parsed) = parse_http_url(raw) {
                    url = Some(parsed);
                }
            }
            SharedItem::PlainText(text) => {
                if let Some(parsed) = parse_http_url(text) {
                    url = Some(parsed);
                }
            }
        }
    }

    url.map(|url| SharedLink { url, title })
}

/// Build the create request for a shared link.
pub fn new_bookmark(link: &SharedLink, options: SaveOptions) -> Result<NewBookmark> {
    let url = parse_http_url(&link.url)
        .ok_or_else(|| Error::InvalidInput(format!("not an http(s) URL: {}", link.url)))?;
    let tags = options
        .tags
        .into_iter()
        .filter_map(|tag| normalize_text_option(Some(tag.trim_start_matches('#').to_string())))
        .collect();

    Ok(NewBookmark {
        url,
        title: normalize_text_option(options.title).or_else(|| link.title.clone()),
        tags,
        is_read_later: options.read_later,
    })
}

/// Save a shared link through the service.
pub async fn save_shared_link<S: BookmarkService + ?Sized>(
    service: &S,
    link: &SharedLink,
    options: SaveOptions,
) -> Result<Bookmark> {
    let request = new_bookmark(link, options)?;
    tracing::info!(url = %request.url, "Saving shared link");
    service.create_bookmark(&request).await
}

fn parse_http_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    if parsed.scheme().starts_with("http") {
        Some(parsed.to_string())
    } else {
        None
    }
}
