//! HTTP implementation of [`BookmarkService`] against the PathFind REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::models::{Bookmark, BookmarkPage, BookmarkUpdate, Collection, NewBookmark, Tag};
use crate::query::BookmarkQuery;
use crate::service::BookmarkService;
use crate::session::Credentials;
use crate::util::compact_text;
use crate::{Error, Result};

/// reqwest-backed bookmark service.
#[derive(Debug, Clone)]
pub struct HttpBookmarkService {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpBookmarkService {
    pub fn new(config: &ClientConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            base_url: config.api_base_url().to_string(),
            api_key,
            client,
        })
    }

    /// Build a service from signed-in session credentials.
    pub fn from_credentials(config: &ClientConfig, credentials: &Credentials) -> Result<Self> {
        Self::new(config, credentials.api_key())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bookmark_endpoint(&self, id: &str) -> String {
        self.endpoint(&format!("/api/bookmarks/{}", urlencoding::encode(id)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: parse_api_error(status, &body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl BookmarkService for HttpBookmarkService {
    async fn fetch_bookmarks(&self, query: &BookmarkQuery) -> Result<BookmarkPage> {
        tracing::debug!(
            filter = %query.filter,
            sort = %query.sort,
            page = query.page,
            "Fetching bookmarks"
        );
        let request = self
            .client
            .get(self.endpoint("/api/bookmarks"))
            .query(&query.to_params());
        self.send_json(request).await
    }

    async fn delete_bookmark(&self, id: &str) -> Result<()> {
        tracing::debug!(id, "Deleting bookmark");
        self.send(self.client.delete(self.bookmark_endpoint(id)))
            .await?;
        Ok(())
    }

    async fn update_bookmark(&self, id: &str, update: &BookmarkUpdate) -> Result<Bookmark> {
        tracing::debug!(id, ?update, "Updating bookmark");
        let request = self.client.patch(self.bookmark_endpoint(id)).json(update);
        let payload: BookmarkEnvelope = self.send_json(request).await?;
        Ok(payload.into_bookmark())
    }

    async fn fetch_collections(&self) -> Result<Vec<Collection>> {
        let request = self.client.get(self.endpoint("/api/collections"));
        let payload: CollectionsEnvelope = self.send_json(request).await?;
        Ok(payload.into_collections())
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        let request = self.client.get(self.endpoint("/api/tags"));
        let payload: TagsEnvelope = self.send_json(request).await?;
        Ok(payload.into_tags())
    }

    async fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark> {
        tracing::debug!(url = %bookmark.url, "Creating bookmark");
        let request = self
            .client
            .post(self.endpoint("/api/bookmarks"))
            .json(bookmark);
        let payload: BookmarkEnvelope = self.send_json(request).await?;
        Ok(payload.into_bookmark())
    }
}

// ---------------------------------------------------------------------------
// Private
// ---------------------------------------------------------------------------

// Single-record and list endpoints answer either with the bare value or
// wrapped in an object keyed by the resource name.

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BookmarkEnvelope {
    Wrapped { bookmark: Bookmark },
    Bare(Bookmark),
}

impl BookmarkEnvelope {
    fn into_bookmark(self) -> Bookmark {
        match self {
            Self::Wrapped { bookmark } | Self::Bare(bookmark) => bookmark,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CollectionsEnvelope {
    Wrapped { collections: Vec<Collection> },
    Bare(Vec<Collection>),
}

impl CollectionsEnvelope {
    fn into_collections(self) -> Vec<Collection> {
        match self {
            Self::Wrapped { collections } | Self::Bare(collections) => collections,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagsEnvelope {
    Wrapped { tags: Vec<Tag> },
    Bare(Vec<Tag>),
}

impl TagsEnvelope {
    fn into_tags(self) -> Vec<Tag> {
        match self {
            Self::Wrapped { tags } | Self::Bare(tags) => tags,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = payload.error.or(payload.message) {
            let message = message.trim();
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
    } else {
        trimmed
    }
}
