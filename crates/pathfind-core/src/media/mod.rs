//! Thumbnail and favicon reference resolution.
//!
//! The server stores image references in three shapes:
//! 1. `data:image/...;base64,...` inline payloads
//! 2. absolute `http://` / `https://` URLs
//! 3. paths relative to the server (e.g. generated `/api/thumbnail?...`
//!    placeholders)
//!
//! Renderers call [`resolve_image`] and draw whatever comes back, falling
//! back to a placeholder on `None`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::util::{is_http_url, strip_trailing_slash};

const INLINE_PREFIX: &str = "data:image";

// Payloads in the wild arrive both padded and unpadded.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Classification of a raw reference string, without decoding anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    Inline(&'a str),
    Absolute(&'a str),
    ServerRelative(&'a str),
}

impl<'a> ImageRef<'a> {
    /// `None` for absent or empty references.
    #[must_use]
    pub fn classify(raw: Option<&'a str>) -> Option<Self> {
        let raw = raw.filter(|value| !value.is_empty())?;
        if raw.starts_with(INLINE_PREFIX) {
            Some(Self::Inline(raw))
        } else if is_http_url(raw) {
            Some(Self::Absolute(raw))
        } else {
            Some(Self::ServerRelative(raw))
        }
    }
}

/// Decoded inline image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type from the data URI header, e.g. `image/png`
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// What a renderer should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Inline(InlineImage),
    Remote(String),
}

/// Resolve a thumbnail/favicon reference against the configured server URL.
///
/// Returns `None` when there is nothing drawable: no reference, an inline
/// payload that fails to decode, or a URL that does not parse.
#[must_use]
pub fn resolve_image(raw: Option<&str>, server_url: &str) -> Option<ImageSource> {
    match ImageRef::classify(raw)? {
        ImageRef::Inline(uri) => decode_data_uri(uri).map(ImageSource::Inline),
        ImageRef::Absolute(url) => parse_url(url).map(ImageSource::Remote),
        ImageRef::ServerRelative(path) => {
            parse_url(&join_server_path(server_url, path)).map(ImageSource::Remote)
        }
    }
}

/// Concatenate a server-relative path onto the base URL.
///
/// Only the base URL's trailing slash is stripped; the path is appended
/// verbatim.
#[must_use]
pub fn join_server_path(server_url: &str, path: &str) -> String {
    format!("{}{path}", strip_trailing_slash(server_url))
}

/// Decode the payload after the first comma of a data URI.
///
/// Characters outside the base64 alphabet (line breaks, spaces) are skipped.
#[must_use]
pub fn decode_data_uri(uri: &str) -> Option<InlineImage> {
    let (header, payload) = uri.split_once(',')?;
    let cleaned: String = payload
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '/' | '='))
        .collect();
    let bytes = LENIENT_BASE64.decode(cleaned.trim_end_matches('=')).ok()?;
    if bytes.is_empty() {
        return None;
    }

    let mime_type = header
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .filter(|mime| !mime.is_empty())
        .map(ToString::to_string);
    Some(InlineImage { mime_type, bytes })
}

fn parse_url(raw: &str) -> Option<String> {
    match url::Url::parse(raw) {
        Ok(_) => Some(raw.to_string()),
        Err(error) => {
            tracing::debug!("Ignoring unparseable image URL {}: {}", raw, error);
            None
        }
    }
}
