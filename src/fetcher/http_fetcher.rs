use crate::error::{BuilderError, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

pub const DEFAULT_EXTENSION: &str = ".bin";

/// Body and declared media type of a fetched resource.
#[derive(Debug, Clone, Default)]
pub struct FetchedResource {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Retrieves the bytes behind an external resource URL.
///
/// Implementations must fail on transport errors and non-success statuses.
pub trait ResourceFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource>;
}

pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| BuilderError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, timeout })
    }

    fn http_error(&self, url: &str, error: reqwest::Error) -> BuilderError {
        let message = if error.is_timeout() {
            format!("timed out after {} seconds", self.timeout.as_secs())
        } else if let Some(status) = error.status() {
            format!("server responded with {}", status)
        } else {
            error.to_string()
        };

        BuilderError::Http {
            url: url.to_string(),
            message,
        }
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource> {
        tracing::debug!(url, "fetching resource");

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| self.http_error(url, e))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().map_err(|e| self.http_error(url, e))?;

        Ok(FetchedResource {
            body: body.to_vec(),
            content_type,
        })
    }
}

/// Picks the file extension for a downloaded resource: the URL path first,
/// then the declared content type, then [`DEFAULT_EXTENSION`].
pub fn extension_for(url: &str, content_type: Option<&str>) -> String {
    extension_from_url(url)
        .or_else(|| content_type.and_then(extension_from_content_type))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Extension (with leading dot) of the last path segment, ignoring query and fragment.
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last_segment = parsed.path_segments()?.last()?;

    let dot = last_segment.rfind('.')?;
    // Leading-dot names such as ".htaccess" have no extension
    if dot == 0 || dot + 1 == last_segment.len() {
        return None;
    }

    Some(last_segment[dot..].to_string())
}

/// Best-effort media type lookup; parameters such as `charset` are ignored.
pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if mime.is_empty() {
        return None;
    }

    let preferred = match mime.as_str() {
        "text/css" => Some("css"),
        "text/html" => Some("html"),
        "text/javascript" | "application/javascript" | "application/x-javascript" => Some("js"),
        "application/json" => Some("json"),
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "image/webp" => Some("webp"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some("ico"),
        "font/woff" => Some("woff"),
        "font/woff2" => Some("woff2"),
        "font/ttf" => Some("ttf"),
        "text/plain" => Some("txt"),
        _ => None,
    };

    preferred
        .or_else(|| {
            mime_guess::get_mime_extensions_str(&mime)
                .and_then(|extensions| extensions.first().copied())
        })
        .map(|ext| format!(".{}", ext))
}
