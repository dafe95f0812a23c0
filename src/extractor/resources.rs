use crate::error::{BuilderError, Result};
use crate::fetcher::{extension_for, ResourceFetcher};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

/// Embedding forms that can reference an external resource.
const RESOURCE_PATTERNS: &[(&str, &str)] = &[
    (
        "css_import",
        r#"@import\s+url\((?:"(https?://[^"')]+)"|'(https?://[^"')]+)'|(https?://[^"')]+))\)"#,
    ),
    (
        "style_url",
        r#"url\((?:"(https?://[^"')]+)"|'(https?://[^"')]+)'|(https?://[^"')]+))\)"#,
    ),
    ("img_tag", r#"<img[^>]+src=["'](https?://[^"']+)["']"#),
    ("link_tag", r#"<link[^>]+href=["'](https?://[^"']+)["']"#),
    ("script_tag", r#"<script[^>]+src=["'](https?://[^"']+)["']"#),
];

/// Finds external resource URLs by pattern, not by parsing markup.
pub struct ResourceScanner {
    patterns: Vec<(&'static str, Regex)>,
}

impl ResourceScanner {
    pub fn new() -> Result<Self> {
        let patterns = RESOURCE_PATTERNS
            .iter()
            .map(|(name, pattern)| Ok((*name, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Every distinct `http`/`https` URL referenced by any known form.
    pub fn find_resource_urls(&self, text: &str) -> BTreeSet<String> {
        let mut urls = BTreeSet::new();

        for (name, pattern) in &self.patterns {
            for captures in pattern.captures_iter(text) {
                // Only one alternative participates in each match
                if let Some(url) = captures.iter().skip(1).flatten().next() {
                    tracing::trace!(pattern = name, url = url.as_str(), "found resource url");
                    urls.insert(url.as_str().to_string());
                }
            }
        }

        urls
    }
}

/// Convenience wrapper around a freshly built [`ResourceScanner`].
pub fn find_resource_urls(text: &str) -> Result<BTreeSet<String>> {
    Ok(ResourceScanner::new()?.find_resource_urls(text))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    Saved { url: String, filename: String },
    Failed { url: String, reason: String },
}

/// Rewrites external resource URLs to point at locally saved copies.
pub struct Localizer<'a> {
    fetcher: &'a dyn ResourceFetcher,
    scanner: ResourceScanner,
    offline: bool,
    event_callback: Option<&'a dyn Fn(&ResourceEvent)>,
}

impl<'a> Localizer<'a> {
    pub fn new(fetcher: &'a dyn ResourceFetcher) -> Result<Self> {
        Ok(Self {
            fetcher,
            scanner: ResourceScanner::new()?,
            offline: false,
            event_callback: None,
        })
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_events(mut self, callback: &'a dyn Fn(&ResourceEvent)) -> Self {
        self.event_callback = Some(callback);
        self
    }

    /// Localizes a single section's content into `folder`.
    pub fn localize(&self, content: &str, folder: &Path) -> Result<String> {
        if self.offline {
            return Ok(content.to_string());
        }

        let urls = self.scanner.find_resource_urls(content);
        let resolved = self.resolve_all(&urls, folder)?;

        Ok(replace_urls(content, &resolved))
    }

    /// Localizes every section of one document. URLs are numbered once across
    /// the whole document so sections never overwrite each other's downloads.
    pub fn localize_sections(
        &self,
        sections: BTreeMap<String, String>,
        folder: &Path,
    ) -> Result<BTreeMap<String, String>> {
        if self.offline {
            return Ok(sections);
        }

        let found: BTreeMap<&str, BTreeSet<String>> = sections
            .iter()
            .map(|(name, content)| (name.as_str(), self.scanner.find_resource_urls(content)))
            .collect();

        let urls: BTreeSet<String> = found.values().flatten().cloned().collect();
        let resolved = self.resolve_all(&urls, folder)?;

        // Each section only rewrites the URLs found in its own content
        let mut localized = BTreeMap::new();
        for (name, content) in &sections {
            let own: Vec<(String, String)> = match found.get(name.as_str()) {
                Some(own_urls) => resolved
                    .iter()
                    .filter(|(url, _)| own_urls.contains(url))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            localized.insert(name.clone(), replace_urls(content, &own));
        }

        Ok(localized)
    }

    /// Downloads `url` to `resource-<index><ext>` inside `folder`.
    ///
    /// Failures are reported and logged, never raised: `None` means no file
    /// was produced.
    pub fn download_resource(&self, url: &str, folder: &Path, index: usize) -> Option<String> {
        match self.try_download(url, folder, index) {
            Ok(filename) => {
                tracing::info!(url, filename = filename.as_str(), "saved resource");
                self.emit(ResourceEvent::Saved {
                    url: url.to_string(),
                    filename: filename.clone(),
                });
                Some(filename)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to download resource");
                self.emit(ResourceEvent::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn try_download(&self, url: &str, folder: &Path, index: usize) -> Result<String> {
        let resource = self.fetcher.fetch(url)?;
        let extension = extension_for(url, resource.content_type.as_deref());
        let filename = format!("resource-{}{}", index, extension);

        let mut temp = tempfile::NamedTempFile::new_in(folder)?;
        temp.write_all(&resource.body)?;
        temp.persist(folder.join(&filename))
            .map_err(|e| BuilderError::Io(e.error))?;

        Ok(filename)
    }

    fn resolve_all(&self, urls: &BTreeSet<String>, folder: &Path) -> Result<Vec<(String, String)>> {
        let mut resolved = Vec::with_capacity(urls.len());

        for (position, url) in urls.iter().enumerate() {
            let filename = self
                .download_resource(url, folder, position + 1)
                .ok_or_else(|| BuilderError::ResourceDownload { url: url.clone() })?;
            resolved.push((url.clone(), filename));
        }

        Ok(resolved)
    }

    fn emit(&self, event: ResourceEvent) {
        if let Some(callback) = self.event_callback {
            callback(&event);
        }
    }
}

/// Blind substring replacement, applied in the given order. Any unrelated text
/// that happens to contain a URL is rewritten too.
fn replace_urls(content: &str, resolved: &[(String, String)]) -> String {
    resolved
        .iter()
        .fold(content.to_string(), |acc, (url, filename)| {
            acc.replace(url.as_str(), filename)
        })
}
