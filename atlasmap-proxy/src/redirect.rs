//! Short-link resolution.
//!
//! Link shorteners and map-sharing services do not always answer with an
//! HTTP redirect. Some serve a tiny HTML page that forwards the browser with a
//! `<meta http-equiv="refresh">` tag or a line of JavaScript. The resolver
//! follows HTTP redirects through the client's redirect policy and then
//! scrapes HTML bodies for those page-level redirects.

use crate::error::ProxyError;
use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client, Url};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

static META_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta tag pattern"));

static HTTP_EQUIV_REFRESH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)http-equiv\s*=\s*["']?\s*refresh"#).expect("valid http-equiv pattern")
});

static CONTENT_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)content\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid content pattern")
});

static REFRESH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)url\s*=\s*['"]?([^'"\s]+)"#).expect("valid refresh url pattern")
});

static JS_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:location(?:\.href)?\s*=\s*|location\.(?:replace|assign)\s*\(\s*)["']([^"']+)["']"#,
    )
    .expect("valid location pattern")
});

/// Finds a page-level redirect target in an HTML document, resolved against `base`.
///
/// Meta refresh tags take precedence over script redirects. Targets that do
/// not resolve to an http(s) URL are ignored.
pub fn extract_redirect(html: &str, base: &Url) -> Option<Url> {
    meta_refresh_target(html)
        .into_iter()
        .chain(JS_LOCATION.captures_iter(html).map(|c| c[1].to_string()))
        .filter_map(|raw| base.join(&decode_entities(&raw)).ok())
        .find(is_http)
}

fn meta_refresh_target(html: &str) -> Option<String> {
    META_TAG
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| HTTP_EQUIV_REFRESH.is_match(tag))
        .find_map(|tag| {
            let content = CONTENT_ATTR.captures(tag)?;
            let content = content.get(1).or_else(|| content.get(2))?.as_str();
            REFRESH_URL
                .captures(content)
                .map(|c| c[1].to_string())
        })
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
}

pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Outcome of resolving a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub url: String,
    pub resolved: String,
    pub hops: usize,
}

/// In-memory cache of resolved links using LRU eviction
#[derive(Debug, Clone)]
pub struct ResolvedCache {
    cache: Arc<Mutex<LruCache<String, Resolution>>>,
}

impl ResolvedCache {
    /// Create a new cache with the given capacity (at least one entry)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn get(&self, url: &str) -> Option<Resolution> {
        self.cache.lock().ok()?.get(url).cloned()
    }

    pub fn insert(&self, resolution: Resolution) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(resolution.url.clone(), resolution);
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

/// Follows HTTP and page-level redirects to a link's final destination.
///
/// The client must not follow redirects on its own: every hop, HTTP or
/// page-level, is taken here and counted against `max_redirects`.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    client: Client,
    max_redirects: usize,
    cache: ResolvedCache,
}

impl RedirectResolver {
    pub fn new(client: Client, max_redirects: usize, cache: ResolvedCache) -> Self {
        Self {
            client,
            max_redirects,
            cache,
        }
    }

    pub async fn resolve(&self, url: &Url) -> Result<Resolution, ProxyError> {
        if let Some(hit) = self.cache.get(url.as_str()) {
            log::debug!("resolve cache hit for {}", url);
            return Ok(hit);
        }

        let mut current = url.clone();
        let mut hops = 0;
        while let Some(next) = self.next_hop(&current).await? {
            hops += 1;
            if hops > self.max_redirects {
                return Err(ProxyError::TooManyRedirects(self.max_redirects));
            }
            log::debug!("redirect {} -> {}", current, next);
            current = next;
        }

        let resolution = Resolution {
            url: url.to_string(),
            resolved: current.to_string(),
            hops,
        };
        log::info!("resolved {} -> {} ({} hops)", resolution.url, resolution.resolved, hops);
        self.cache.insert(resolution.clone());
        log::debug!("{} resolutions cached", self.cache.len());
        Ok(resolution)
    }

    /// Where `current` redirects to, from its `Location` header or its HTML body.
    async fn next_hop(&self, current: &Url) -> Result<Option<Url>, ProxyError> {
        let response = self.client.get(current.clone()).send().await?;

        if response.status().is_redirection() {
            return Ok(response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|location| current.join(location).ok())
                .filter(is_http));
        }

        let is_html = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.contains("text/html"));
        if !is_html {
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(extract_redirect(&body, current).filter(|next| next != current))
    }
}
