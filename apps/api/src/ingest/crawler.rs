//! Site crawler: sitemap resolution (cached) followed by bounded page fetches.
//!
//! Flow: cache lookup → `<site>/sitemap.xml` → `<loc>` list (or `[site]`) →
//! cache write → sequential page fetches. A page that fails to load is recorded
//! as `PageFetch::Skipped` and never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::UrlListCache;
use crate::fetch::PageFetcher;
use crate::html::extract_sitemap_locs;

/// A fetched page. Lives only for the duration of one ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawPage {
    pub url: String,
    pub html: String,
}

/// Outcome of fetching one resolved URL.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFetch {
    Fetched(RawPage),
    Skipped { url: String, reason: String },
}

#[derive(Clone)]
pub struct SiteCrawler {
    fetcher: PageFetcher,
    cache: Arc<dyn UrlListCache>,
    cache_ttl: Duration,
}

impl SiteCrawler {
    pub fn new(fetcher: PageFetcher, cache: Arc<dyn UrlListCache>, cache_ttl: Duration) -> Self {
        Self {
            fetcher,
            cache,
            cache_ttl,
        }
    }

    /// Crawls `site_url` and returns the pages that loaded, in resolution order.
    pub async fn crawl(&self, site_url: &str, limit: usize) -> Vec<RawPage> {
        self.crawl_outcomes(site_url, limit)
            .await
            .into_iter()
            .filter_map(|outcome| match outcome {
                PageFetch::Fetched(page) => Some(page),
                PageFetch::Skipped { .. } => None,
            })
            .collect()
    }

    /// Like [`SiteCrawler::crawl`], keeping a tagged outcome per resolved URL.
    pub async fn crawl_outcomes(&self, site_url: &str, limit: usize) -> Vec<PageFetch> {
        let urls = self.resolve_urls(site_url, limit).await;

        let mut outcomes = Vec::with_capacity(urls.len().min(limit));
        for url in urls.into_iter().take(limit) {
            match self.fetcher.fetch_text(&url).await {
                Ok(html) => outcomes.push(PageFetch::Fetched(RawPage { url, html })),
                Err(e) => {
                    warn!("Skipping {url}: {e}");
                    outcomes.push(PageFetch::Skipped {
                        url,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let fetched = outcomes
            .iter()
            .filter(|o| matches!(o, PageFetch::Fetched(_)))
            .count();
        info!(
            "Crawled {site_url}: {fetched}/{} pages fetched",
            outcomes.len()
        );
        outcomes
    }

    /// Drops the cached URL list so the next crawl re-reads the sitemap.
    pub async fn invalidate(&self, site_url: &str) {
        if let Err(e) = self.cache.expire(&cache_key(site_url)).await {
            warn!("Failed to expire sitemap cache for {site_url}: {e}");
        }
    }

    /// Cached URL list for `site_url`, resolving and caching it on a miss.
    ///
    /// The cached list is reused as-is within the TTL even if the sitemap changed.
    async fn resolve_urls(&self, site_url: &str, limit: usize) -> Vec<String> {
        let key = cache_key(site_url);
        match self.cache.get(&key).await {
            Ok(Some(urls)) => {
                debug!("Sitemap cache hit for {site_url} ({} urls)", urls.len());
                return urls;
            }
            Ok(None) => {}
            Err(e) => warn!("Sitemap cache read failed for {site_url}: {e}"),
        }

        let mut urls = self.fetch_sitemap(site_url, limit).await;
        if urls.is_empty() {
            urls = vec![site_url.to_string()];
        }

        if let Err(e) = self.cache.put(&key, &urls, self.cache_ttl).await {
            warn!("Sitemap cache write failed for {site_url}: {e}");
        }
        urls
    }

    async fn fetch_sitemap(&self, site_url: &str, limit: usize) -> Vec<String> {
        let Some(sitemap_url) = sitemap_url(site_url) else {
            warn!("Cannot derive sitemap URL from {site_url}");
            return Vec::new();
        };
        match self.fetcher.fetch_text(&sitemap_url).await {
            Ok(xml) => extract_sitemap_locs(&xml).into_iter().take(limit).collect(),
            Err(e) => {
                debug!("No sitemap at {sitemap_url}: {e}");
                Vec::new()
            }
        }
    }
}

fn cache_key(site_url: &str) -> String {
    format!("sitemap:{site_url}")
}

/// `/sitemap.xml` at the root of the site's origin.
fn sitemap_url(site_url: &str) -> Option<String> {
    Url::parse(site_url)
        .and_then(|base| base.join("/sitemap.xml"))
        .map(String::from)
        .ok()
}
