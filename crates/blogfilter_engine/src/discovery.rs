use std::sync::Arc;

use filter_logging::{filter_debug, filter_info, filter_warn};
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{decode_page, Fetcher, MarkupAdapter};

/// How article URLs are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryStrategy {
    /// Read the site's sitemap and keep blog article entries.
    #[default]
    Sitemap,
    /// Walk the paginated listing pages and collect article links.
    Pagination,
}

/// Discovers the set of article URLs to index.
///
/// Failures degrade: a dead sitemap yields an empty list (no filters shown),
/// a dead listing page is skipped.
pub struct UrlDiscovery {
    fetcher: Arc<dyn Fetcher>,
    adapter: Arc<dyn MarkupAdapter>,
    base_url: String,
    sitemap_path: String,
    blog_path: String,
    page_segment: String,
}

impl UrlDiscovery {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        adapter: Arc<dyn MarkupAdapter>,
        base_url: impl Into<String>,
        sitemap_path: impl Into<String>,
        blog_path: impl Into<String>,
        page_segment: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            adapter,
            base_url: base_url.into(),
            sitemap_path: sitemap_path.into(),
            blog_path: blog_path.into(),
            page_segment: page_segment.into(),
        }
    }

    pub async fn discover(
        &self,
        strategy: DiscoveryStrategy,
        cancel: &CancellationToken,
    ) -> Vec<String> {
        match strategy {
            DiscoveryStrategy::Sitemap => self.from_sitemap(cancel).await,
            DiscoveryStrategy::Pagination => self.from_listing(cancel).await,
        }
    }

    async fn from_sitemap(&self, cancel: &CancellationToken) -> Vec<String> {
        let sitemap_url = join_url(&self.base_url, &self.sitemap_path);
        let text = match self.fetch_text(&sitemap_url, cancel).await {
            Some(text) => text,
            None => {
                filter_warn!("Sitemap fetch failed for {sitemap_url}; no articles discovered");
                return Vec::new();
            }
        };

        let urls = sitemap_blog_urls(&text, &self.blog_path);
        filter_info!("Sitemap yielded {} blog article urls", urls.len());
        urls
    }

    async fn from_listing(&self, cancel: &CancellationToken) -> Vec<String> {
        let index_url = join_url(&self.base_url, &self.blog_path);
        let first = match self.fetch_text(&index_url, cancel).await {
            Some(text) => text,
            None => {
                filter_warn!("Listing fetch failed for {index_url}; no articles discovered");
                return Vec::new();
            }
        };

        let listing = self.adapter.listing(&first);
        let last_page = listing.last_page.unwrap_or(1);
        let mut urls: Vec<String> = Vec::new();
        self.collect_articles(&mut urls, listing.article_urls);

        for page in 2..=last_page {
            if cancel.is_cancelled() {
                break;
            }
            let page_url = join_url(
                &self.base_url,
                &format!("{}{}{}/", self.blog_path, self.page_segment, page),
            );
            match self.fetch_text(&page_url, cancel).await {
                Some(text) => {
                    let page_listing = self.adapter.listing(&text);
                    self.collect_articles(&mut urls, page_listing.article_urls);
                }
                None => {
                    // One dead listing page is not fatal to the walk.
                    filter_warn!("Skipping unreachable listing page {page_url}");
                }
            }
        }

        filter_info!("Listing walk over {last_page} pages yielded {} urls", urls.len());
        urls
    }

    fn collect_articles(&self, urls: &mut Vec<String>, found: Vec<String>) {
        for href in found {
            let absolute = resolve_url(&self.base_url, &href);
            if !urls.contains(&absolute) {
                urls.push(absolute);
            }
        }
    }

    async fn fetch_text(&self, url: &str, cancel: &CancellationToken) -> Option<String> {
        let output = match self.fetcher.fetch(url, cancel).await {
            Ok(output) => output,
            Err(err) => {
                filter_debug!("Fetch failed for {url}: {err}");
                return None;
            }
        };
        match decode_page(&output.bytes, output.content_type.as_deref()) {
            Ok(page) => Some(page.text),
            Err(err) => {
                filter_debug!("Decode failed for {url}: {err}");
                None
            }
        }
    }
}

/// Extracts blog article locations from a sitemap document: every `loc`
/// containing the blog path segment that is not the blog index itself.
fn sitemap_blog_urls(xml: &str, blog_path: &str) -> Vec<String> {
    // The lenient HTML parser handles sitemap XML the same way the
    // original's DOMParser did.
    let doc = Html::parse_document(xml);
    let loc_sel = match Selector::parse("loc") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };

    let mut urls: Vec<String> = Vec::new();
    for loc in doc.select(&loc_sel) {
        let value = loc.text().collect::<String>().trim().to_string();
        if value.is_empty() || !value.contains(blog_path) || value.ends_with(blog_path) {
            continue;
        }
        if !urls.contains(&value) {
            urls.push(value);
        }
    }
    urls
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Resolves a possibly relative article href against the site base.
fn resolve_url(base: &str, href: &str) -> String {
    if let Ok(parsed) = Url::parse(href) {
        return parsed.to_string();
    }
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => href.to_string(),
    }
}
