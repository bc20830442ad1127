use crate::{CachePolicy, DiscoveryStrategy, FetchSettings};

/// Explicit pipeline configuration, replacing the ambient constants the
/// storefront script carried at module scope. Defaults mirror the shipped
/// values: versioned `v2` cache key, 7-day expiry, 4 concurrent fetches,
/// 12 items per page.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Site origin, e.g. `https://shop.example`.
    pub base_url: String,
    pub sitemap_path: String,
    /// Path segment identifying blog pages; also the blog index path.
    pub blog_path: String,
    /// Pagination path token: listing page N lives at
    /// `{blog_path}{page_segment}{N}/`.
    pub page_segment: String,
    pub cache_key: String,
    /// Bump to force a global cache invalidation after a markup or schema
    /// change.
    pub cache_version: String,
    pub cache_days: i64,
    pub cache_policy: CachePolicy,
    pub discovery: DiscoveryStrategy,
    /// Worker count of the fetch pool.
    pub concurrency: usize,
    /// Items revealed per load-more step in the client-rendered list.
    pub page_size: usize,
    /// Character budget for the article description, ellipsis included.
    pub description_budget: usize,
    pub fetch: FetchSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            sitemap_path: "/sitemap.xml".to_string(),
            blog_path: "/blog/".to_string(),
            page_segment: "strana-".to_string(),
            cache_key: "blog_articles".to_string(),
            cache_version: "v2".to_string(),
            cache_days: 7,
            cache_policy: CachePolicy::default(),
            discovery: DiscoveryStrategy::default(),
            concurrency: 4,
            page_size: 12,
            description_budget: 220,
            fetch: FetchSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn for_site(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
