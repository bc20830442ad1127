use std::sync::Arc;

use filter_logging::{filter_debug, filter_info, filter_warn};
use tokio_util::sync::CancellationToken;

use crate::{
    decode_page, fetch_all, ArticleExtractor, CachePolicy, Fetcher, IndexEvent, IndexOutcome,
    IndexSink, IndexSource, ListingMarkup, MarkupAdapter, PipelineConfig, StorageBackend,
    TagCache, TagIndex, UrlDiscovery,
};

/// The tag-index build pipeline: cache read, URL discovery, bounded-pool
/// fetch, cache write. Every failure degrades to a smaller (possibly empty)
/// index; the build itself never fails.
pub struct IndexPipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn Fetcher>,
    adapter: Arc<dyn MarkupAdapter>,
    cache: Arc<TagCache>,
}

impl IndexPipeline {
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn Fetcher>,
        adapter: Arc<dyn MarkupAdapter>,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        let cache = Arc::new(TagCache::new(
            storage,
            &config.cache_key,
            &config.cache_version,
            config.cache_days,
        ));
        Self {
            config,
            fetcher,
            adapter,
            cache,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Tags persisted by an earlier run, readable before any fetch so the
    /// bar can render immediately.
    pub fn cached_tags(&self) -> Vec<String> {
        match self.config.cache_policy {
            CachePolicy::Disabled => Vec::new(),
            _ => self.cache.load_tags(),
        }
    }

    /// Fetches the live blog index page and reports which of the required
    /// anchors it carries. An unreachable page reports no anchors, which the
    /// caller treats as "leave the page alone".
    pub async fn check_listing(&self, cancel: &CancellationToken) -> ListingMarkup {
        let index_url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.blog_path
        );
        let output = match self.fetcher.fetch(&index_url, cancel).await {
            Ok(output) => output,
            Err(err) => {
                filter_warn!("Listing page fetch failed for {index_url}: {err}");
                return ListingMarkup::default();
            }
        };
        match decode_page(&output.bytes, output.content_type.as_deref()) {
            Ok(page) => self.adapter.listing(&page.text),
            Err(err) => {
                filter_warn!("Listing page decode failed for {index_url}: {err}");
                ListingMarkup::default()
            }
        }
    }

    /// Builds the index, consulting the cache first. `now_ms` stamps cache
    /// writes and drives the expiry check.
    pub async fn build_index(
        &self,
        cancel: &CancellationToken,
        now_ms: i64,
        sink: Arc<dyn IndexSink>,
    ) -> IndexOutcome {
        if self.config.cache_policy != CachePolicy::Disabled {
            if let Some(articles) = self.cache.load(now_ms) {
                filter_info!("Index served from cache ({} articles)", articles.len());
                return IndexOutcome {
                    index: TagIndex::from_articles(articles),
                    source: IndexSource::Cache,
                };
            }
        }

        let discovery = UrlDiscovery::new(
            self.fetcher.clone(),
            self.adapter.clone(),
            self.config.base_url.clone(),
            self.config.sitemap_path.clone(),
            self.config.blog_path.clone(),
            self.config.page_segment.clone(),
        );
        let urls = discovery.discover(self.config.discovery, cancel).await;
        sink.emit(IndexEvent::Discovered {
            url_count: urls.len(),
        });

        let extractor = Arc::new(ArticleExtractor::new(
            self.adapter.clone(),
            self.config.description_budget,
        ));

        let checkpoint = match self.config.cache_policy {
            CachePolicy::IncrementalWrite => {
                let cache = self.cache.clone();
                Some(Arc::new(move |articles: &[crate::Article]| {
                    if let Err(err) = cache.save(articles, now_ms) {
                        filter_debug!("Incremental cache write failed: {err}");
                    }
                }) as crate::pool::Checkpoint)
            }
            _ => None,
        };

        let articles = fetch_all(
            &urls,
            self.config.concurrency,
            self.fetcher.clone(),
            extractor,
            cancel,
            sink,
            checkpoint,
        )
        .await;

        // A cancelled or empty build must not clobber a good cache entry.
        let complete = !cancel.is_cancelled() && !articles.is_empty();
        if complete && self.config.cache_policy != CachePolicy::Disabled {
            if let Err(err) = self.cache.save(&articles, now_ms) {
                filter_warn!("Cache write failed: {err}");
            }
        }

        filter_info!(
            "Index rebuilt: {} of {} urls indexed",
            articles.len(),
            urls.len()
        );
        IndexOutcome {
            index: TagIndex::from_articles(articles),
            source: IndexSource::Rebuilt,
        }
    }
}
