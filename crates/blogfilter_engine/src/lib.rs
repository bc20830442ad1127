//! Blogfilter engine: IO pipeline that builds and caches the blog tag index.
mod cache;
mod config;
mod decode;
mod discovery;
mod extract;
mod fetch;
mod handle;
mod markup;
mod pipeline;
mod pool;
mod storage;
mod types;

pub use cache::{CachePolicy, TagCache, MS_PER_DAY};
pub use config::PipelineConfig;
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use discovery::{DiscoveryStrategy, UrlDiscovery};
pub use extract::{parse_date_ts, truncate_text, ArticleExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use handle::PipelineHandle;
pub use markup::{ArticleMarkup, ListingMarkup, MarkupAdapter, StorefrontMarkup};
pub use pipeline::IndexPipeline;
pub use pool::{fetch_all, Checkpoint};
pub use storage::{
    atomic_write, ensure_storage_dir, FileStorage, MemoryStorage, StorageBackend, StorageError,
};
pub use types::{
    Article, ChannelIndexSink, FailureKind, FetchError, FetchOutput, IndexEvent, IndexOutcome,
    IndexSink, IndexSource, NullSink, TagIndex,
};
