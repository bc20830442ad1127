use std::fmt;

use serde::{Deserialize, Serialize};

/// One indexed blog article, built by the extractor from a fetched page.
/// Immutable once built; serialized wholesale into the tag cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    /// Date string as found in the markup, kept for display.
    pub date_raw: String,
    /// Epoch milliseconds; zero when the date was missing or unparseable,
    /// which sorts the article last.
    pub date_ts: i64,
    pub image_url: String,
    pub description: String,
    /// First-seen order, deduplicated.
    pub tags: Vec<String>,
}

/// Aggregated result of an index build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIndex {
    /// Sorted by `date_ts` descending; zero timestamps last. The sort is
    /// stable for equal timestamps.
    pub articles: Vec<Article>,
    /// Distinct tags in first-seen order across the sorted article list.
    pub tags: Vec<String>,
}

impl TagIndex {
    pub fn from_articles(mut articles: Vec<Article>) -> Self {
        articles.sort_by(|a, b| b.date_ts.cmp(&a.date_ts));
        let tags = first_seen_tags(&articles);
        Self { articles, tags }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Distinct tags across `articles`, preserving first-seen order.
pub(crate) fn first_seen_tags(articles: &[Article]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for article in articles {
        for tag in &article.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

/// Where the index came from on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    Cache,
    Rebuilt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutcome {
    pub index: TagIndex,
    pub source: IndexSource,
}

/// Progress events emitted while a pipeline session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// The live listing page was inspected for the anchors the enhancement
    /// needs. Both false when the page could not be fetched at all.
    ListingChecked {
        has_listing: bool,
        has_description_anchor: bool,
    },
    Discovered {
        url_count: usize,
    },
    ArticleIndexed {
        url: String,
        indexed: usize,
    },
    ArticleFailed {
        url: String,
        error: String,
    },
    Completed {
        outcome: IndexOutcome,
    },
}

pub trait IndexSink: Send + Sync {
    fn emit(&self, event: IndexEvent);
}

/// Discards all events. Used by direct `build_index` callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl IndexSink for NullSink {
    fn emit(&self, _event: IndexEvent) {}
}

/// Forwards events over an mpsc channel to a synchronous consumer.
pub struct ChannelIndexSink {
    tx: std::sync::mpsc::Sender<IndexEvent>,
}

impl ChannelIndexSink {
    pub fn new(tx: std::sync::mpsc::Sender<IndexEvent>) -> Self {
        Self { tx }
    }
}

impl IndexSink for ChannelIndexSink {
    fn emit(&self, event: IndexEvent) {
        let _ = self.tx.send(event);
    }
}

/// Raw result of one page fetch, before charset decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub final_url: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "charset decode failed"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
