use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use filter_logging::filter_warn;
use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::{
    decode_page, Article, ArticleExtractor, FailureKind, FetchError, Fetcher, IndexEvent,
    IndexSink,
};

/// Called with the accumulated article snapshot after every successful
/// extraction. Used for the incremental cache write policy; the callback must
/// be idempotent because identical snapshots may repeat.
pub type Checkpoint = Arc<dyn Fn(&[Article]) + Send + Sync>;

/// Fetches and extracts every URL with a fixed number of interleaved workers.
///
/// Workers claim indices from a shared cursor, so each URL is processed
/// exactly once. A failed URL contributes nothing and never stops a worker.
/// The result holds only successes, sorted by publication date descending
/// with unparseable dates (timestamp zero) last; the sort is stable.
pub async fn fetch_all(
    urls: &[String],
    concurrency: usize,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<ArticleExtractor>,
    cancel: &CancellationToken,
    sink: Arc<dyn IndexSink>,
    checkpoint: Option<Checkpoint>,
) -> Vec<Article> {
    let cursor = Arc::new(AtomicUsize::new(0));
    let results: Arc<Mutex<Vec<Article>>> = Arc::new(Mutex::new(Vec::new()));

    let workers = (0..concurrency.max(1)).map(|_| {
        let cursor = cursor.clone();
        let results = results.clone();
        let fetcher = fetcher.clone();
        let extractor = extractor.clone();
        let sink = sink.clone();
        let checkpoint = checkpoint.clone();
        async move {
            loop {
                if cancel.is_cancelled() {
                    break;
                }
                // Atomic claim: read-then-increment as one step, so two
                // workers can never process the same URL.
                let claimed = cursor.fetch_add(1, Ordering::SeqCst);
                if claimed >= urls.len() {
                    break;
                }
                let url = &urls[claimed];
                match fetch_and_extract(fetcher.as_ref(), &extractor, url, cancel).await {
                    Ok(article) => {
                        let snapshot = {
                            let mut out = results.lock().expect("pool results lock");
                            out.push(article);
                            sink.emit(IndexEvent::ArticleIndexed {
                                url: url.clone(),
                                indexed: out.len(),
                            });
                            checkpoint.as_ref().map(|_| out.clone())
                        };
                        if let (Some(checkpoint), Some(snapshot)) = (&checkpoint, snapshot) {
                            checkpoint(&snapshot);
                        }
                    }
                    Err(err) => {
                        filter_warn!("Indexing failed for {url}: {err}");
                        sink.emit(IndexEvent::ArticleFailed {
                            url: url.clone(),
                            error: err.to_string(),
                        });
                    }
                }
            }
        }
    });

    join_all(workers).await;

    let mut articles = match Arc::try_unwrap(results) {
        Ok(mutex) => mutex.into_inner().unwrap_or_default(),
        Err(arc) => arc.lock().expect("pool results lock").clone(),
    };
    articles.sort_by(|a, b| b.date_ts.cmp(&a.date_ts));
    articles
}

async fn fetch_and_extract(
    fetcher: &dyn Fetcher,
    extractor: &ArticleExtractor,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Article, FetchError> {
    let output = fetcher.fetch(url, cancel).await?;
    let page = decode_page(&output.bytes, output.content_type.as_deref())
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    Ok(extractor.extract(url, &page.text))
}
