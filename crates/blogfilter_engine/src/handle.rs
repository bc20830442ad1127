use std::sync::{mpsc, Arc};
use std::thread;

use chrono::Utc;
use filter_logging::filter_error;
use tokio_util::sync::CancellationToken;

use crate::{
    ChannelIndexSink, Fetcher, IndexEvent, IndexOutcome, IndexPipeline, IndexSink, IndexSource,
    MarkupAdapter, PipelineConfig, ReqwestFetcher, StorageBackend, StorefrontMarkup, TagIndex,
};

/// Runs one index session on a background thread that owns its own tokio
/// runtime, so the consumer stays synchronous and just drains events.
pub struct PipelineHandle {
    event_rx: mpsc::Receiver<IndexEvent>,
    cancel: CancellationToken,
}

impl PipelineHandle {
    pub fn spawn(config: PipelineConfig, storage: Arc<dyn StorageBackend>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let session_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(run_session(config, storage, session_cancel, event_tx));
        });

        Self { event_rx, cancel }
    }

    /// Blocks until the next event; `None` once the session thread is gone.
    pub fn recv(&self) -> Option<IndexEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<IndexEvent> {
        self.event_rx.try_recv().ok()
    }

    /// The page-navigation analog: cooperatively aborts discovery and all
    /// in-flight article fetches.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

async fn run_session(
    config: PipelineConfig,
    storage: Arc<dyn StorageBackend>,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<IndexEvent>,
) {
    let fetcher: Arc<dyn Fetcher> = match ReqwestFetcher::new(config.fetch.clone()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(err) => {
            filter_error!("Failed to build HTTP client: {err}");
            let _ = event_tx.send(IndexEvent::Completed {
                outcome: IndexOutcome {
                    index: TagIndex::from_articles(Vec::new()),
                    source: IndexSource::Rebuilt,
                },
            });
            return;
        }
    };
    let adapter: Arc<dyn MarkupAdapter> =
        Arc::new(StorefrontMarkup::new(config.page_segment.clone()));
    let pipeline = IndexPipeline::new(config, fetcher, adapter, storage);
    let sink: Arc<dyn IndexSink> = Arc::new(ChannelIndexSink::new(event_tx.clone()));

    let listing = pipeline.check_listing(&cancel).await;
    let _ = event_tx.send(IndexEvent::ListingChecked {
        has_listing: listing.has_listing,
        has_description_anchor: listing.has_description_anchor,
    });

    let now_ms = Utc::now().timestamp_millis();
    let outcome = pipeline.build_index(&cancel, now_ms, sink).await;
    let _ = event_tx.send(IndexEvent::Completed { outcome });
}
