//! Wires the engine pipeline to the core state machine: runs one index
//! session, resolves the initial filter, and renders the enhanced page.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use blogfilter_core::{update, ArticleCard, FilterState, MatchPolicy, Msg, RenderMode};
use blogfilter_engine::{
    atomic_write, ensure_storage_dir, Article, FileStorage, IndexEvent, IndexSource,
    PipelineConfig, PipelineHandle,
};
use filter_logging::{filter_error, filter_info, filter_warn};

use crate::platform::effects::{self, EffectRunner};
use crate::platform::{html, persistence};

#[derive(Debug)]
pub(crate) struct AppOptions {
    /// Holds the tag cache, the persisted filter, and the rendered output.
    pub state_dir: PathBuf,
    /// URL of the page being enhanced; its `tag` query parameter wins over
    /// the persisted filter.
    pub page_url: Option<String>,
    pub output_filename: String,
    pub render_mode: RenderMode,
    pub match_policy: MatchPolicy,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".blogfilter"),
            page_url: None,
            output_filename: "blog.html".to_string(),
            render_mode: RenderMode::default(),
            match_policy: MatchPolicy::default(),
        }
    }
}

pub(crate) fn run(base_url: String, options: AppOptions) -> ExitCode {
    if let Err(err) = ensure_storage_dir(&options.state_dir) {
        filter_error!("State directory {:?} unusable: {}", options.state_dir, err);
        return ExitCode::FAILURE;
    }

    let config = PipelineConfig::for_site(base_url);
    let storage = Arc::new(FileStorage::new(options.state_dir.join("cache")));
    let handle = PipelineHandle::spawn(config.clone(), storage);

    let mut listing_ok = true;
    let outcome = loop {
        let Some(event) = handle.recv() else {
            filter_error!("Index session ended without completing");
            return ExitCode::FAILURE;
        };
        match event {
            IndexEvent::ListingChecked {
                has_listing,
                has_description_anchor,
            } => {
                if !has_listing || !has_description_anchor {
                    filter_warn!(
                        "Listing anchors missing (listing: {has_listing}, \
                         description: {has_description_anchor}); leaving the page untouched"
                    );
                    handle.cancel();
                    listing_ok = false;
                }
            }
            IndexEvent::Discovered { url_count } => {
                filter_info!("Discovered {url_count} article urls");
            }
            IndexEvent::ArticleIndexed { url, indexed } => {
                filter_info!("Indexed {url} ({indexed} so far)");
            }
            IndexEvent::ArticleFailed { url, error } => {
                filter_warn!("Skipping {url}: {error}");
            }
            IndexEvent::Completed { outcome } => break outcome,
        }
    };

    if !listing_ok {
        return ExitCode::SUCCESS;
    }

    if outcome.source == IndexSource::Rebuilt && outcome.index.is_empty() {
        filter_warn!("Rebuild produced no articles; rendering the failure placeholder");
        return write_output(&options, &html::render_placeholder());
    }

    filter_info!(
        "Index ready: {} articles, {} tags ({:?})",
        outcome.index.articles.len(),
        outcome.index.tags.len(),
        outcome.source
    );

    let mut runner = EffectRunner::new(options.state_dir.clone(), options.page_url.as_deref());
    let state = FilterState::new(config.page_size, options.match_policy, options.render_mode);

    let cards = outcome.index.articles.into_iter().map(card_of).collect();
    let (state, fx) = update(state, Msg::IndexReady(cards));
    runner.apply(fx);

    let query_tag = options
        .page_url
        .as_deref()
        .and_then(effects::tag_from_page_url);
    let stored_tag = persistence::load_filter_tag(&options.state_dir);
    let (state, fx) = update(
        state,
        Msg::InitialFilterResolved {
            query_tag,
            stored_tag,
        },
    );
    runner.apply(fx);

    if let Some(location) = runner.location() {
        filter_info!("Page location after init: {location}");
    }

    let page = html::render_page(&state.view(), &config.blog_path);
    write_output(&options, &page)
}

fn card_of(article: Article) -> ArticleCard {
    ArticleCard {
        url: article.url,
        title: article.title,
        date_display: article.date_raw,
        date_ts: article.date_ts,
        image_url: article.image_url,
        description: article.description,
        tags: article.tags,
    }
}

fn write_output(options: &AppOptions, content: &str) -> ExitCode {
    match atomic_write(&options.state_dir, &options.output_filename, content) {
        Ok(path) => {
            filter_info!("Wrote {path:?}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            filter_error!("Failed to write {}: {}", options.output_filename, err);
            ExitCode::FAILURE
        }
    }
}
