/// One article as the filter bar sees it: summary fields plus its tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub url: String,
    pub title: String,
    /// Human-readable date string as scraped, shown verbatim in the list.
    pub date_display: String,
    /// Epoch milliseconds; zero when the source date was unparseable.
    pub date_ts: i64,
    pub image_url: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// The active filter selection. Exactly one choice is active at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterChoice {
    #[default]
    All,
    Tag(String),
}

impl FilterChoice {
    /// The value mirrored into the `tag` query parameter and storage.
    /// `None` means the parameter/key is removed.
    pub fn as_sync_value(&self) -> Option<&str> {
        match self {
            FilterChoice::All => None,
            FilterChoice::Tag(tag) => Some(tag),
        }
    }
}

/// How tag labels are compared when filtering and validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Tags compare byte-for-byte.
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl MatchPolicy {
    pub fn matches(&self, a: &str, b: &str) -> bool {
        match self {
            MatchPolicy::CaseSensitive => a == b,
            MatchPolicy::CaseInsensitive => a.to_lowercase() == b.to_lowercase(),
        }
    }
}

/// How the article list is presented for a given filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Keep every card in the list and mark non-matching ones hidden.
    ToggleVisibility,
    /// Re-render only the first `shown` matching cards with a load-more
    /// control revealing `page_size` more at a time.
    #[default]
    PaginatedRerender,
}

/// Pure filter state. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    articles: Vec<ArticleCard>,
    tags: Vec<String>,
    active: FilterChoice,
    shown: usize,
    page_size: usize,
    match_policy: MatchPolicy,
    render_mode: RenderMode,
    index_ready: bool,
}

impl FilterState {
    pub fn new(page_size: usize, match_policy: MatchPolicy, render_mode: RenderMode) -> Self {
        Self {
            articles: Vec::new(),
            tags: Vec::new(),
            active: FilterChoice::All,
            shown: page_size,
            page_size,
            match_policy,
            render_mode,
            index_ready: false,
        }
    }

    pub fn active(&self) -> &FilterChoice {
        &self.active
    }

    /// Known tags in first-seen order across the (date-sorted) article list.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn articles(&self) -> &[ArticleCard] {
        &self.articles
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    pub fn index_ready(&self) -> bool {
        self.index_ready
    }

    pub(crate) fn shown(&self) -> usize {
        self.shown
    }

    pub(crate) fn set_articles(&mut self, articles: Vec<ArticleCard>) {
        self.tags = first_seen_tags(&articles, self.match_policy);
        self.articles = articles;
        self.index_ready = true;
    }

    pub(crate) fn set_active(&mut self, choice: FilterChoice) {
        self.active = choice;
        self.shown = self.page_size;
    }

    pub(crate) fn reveal_more(&mut self) {
        self.shown = self.shown.saturating_add(self.page_size);
    }

    /// The bar's casing of a tag, when the index knows it. Keeping the
    /// active choice in the bar's casing is what makes exact equality
    /// against bar buttons valid under either match policy.
    pub(crate) fn canonical_tag(&self, tag: &str) -> Option<String> {
        self.tags
            .iter()
            .find(|known| self.match_policy.matches(known, tag))
            .cloned()
    }

    pub(crate) fn card_matches(&self, card: &ArticleCard) -> bool {
        match &self.active {
            FilterChoice::All => true,
            FilterChoice::Tag(tag) => {
                card.tags.iter().any(|t| self.match_policy.matches(t, tag))
            }
        }
    }

    /// The matching subset under the active choice, in list order.
    pub(crate) fn filtered(&self) -> Vec<&ArticleCard> {
        self.articles
            .iter()
            .filter(|card| self.card_matches(card))
            .collect()
    }
}

fn first_seen_tags(articles: &[ArticleCard], policy: MatchPolicy) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for card in articles {
        for tag in &card.tags {
            if !tags.iter().any(|known| policy.matches(known, tag)) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}
