#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The index pipeline finished; cards arrive sorted by date descending.
    /// Sent before `InitialFilterResolved` so validation sees the tag set.
    IndexReady(Vec<crate::ArticleCard>),
    /// The platform resolved the initial filter from its two sources.
    /// Precedence: query parameter, then stored tag, then All.
    InitialFilterResolved {
        query_tag: Option<String>,
        stored_tag: Option<String>,
    },
    /// User clicked a button in the filter bar.
    FilterClicked(crate::FilterChoice),
    /// User clicked the load-more control (paginated render mode).
    LoadMoreClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}
