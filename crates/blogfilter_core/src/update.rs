use crate::{Effect, FilterChoice, FilterState, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Applying the same transition twice yields identical state and identical
/// effects, so replaying a click is harmless.
pub fn update(mut state: FilterState, msg: Msg) -> (FilterState, Vec<Effect>) {
    let effects = match msg {
        Msg::IndexReady(cards) => {
            state.set_articles(cards);
            // A rebuilt index may no longer contain the active tag, e.g. the
            // last article carrying it was deleted. Fall back to All and
            // clear the external mirrors. A tag the rebuilt bar carries in a
            // different casing is re-applied in the bar's casing.
            match state.active().clone() {
                FilterChoice::Tag(tag) => match state.canonical_tag(&tag) {
                    Some(canonical) if canonical == tag => Vec::new(),
                    Some(canonical) => apply_choice(&mut state, FilterChoice::Tag(canonical)),
                    None => apply_choice(&mut state, FilterChoice::All),
                },
                FilterChoice::All => Vec::new(),
            }
        }
        Msg::InitialFilterResolved {
            query_tag,
            stored_tag,
        } => {
            let choice = resolve_choice(&state, query_tag, stored_tag);
            apply_choice(&mut state, choice)
        }
        Msg::FilterClicked(choice) => {
            let choice = match choice {
                FilterChoice::Tag(tag) => match state.canonical_tag(&tag) {
                    Some(canonical) => FilterChoice::Tag(canonical),
                    None => FilterChoice::All,
                },
                FilterChoice::All => FilterChoice::All,
            };
            apply_choice(&mut state, choice)
        }
        Msg::LoadMoreClicked => {
            state.reveal_more();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Query parameter wins over the stored tag; tags unknown to the index
/// resolve to All. The resolved tag takes the bar's casing, so one bar
/// button is active even when the URL arrived differently cased.
fn resolve_choice(
    state: &FilterState,
    query_tag: Option<String>,
    stored_tag: Option<String>,
) -> FilterChoice {
    match query_tag.or(stored_tag) {
        Some(tag) => match state.canonical_tag(&tag) {
            Some(canonical) => FilterChoice::Tag(canonical),
            None => FilterChoice::All,
        },
        None => FilterChoice::All,
    }
}

fn apply_choice(state: &mut FilterState, choice: FilterChoice) -> Vec<Effect> {
    let sync = choice.as_sync_value().map(ToOwned::to_owned);
    state.set_active(choice);
    vec![Effect::SetQueryTag(sync.clone()), Effect::StoreTag(sync)]
}
