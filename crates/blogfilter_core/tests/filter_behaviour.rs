use std::sync::Once;

use blogfilter_core::{
    update, ArticleCard, Effect, FilterChoice, FilterState, ListView, MatchPolicy, Msg, RenderMode,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(filter_logging::initialize_for_tests);
}

fn card(url: &str, tags: &[&str]) -> ArticleCard {
    ArticleCard {
        url: url.to_string(),
        title: format!("Article {url}"),
        date_display: String::new(),
        date_ts: 0,
        image_url: String::new(),
        description: String::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn ready_state(render_mode: RenderMode) -> FilterState {
    let state = FilterState::new(12, MatchPolicy::CaseSensitive, render_mode);
    let (state, effects) = update(
        state,
        Msg::IndexReady(vec![
            card("/blog/a", &["go", "rust"]),
            card("/blog/b", &["go"]),
            card("/blog/c", &["news"]),
        ]),
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn index_ready_collects_tags_in_first_seen_order() {
    init_logging();
    let state = ready_state(RenderMode::PaginatedRerender);
    assert_eq!(state.tags(), ["go", "rust", "news"]);
    assert_eq!(*state.active(), FilterChoice::All);
}

#[test]
fn clicking_a_tag_filters_and_mirrors_state() {
    init_logging();
    let state = ready_state(RenderMode::PaginatedRerender);
    let (state, effects) = update(state, Msg::FilterClicked(FilterChoice::Tag("go".into())));

    assert_eq!(
        effects,
        vec![
            Effect::SetQueryTag(Some("go".into())),
            Effect::StoreTag(Some("go".into())),
        ]
    );

    let view = state.view();
    match view.list {
        ListView::Paginated { items, load_more } => {
            assert_eq!(
                items.iter().map(|c| c.url.as_str()).collect::<Vec<_>>(),
                ["/blog/a", "/blog/b"]
            );
            assert!(!load_more);
        }
        other => panic!("unexpected list view: {other:?}"),
    }

    // Exactly one bar button is active.
    let active: Vec<_> = view.bar.iter().filter(|b| b.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].choice, FilterChoice::Tag("go".into()));
}

#[test]
fn clicking_all_restores_everything_and_clears_mirrors() {
    init_logging();
    let state = ready_state(RenderMode::PaginatedRerender);
    let (state, _) = update(state, Msg::FilterClicked(FilterChoice::Tag("go".into())));
    let (state, effects) = update(state, Msg::FilterClicked(FilterChoice::All));

    assert_eq!(
        effects,
        vec![Effect::SetQueryTag(None), Effect::StoreTag(None)]
    );
    match state.view().list {
        ListView::Paginated { items, .. } => assert_eq!(items.len(), 3),
        other => panic!("unexpected list view: {other:?}"),
    }
}

#[test]
fn applying_the_same_filter_twice_is_idempotent() {
    init_logging();
    let state = ready_state(RenderMode::PaginatedRerender);
    let click = Msg::FilterClicked(FilterChoice::Tag("rust".into()));

    let (once, first_effects) = update(state, click.clone());
    let (twice, second_effects) = update(once.clone(), click);

    assert_eq!(once, twice);
    assert_eq!(first_effects, second_effects);
    assert_eq!(once.view(), twice.view());
}

#[test]
fn unknown_tag_click_falls_back_to_all() {
    init_logging();
    let state = ready_state(RenderMode::PaginatedRerender);
    let (state, effects) = update(state, Msg::FilterClicked(FilterChoice::Tag("gone".into())));

    assert_eq!(*state.active(), FilterChoice::All);
    assert_eq!(
        effects,
        vec![Effect::SetQueryTag(None), Effect::StoreTag(None)]
    );
}

#[test]
fn toggle_mode_hides_non_matching_cards_in_place() {
    init_logging();
    let state = ready_state(RenderMode::ToggleVisibility);
    let (state, _) = update(state, Msg::FilterClicked(FilterChoice::Tag("news".into())));

    match state.view().list {
        ListView::Toggle { items } => {
            let visible: Vec<_> = items
                .iter()
                .filter(|item| item.visible)
                .map(|item| item.card.url.as_str())
                .collect();
            assert_eq!(visible, ["/blog/c"]);
            // Hidden cards are still present for an in-place re-show.
            assert_eq!(items.len(), 3);
        }
        other => panic!("unexpected list view: {other:?}"),
    }
}

#[test]
fn tag_matching_is_case_sensitive_by_default() {
    init_logging();
    let state = ready_state(RenderMode::PaginatedRerender);
    let (state, _) = update(state, Msg::FilterClicked(FilterChoice::Tag("Go".into())));
    // "Go" is not a known tag under the byte-for-byte policy.
    assert_eq!(*state.active(), FilterChoice::All);
}

#[test]
fn case_insensitive_click_canonicalizes_to_the_bar_casing() {
    init_logging();
    let state = FilterState::new(12, MatchPolicy::CaseInsensitive, RenderMode::PaginatedRerender);
    let (state, _) = update(
        state,
        Msg::IndexReady(vec![card("/blog/a", &["go"]), card("/blog/b", &["rust"])]),
    );
    let (state, effects) = update(state, Msg::FilterClicked(FilterChoice::Tag("GO".into())));

    // The active choice carries the bar's casing, not the click's.
    assert_eq!(*state.active(), FilterChoice::Tag("go".into()));
    assert_eq!(
        effects,
        vec![
            Effect::SetQueryTag(Some("go".into())),
            Effect::StoreTag(Some("go".into())),
        ]
    );

    let view = state.view();
    let active: Vec<_> = view.bar.iter().filter(|b| b.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].choice, FilterChoice::Tag("go".into()));
    match view.list {
        ListView::Paginated { items, .. } => assert_eq!(items.len(), 1),
        other => panic!("unexpected list view: {other:?}"),
    }
}

#[test]
fn rebuild_without_active_tag_resets_to_all() {
    init_logging();
    let state = ready_state(RenderMode::PaginatedRerender);
    let (state, _) = update(state, Msg::FilterClicked(FilterChoice::Tag("news".into())));

    let (state, effects) = update(
        state,
        Msg::IndexReady(vec![card("/blog/a", &["go"]), card("/blog/b", &["go"])]),
    );

    assert_eq!(*state.active(), FilterChoice::All);
    assert_eq!(
        effects,
        vec![Effect::SetQueryTag(None), Effect::StoreTag(None)]
    );
}
