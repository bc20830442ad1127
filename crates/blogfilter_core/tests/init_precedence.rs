use std::sync::Once;

use blogfilter_core::{
    update, ArticleCard, Effect, FilterChoice, FilterState, MatchPolicy, Msg, RenderMode,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(filter_logging::initialize_for_tests);
}

fn ready_state() -> FilterState {
    let state = FilterState::new(
        12,
        MatchPolicy::CaseSensitive,
        RenderMode::PaginatedRerender,
    );
    let cards = vec![
        ArticleCard {
            url: "/blog/a".into(),
            title: "a".into(),
            date_display: String::new(),
            date_ts: 0,
            image_url: String::new(),
            description: String::new(),
            tags: vec!["go".into(), "rust".into()],
        },
        ArticleCard {
            url: "/blog/b".into(),
            title: "b".into(),
            date_display: String::new(),
            date_ts: 0,
            image_url: String::new(),
            description: String::new(),
            tags: vec!["news".into()],
        },
    ];
    let (state, _) = update(state, Msg::IndexReady(cards));
    state
}

fn resolve(query: Option<&str>, stored: Option<&str>) -> (FilterState, Vec<Effect>) {
    update(
        ready_state(),
        Msg::InitialFilterResolved {
            query_tag: query.map(Into::into),
            stored_tag: stored.map(Into::into),
        },
    )
}

#[test]
fn query_parameter_wins_over_stored_tag() {
    init_logging();
    let (state, effects) = resolve(Some("rust"), Some("news"));
    assert_eq!(*state.active(), FilterChoice::Tag("rust".into()));
    assert_eq!(
        effects,
        vec![
            Effect::SetQueryTag(Some("rust".into())),
            Effect::StoreTag(Some("rust".into())),
        ]
    );
}

#[test]
fn stored_tag_applies_when_query_is_absent() {
    init_logging();
    let (state, _) = resolve(None, Some("news"));
    assert_eq!(*state.active(), FilterChoice::Tag("news".into()));
}

#[test]
fn absent_sources_default_to_all() {
    init_logging();
    let (state, effects) = resolve(None, None);
    assert_eq!(*state.active(), FilterChoice::All);
    assert_eq!(
        effects,
        vec![Effect::SetQueryTag(None), Effect::StoreTag(None)]
    );
}

#[test]
fn unknown_resolved_tag_falls_back_to_all() {
    init_logging();
    // The stored tag may have been indexed by an older cache generation.
    let (state, effects) = resolve(Some("deleted-tag"), None);
    assert_eq!(*state.active(), FilterChoice::All);
    assert_eq!(
        effects,
        vec![Effect::SetQueryTag(None), Effect::StoreTag(None)]
    );
}

#[test]
fn differently_cased_query_tag_activates_one_bar_button() {
    init_logging();
    let state = FilterState::new(12, MatchPolicy::CaseInsensitive, RenderMode::PaginatedRerender);
    let cards = vec![ArticleCard {
        url: "/blog/a".into(),
        title: "a".into(),
        date_display: String::new(),
        date_ts: 0,
        image_url: String::new(),
        description: String::new(),
        tags: vec!["go".into()],
    }];
    let (state, _) = update(state, Msg::IndexReady(cards));

    let (state, effects) = update(
        state,
        Msg::InitialFilterResolved {
            query_tag: Some("GO".into()),
            stored_tag: None,
        },
    );

    assert_eq!(*state.active(), FilterChoice::Tag("go".into()));
    assert_eq!(
        effects,
        vec![
            Effect::SetQueryTag(Some("go".into())),
            Effect::StoreTag(Some("go".into())),
        ]
    );
    let active = state.view().bar.iter().filter(|b| b.active).count();
    assert_eq!(active, 1);
}

#[test]
fn resolution_is_idempotent() {
    init_logging();
    let msg = Msg::InitialFilterResolved {
        query_tag: Some("go".into()),
        stored_tag: None,
    };
    let (state, first) = update(ready_state(), msg.clone());
    let (state2, second) = update(state.clone(), msg);
    assert_eq!(state, state2);
    assert_eq!(first, second);
}
