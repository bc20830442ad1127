use std::path::PathBuf;

use blogfilter_core::Effect;
use filter_logging::{filter_info, filter_warn};
use url::Url;

use super::persistence;

/// Applies core effects to the platform: the page location's `tag` query
/// parameter and the persisted filter state. The location update is the
/// non-navigating `history.replaceState` analog; nothing is fetched.
pub(crate) struct EffectRunner {
    state_dir: PathBuf,
    location: Option<Url>,
}

impl EffectRunner {
    pub(crate) fn new(state_dir: PathBuf, page_url: Option<&str>) -> Self {
        let location = page_url.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(err) => {
                filter_warn!("Ignoring unparseable page url {raw}: {err}");
                None
            }
        });
        Self {
            state_dir,
            location,
        }
    }

    pub(crate) fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetQueryTag(tag) => {
                    if let Some(location) = &mut self.location {
                        set_tag_param(location, tag.as_deref());
                        filter_info!("Page location is now {}", location);
                    }
                }
                Effect::StoreTag(tag) => {
                    persistence::save_filter_tag(&self.state_dir, tag.as_deref());
                }
            }
        }
    }

    pub(crate) fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }
}

/// Replaces the `tag` query parameter, preserving every other pair. `None`
/// removes the parameter, which is how All reads from a URL.
fn set_tag_param(url: &mut Url, tag: Option<&str>) {
    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "tag")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if remaining.is_empty() && tag.is_none() {
        url.set_query(None);
        return;
    }

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (name, value) in &remaining {
        pairs.append_pair(name, value);
    }
    if let Some(tag) = tag {
        pairs.append_pair("tag", tag);
    }
    drop(pairs);
}

/// Reads the active tag out of a page URL; absent means All.
pub(crate) fn tag_from_page_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "tag")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
