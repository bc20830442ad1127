//! Blogfilter core: pure tag-filter state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{ArticleCard, FilterChoice, FilterState, MatchPolicy, RenderMode};
pub use update::update;
pub use view_model::{FilterButton, FilterView, ListView, ToggleItem};
