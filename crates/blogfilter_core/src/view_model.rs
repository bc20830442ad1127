use crate::{ArticleCard, FilterChoice, FilterState, RenderMode};

/// Everything a renderer needs for one frame of the filter UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    pub bar: Vec<FilterButton>,
    pub list: ListView,
}

/// One button in the filter bar. Exactly one button is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub choice: FilterChoice,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Every card stays in the list; hidden ones carry `visible: false`.
    Toggle { items: Vec<ToggleItem> },
    /// Only the revealed window of matching cards, plus whether a load-more
    /// control should be shown. The control disappears once everything
    /// matching is revealed.
    Paginated {
        items: Vec<ArticleCard>,
        load_more: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleItem {
    pub card: ArticleCard,
    pub visible: bool,
}

impl FilterState {
    pub fn view(&self) -> FilterView {
        let mut bar = Vec::with_capacity(self.tags().len() + 1);
        bar.push(FilterButton {
            choice: FilterChoice::All,
            active: *self.active() == FilterChoice::All,
        });
        for tag in self.tags() {
            bar.push(FilterButton {
                choice: FilterChoice::Tag(tag.clone()),
                active: *self.active() == FilterChoice::Tag(tag.clone()),
            });
        }

        let list = match self.render_mode() {
            RenderMode::ToggleVisibility => ListView::Toggle {
                items: self
                    .articles()
                    .iter()
                    .map(|card| ToggleItem {
                        card: card.clone(),
                        visible: self.card_matches(card),
                    })
                    .collect(),
            },
            RenderMode::PaginatedRerender => {
                let filtered = self.filtered();
                let load_more = filtered.len() > self.shown();
                ListView::Paginated {
                    items: filtered
                        .into_iter()
                        .take(self.shown())
                        .cloned()
                        .collect(),
                    load_more,
                }
            }
        };

        FilterView { bar, list }
    }
}
