//! Renders the filter bar and article list in the storefront's own markup,
//! so the output drops into the page the theme styles already target.

use blogfilter_core::{ArticleCard, FilterChoice, FilterView, ListView};

const ALL_LABEL: &str = "Všetko";
const LOAD_MORE_LABEL: &str = "Načítať viac";
const READ_MORE_LABEL: &str = "Celý článok";
const LOAD_ERROR_TEXT: &str = "Články sa nepodarilo načítať.";

/// The whole enhanced fragment: filter bar, article list, and the load-more
/// control when the view calls for one.
pub(crate) fn render_page(view: &FilterView, blog_path: &str) -> String {
    let mut out = String::new();
    out.push_str(&render_filter_bar(view));
    match &view.list {
        ListView::Toggle { items } => {
            out.push_str("<div class=\"news-wrapper\">");
            for item in items {
                out.push_str(&render_item(&item.card, blog_path, !item.visible));
            }
            out.push_str("</div>");
        }
        ListView::Paginated { items, load_more } => {
            out.push_str("<div class=\"news-wrapper\">");
            for card in items {
                out.push_str(&render_item(card, blog_path, false));
            }
            out.push_str("</div>");
            if *load_more {
                out.push_str(&format!(
                    "<div class=\"clientLoadMore\"><button class=\"btn btn-secondary\">{LOAD_MORE_LABEL}</button></div>"
                ));
            }
        }
    }
    out
}

/// The generic failure placeholder shown when a full rebuild found nothing.
pub(crate) fn render_placeholder() -> String {
    format!("<div class=\"news-wrapper\"><p class=\"loadError\">{LOAD_ERROR_TEXT}</p></div>")
}

fn render_filter_bar(view: &FilterView) -> String {
    let mut out = String::from("<div class=\"blog-filters\">");
    for button in &view.bar {
        let (value, label) = match &button.choice {
            FilterChoice::All => ("all".to_string(), ALL_LABEL.to_string()),
            FilterChoice::Tag(tag) => (tag.clone(), tag.clone()),
        };
        let class = if button.active { " class=\"active\"" } else { "" };
        out.push_str(&format!(
            "<button data-filter=\"{}\"{class}>{}</button>",
            escape(&value),
            escape(&label)
        ));
    }
    out.push_str("</div>");
    out
}

fn render_item(card: &ArticleCard, blog_path: &str, hidden: bool) -> String {
    let url = escape(&card.url);
    let title = escape(&card.title);
    let style = if hidden { " style=\"display:none\"" } else { "" };

    let tags = if card.tags.is_empty() {
        String::new()
    } else {
        let anchors: String = card
            .tags
            .iter()
            .map(|tag| {
                format!(
                    "<a href=\"{}?tag={}\" class=\"tag\" data-tag=\"{}\">#{}</a>",
                    escape(blog_path),
                    escape(tag),
                    escape(tag),
                    escape(tag)
                )
            })
            .collect();
        format!("<div class=\"article-tags\">{anchors}</div>")
    };

    format!(
        "<div class=\"news-item\"{style}>\
         <div class=\"image\"><a href=\"{url}\" title=\"{title}\"><img src=\"{}\" alt=\"{title}\"></a></div>\
         <div class=\"text\">\
         <time>{}</time>\
         <a href=\"{url}\" class=\"title\">{title}</a>\
         <div class=\"description\"><p>{}</p></div>\
         {tags}\
         </div>\
         <a href=\"{url}\" class=\"cely-clanek\">{READ_MORE_LABEL}</a>\
         </div>",
        escape(&card.image_url),
        escape(&card.date_display),
        escape(&card.description),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
