use scraper::{ElementRef, Html, Selector};

/// Raw fields pulled from one article detail page. Missing markup yields
/// empty fields, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleMarkup {
    pub title: String,
    pub date_raw: String,
    pub image_url: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// What a listing page offers: the anchors the enhancement hangs off,
/// pagination info, and the article entries on this page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingMarkup {
    pub has_listing: bool,
    pub has_description_anchor: bool,
    /// Highest page number encoded in the pagination control's links.
    pub last_page: Option<u32>,
    pub article_urls: Vec<String>,
}

/// The page-specific scraping surface. All CSS-selector coupling to the host
/// platform's generated HTML lives behind this trait, so a markup change
/// means swapping or reconfiguring the adapter, not touching the pipeline.
pub trait MarkupAdapter: Send + Sync {
    fn article(&self, html: &str) -> ArticleMarkup;
    fn listing(&self, html: &str) -> ListingMarkup;
}

/// Adapter for the hosted storefront's blog markup.
pub struct StorefrontMarkup {
    title_sel: Option<Selector>,
    time_sel: Option<Selector>,
    time_fallback_sel: Option<Selector>,
    og_image_sel: Option<Selector>,
    body_image_sel: Option<Selector>,
    paragraph_sel: Option<Selector>,
    tag_sel: Option<Selector>,
    listing_sel: Option<Selector>,
    description_sel: Option<Selector>,
    item_sel: Option<Selector>,
    item_title_link_sel: Option<Selector>,
    item_any_link_sel: Option<Selector>,
    pagination_link_sel: Option<Selector>,
    page_segment: String,
}

impl StorefrontMarkup {
    pub fn new(page_segment: impl Into<String>) -> Self {
        Self {
            title_sel: sel("h1"),
            time_sel: sel("time[datetime]"),
            time_fallback_sel: sel(".text time"),
            og_image_sel: sel(r#"meta[property="og:image"]"#),
            body_image_sel: sel(".article-detail img, .content-inner img"),
            paragraph_sel: sel(".article-detail p, article p, .content-inner p"),
            tag_sel: sel(".article-tags a[data-tag]"),
            listing_sel: sel("#newsWrapper .news-wrapper, .news-wrapper, #newsWrapper"),
            description_sel: sel(".sectionDescription"),
            item_sel: sel(".news-item"),
            item_title_link_sel: sel("a.title"),
            item_any_link_sel: sel("a[href]"),
            pagination_link_sel: sel(".listingControls a[href]"),
            page_segment: page_segment.into(),
        }
    }
}

impl Default for StorefrontMarkup {
    fn default() -> Self {
        Self::new("strana-")
    }
}

impl MarkupAdapter for StorefrontMarkup {
    fn article(&self, html: &str) -> ArticleMarkup {
        let doc = Html::parse_document(html);

        let title = first_text(&doc, &self.title_sel).unwrap_or_default();

        // Machine-readable attribute first, display text as fallback.
        let date_raw = first_element(&doc, &self.time_sel)
            .and_then(|el| el.attr("datetime").map(str::trim).map(String::from))
            .or_else(|| first_text(&doc, &self.time_fallback_sel))
            .unwrap_or_default();

        let image_url = first_element(&doc, &self.og_image_sel)
            .and_then(|el| el.attr("content"))
            .or_else(|| first_element(&doc, &self.body_image_sel).and_then(|el| el.attr("src")))
            .map(|src| src.trim().to_string())
            .unwrap_or_default();

        let description = first_text(&doc, &self.paragraph_sel).unwrap_or_default();

        let mut tags: Vec<String> = Vec::new();
        if let Some(tag_sel) = &self.tag_sel {
            for anchor in doc.select(tag_sel) {
                let tag = anchor.attr("data-tag").unwrap_or_default().trim();
                if tag.is_empty() || tags.iter().any(|known| known == tag) {
                    continue;
                }
                tags.push(tag.to_string());
            }
        }

        ArticleMarkup {
            title,
            date_raw,
            image_url,
            description,
            tags,
        }
    }

    fn listing(&self, html: &str) -> ListingMarkup {
        let doc = Html::parse_document(html);

        let has_listing = self
            .listing_sel
            .as_ref()
            .is_some_and(|s| doc.select(s).next().is_some());
        let has_description_anchor = self
            .description_sel
            .as_ref()
            .is_some_and(|s| doc.select(s).next().is_some());

        let mut last_page = None;
        if let Some(pagination_sel) = &self.pagination_link_sel {
            for link in doc.select(pagination_sel) {
                if let Some(page) = link
                    .attr("href")
                    .and_then(|href| page_number(href, &self.page_segment))
                {
                    last_page = Some(last_page.map_or(page, |max: u32| max.max(page)));
                }
            }
        }

        let mut article_urls = Vec::new();
        if let Some(item_sel) = &self.item_sel {
            for item in doc.select(item_sel) {
                let href = first_in(&item, &self.item_title_link_sel)
                    .or_else(|| first_in(&item, &self.item_any_link_sel))
                    .and_then(|el| el.attr("href"))
                    .map(str::trim);
                match href {
                    Some(href) if !href.is_empty() => {
                        if !article_urls.iter().any(|known| known == href) {
                            article_urls.push(href.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        ListingMarkup {
            has_listing,
            has_description_anchor,
            last_page,
            article_urls,
        }
    }
}

fn sel(source: &str) -> Option<Selector> {
    Selector::parse(source).ok()
}

fn first_element<'a>(doc: &'a Html, selector: &Option<Selector>) -> Option<ElementRef<'a>> {
    selector.as_ref().and_then(|s| doc.select(s).next())
}

fn first_in<'a>(scope: &ElementRef<'a>, selector: &Option<Selector>) -> Option<ElementRef<'a>> {
    selector.as_ref().and_then(|s| scope.select(s).next())
}

fn first_text(doc: &Html, selector: &Option<Selector>) -> Option<String> {
    first_element(doc, selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Parses the page number out of a pagination link, e.g. `/blog/strana-7/`.
fn page_number(href: &str, segment: &str) -> Option<u32> {
    let start = href.find(segment)? + segment.len();
    let digits: String = href[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
