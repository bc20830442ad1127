use std::sync::Arc;

use chrono::{DateTime, NaiveDate};

use crate::{Article, MarkupAdapter};

/// Builds [`Article`]s from fetched pages via the injected markup adapter.
pub struct ArticleExtractor {
    adapter: Arc<dyn MarkupAdapter>,
    description_budget: usize,
}

impl ArticleExtractor {
    pub fn new(adapter: Arc<dyn MarkupAdapter>, description_budget: usize) -> Self {
        Self {
            adapter,
            description_budget,
        }
    }

    pub fn extract(&self, url: &str, html: &str) -> Article {
        let markup = self.adapter.article(html);
        Article {
            url: url.to_string(),
            title: markup.title,
            date_ts: parse_date_ts(&markup.date_raw),
            date_raw: markup.date_raw,
            image_url: markup.image_url,
            description: truncate_text(&markup.description, self.description_budget),
            tags: markup.tags,
        }
    }
}

/// Parses a scraped date string to epoch milliseconds.
///
/// ISO-8601 first (full timestamp, then bare date), then the locale pattern
/// `D.M.YYYY` anywhere in the text. Anything else resolves to zero, which
/// sorts the article last.
pub fn parse_date_ts(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.timestamp_millis();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return midnight_millis(date);
    }
    if let Some(date) = find_dmy(raw) {
        return midnight_millis(date);
    }
    0
}

fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Finds a `D.M.YYYY` token in free-form display text, e.g. "Pridané 1.2.2024".
fn find_dmy(raw: &str) -> Option<NaiveDate> {
    for fragment in raw.split(|c: char| !c.is_ascii_digit() && c != '.') {
        let parts: Vec<&str> = fragment.split('.').filter(|p| !p.is_empty()).collect();
        if parts.len() < 3 || parts[0].len() > 2 || parts[1].len() > 2 || parts[2].len() != 4 {
            continue;
        }
        if let (Ok(day), Ok(month), Ok(year)) = (
            parts[0].parse::<u32>(),
            parts[1].parse::<u32>(),
            parts[2].parse::<i32>(),
        ) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }
    None
}

/// Truncates to `budget` characters, replacing the tail with an ellipsis
/// when cut. Operates on chars, so multi-byte text is never split.
pub fn truncate_text(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(budget.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
