use chrono::{DateTime, SecondsFormat, Utc};

use super::Article;

/// Row of the `articles` table: one per article that was delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub pub_date: Option<String>,
    pub category: Option<String>,
}

impl DeliveryRecord {
    pub fn from_article(article: &Article) -> Self {
        Self {
            guid: article.guid.clone(),
            title: article.title.clone(),
            link: article.link.clone(),
            pub_date: article.pub_date.as_deref().and_then(to_iso_timestamp),
            category: article.category.as_ref().and_then(|c| c.to_json().ok()),
        }
    }
}

/// Convert a feed timestamp to `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// RSS uses RFC 2822 but plenty of feeds emit RFC 3339 instead, so both are
/// accepted. Returns `None` for anything else.
pub fn to_iso_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()?;

    Some(
        parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}
