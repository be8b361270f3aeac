use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use url::Url;

use crate::domain::{Article, Category};
use crate::errors::{RelayError, RelayResult};
use crate::sources::traits::FeedSource;

/// Entities XML itself understands; everything else is an HTML-ism
const XML_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "apos"];

pub struct RssSource {
    client: Client,
    feed_url: Url,
}

impl RssSource {
    pub fn new(feed_url: Url) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent(concat!("feed-relay/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
            feed_url,
        }
    }

    async fn fetch_bytes(&self) -> RelayResult<Vec<u8>> {
        tracing::debug!("Fetching RSS feed from: {}", self.feed_url);

        let response = self.client.get(self.feed_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::HttpStatus(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Parse raw feed bytes into articles, keeping document order
    pub fn parse_articles(bytes: &[u8]) -> RelayResult<Vec<Article>> {
        let body = String::from_utf8_lossy(bytes);
        let body = normalize_html_entities(&body);

        let parsed = parser::parse(body.as_bytes())
            .map_err(|e| RelayError::FeedParse(e.to_string()))?;

        let articles = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry.title.map(|t| t.content).unwrap_or_default();

                let link = entry
                    .links
                    .into_iter()
                    .next()
                    .map(|l| l.href)
                    .unwrap_or_default();

                let pub_date = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.to_rfc2822());

                let terms = entry.categories.into_iter().map(|c| c.term).collect();

                Article::new(entry.id, title, link)
                    .with_pub_date(pub_date)
                    .with_category(Category::from_terms(terms))
                    .with_description(entry.summary.map(|s| s.content))
            })
            .collect();

        Ok(articles)
    }
}

#[async_trait]
impl FeedSource for RssSource {
    async fn fetch_articles(&self) -> RelayResult<Vec<Article>> {
        let bytes = self.fetch_bytes().await?;
        let articles = Self::parse_articles(&bytes)?;

        tracing::debug!("Parsed {} items from RSS feed", articles.len());
        Ok(articles)
    }
}

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Make HTML entity encoding palatable to a strict XML parser.
///
/// In markup, HTML named entities (`&nbsp;`, `&eacute;`, ...) become numeric
/// character references; XML's own entities, numeric references and unknown
/// names are left untouched. Inside CDATA, where references are not expanded,
/// every known entity is decoded straight to its characters.
pub fn normalize_html_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(CDATA_OPEN) {
        rewrite_entities(&rest[..start], &mut out, false);
        let section = &rest[start + CDATA_OPEN.len()..];

        match section.find(CDATA_CLOSE) {
            Some(close) => {
                out.push_str(CDATA_OPEN);
                rewrite_entities(&section[..close], &mut out, true);
                out.push_str(CDATA_CLOSE);
                rest = &section[close + CDATA_CLOSE.len()..];
            }
            None => {
                // Unterminated, leave it for the parser to reject
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    rewrite_entities(rest, &mut out, false);
    out
}

fn rewrite_entities(text: &str, out: &mut String, in_cdata: bool) {
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        if let Some((entity, name)) = entity_at(candidate) {
            let keep = !in_cdata && (name.starts_with('#') || XML_ENTITIES.contains(&name));
            if !keep {
                if let Ok(decoded) = htmlescape::decode_html(entity) {
                    if in_cdata {
                        out.push_str(&decoded);
                    } else {
                        for c in decoded.chars() {
                            out.push_str(&format!("&#{};", c as u32));
                        }
                    }
                    rest = &candidate[entity.len()..];
                    continue;
                }
            }
        }

        out.push('&');
        rest = &candidate[1..];
    }

    out.push_str(rest);
}

/// `&name;`, `&#160;` or `&#xA0;` at the start of `s`, with the name part
fn entity_at(s: &str) -> Option<(&str, &str)> {
    let body = &s[1..];
    let name_len = body
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_alphanumeric() || (i == 0 && c == '#')))
        .map(|(i, _)| i)
        .unwrap_or(body.len());

    if name_len == 0 || !body[name_len..].starts_with(';') {
        return None;
    }
    Some((&s[..name_len + 2], &body[..name_len]))
}
