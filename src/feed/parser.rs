use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::parser;

use crate::util::html_to_text;

/// One entry as it comes out of a feed, before normalization.
///
/// Every field is optional: RSS, Atom and JSON Feed disagree on what an
/// item must carry, and real feeds omit even the mandatory parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Plain-text rendition of the entry body, markup already removed.
    pub content_snippet: Option<String>,
    /// Entry body as published, usually HTML.
    pub content: Option<String>,
    /// Publication time the parser managed to read.
    pub published: Option<DateTime<Utc>>,
    /// Publication date string kept verbatim when the parser could not read it.
    pub published_raw: Option<String>,
}

/// Parses an RSS/Atom/JSON Feed document into raw entries, in document order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let published = entry.published.or(entry.updated);
            let summary = entry.summary.map(|s| s.content);
            let body = entry.content.and_then(|c| c.body);

            let content_snippet = summary
                .as_deref()
                .or(body.as_deref())
                .map(html_to_text)
                .filter(|s| !s.is_empty());
            let content = body.or(summary);

            RawEntry {
                title: entry.title.map(|t| t.content),
                link,
                content_snippet,
                content,
                published,
                published_raw: None,
            }
        })
        .collect();

    Ok(entries)
}
