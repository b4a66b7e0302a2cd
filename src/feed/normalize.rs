use chrono::{DateTime, Utc};

use crate::feed::parser::RawEntry;
use crate::util::{collapse_whitespace, strip_control_chars};

/// Title used when an entry has none.
pub const UNTITLED: &str = "(untitled)";

/// Link used when an entry has none. Such entries carry no identity and
/// are dropped by deduplication.
pub const PLACEHOLDER_LINK: &str = "#";

/// An entry in the uniform shape the rest of the pipeline works with.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    /// Description as published; untrusted, sanitize before rendering.
    pub description_html: String,
    pub published: Option<DateTime<Utc>>,
    pub source_name: String,
}

impl Entry {
    /// Publication time used for ordering; entries without one sort as the Unix epoch.
    pub fn effective_published(&self) -> DateTime<Utc> {
        self.published.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Maps a raw feed entry to an [`Entry`], filling defaults for anything missing.
///
/// - title: trimmed feed title, else `"(untitled)"`
/// - link: trimmed feed link, else `"#"`
/// - description: plain-text snippet, else content body, else `""`
/// - published: parsed timestamp, else the raw date string read as
///   RFC 2822 or RFC 3339, else `None`
///
/// Empty strings count as missing.
pub fn normalize(raw: RawEntry, source_name: &str) -> Entry {
    let title = raw
        .title
        .map(|t| collapse_whitespace(&strip_control_chars(&t)))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let link = raw
        .link
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_LINK.to_string());

    let description_html = raw
        .content_snippet
        .filter(|s| !s.is_empty())
        .or_else(|| raw.content.filter(|c| !c.is_empty()))
        .unwrap_or_default();

    let published = raw
        .published
        .or_else(|| raw.published_raw.as_deref().and_then(parse_date));

    Entry {
        title,
        link,
        description_html,
        published,
        source_name: source_name.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_all_missing_uses_defaults() {
        let entry = normalize(RawEntry::default(), "Source");
        assert_eq!(
            entry,
            Entry {
                title: "(untitled)".into(),
                link: "#".into(),
                description_html: String::new(),
                published: None,
                source_name: "Source".into(),
            }
        );
        assert_eq!(entry.effective_published().timestamp(), 0);
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let raw = RawEntry {
            title: Some("  \n ".into()),
            link: Some("".into()),
            content_snippet: Some("".into()),
            content: Some("<p>body</p>".into()),
            ..RawEntry::default()
        };
        let entry = normalize(raw, "S");
        assert_eq!(entry.title, UNTITLED);
        assert_eq!(entry.link, PLACEHOLDER_LINK);
        assert_eq!(entry.description_html, "<p>body</p>");
    }

    #[test]
    fn test_snippet_preferred_over_content() {
        let raw = RawEntry {
            content_snippet: Some("snippet".into()),
            content: Some("<p>content</p>".into()),
            ..RawEntry::default()
        };
        assert_eq!(normalize(raw, "S").description_html, "snippet");
    }

    #[test]
    fn test_title_whitespace_and_controls_cleaned() {
        let raw = RawEntry {
            title: Some("\n  Breaking:\x07 news \t".into()),
            link: Some(" https://example.com/a ".into()),
            ..RawEntry::default()
        };
        let entry = normalize(raw, "S");
        assert_eq!(entry.title, "Breaking: news");
        assert_eq!(entry.link, "https://example.com/a");
    }

    #[test]
    fn test_structured_timestamp_preferred() {
        let parsed = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let raw = RawEntry {
            published: Some(parsed),
            published_raw: Some("Mon, 01 Jan 2024 00:00:00 GMT".into()),
            ..RawEntry::default()
        };
        assert_eq!(normalize(raw, "S").published, Some(parsed));
    }

    #[test]
    fn test_raw_date_fallbacks() {
        let rfc2822 = RawEntry {
            published_raw: Some("Tue, 10 Jun 2025 04:00:00 +0200".into()),
            ..RawEntry::default()
        };
        assert_eq!(
            normalize(rfc2822, "S").published,
            Some(Utc.with_ymd_and_hms(2025, 6, 10, 2, 0, 0).unwrap())
        );

        let rfc3339 = RawEntry {
            published_raw: Some(" 2025-06-10T04:00:00Z ".into()),
            ..RawEntry::default()
        };
        assert_eq!(
            normalize(rfc3339, "S").published,
            Some(Utc.with_ymd_and_hms(2025, 6, 10, 4, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unparseable_raw_date_is_absent() {
        let raw = RawEntry {
            published_raw: Some("last Tuesday".into()),
            ..RawEntry::default()
        };
        assert_eq!(normalize(raw, "S").published, None);
    }
}
