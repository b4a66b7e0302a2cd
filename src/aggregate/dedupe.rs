use std::collections::HashSet;

use crate::feed::{Entry, PLACEHOLDER_LINK};

/// Returns the identity used to detect duplicates: the link without its
/// query string.
///
/// `None` means the entry has no usable identity (no link, or a link that
/// is nothing but a query string).
///
/// ```
/// use herald::aggregate::canonical_key;
///
/// assert_eq!(canonical_key("https://a.example/post?utm_source=rss"), Some("https://a.example/post"));
/// assert_eq!(canonical_key("?ref=home"), None);
/// assert_eq!(canonical_key("#"), None);
/// ```
pub fn canonical_key(link: &str) -> Option<&str> {
    let key = link.split_once('?').map_or(link, |(base, _)| base);
    if key.is_empty() || key == PLACEHOLDER_LINK {
        None
    } else {
        Some(key)
    }
}

/// Removes duplicate entries, keeping the first occurrence of each canonical key.
///
/// Entries without a canonical key are dropped wherever they appear. The
/// input order decides which copy survives, so callers should pass entries
/// in source-list order.
pub fn dedupe(entries: Vec<Entry>) -> Vec<Entry> {
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
    let mut kept = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(key) = canonical_key(&entry.link) else {
            tracing::trace!(title = %entry.title, source = %entry.source_name, "Dropping entry without link");
            continue;
        };
        // First occurrence wins
        if seen.insert(key.to_string()) {
            kept.push(entry);
        }
    }

    kept
}
