//! Merging fetched entries into the final page order.
//!
//! ```text
//! load_sources → fetch_all → normalize → dedupe → rank
//! ```
//!
//! [`run`] drives the whole sequence; [`aggregate`] is the pure tail of it
//! (normalize, dedupe, rank) and is what tests exercise directly.

mod dedupe;
mod rank;

pub use dedupe::{canonical_key, dedupe};
pub use rank::rank;

use crate::config::{Config, ConfigError};
use crate::feed::{
    fetch_all, load_sources, normalize, Entry, FeedClient, FetchOptions, Source, SourceFailure,
    SourcedEntry,
};

/// Result of one pipeline pass.
#[derive(Debug)]
pub struct Aggregation {
    /// Every configured source, including the ones that failed
    pub sources: Vec<Source>,
    /// Unique entries, newest first
    pub entries: Vec<Entry>,
    /// Sources that contributed nothing this run
    pub failures: Vec<SourceFailure>,
}

impl Aggregation {
    /// Number of entries that made it into the final list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalizes, deduplicates and ranks fetched entries.
///
/// `fetched` must be in source-list order: deduplication keeps the first
/// copy it sees.
pub fn aggregate(fetched: Vec<SourcedEntry>) -> Vec<Entry> {
    let normalized: Vec<Entry> = fetched
        .into_iter()
        .map(|sourced| normalize(sourced.entry, &sourced.source_name))
        .collect();
    let unique = dedupe(normalized);
    rank(&unique)
}

/// Runs the full pipeline once.
///
/// # Errors
///
/// Fails only when the source list cannot be loaded ([`ConfigError`]).
/// Per-source fetch failures are reported in [`Aggregation::failures`].
pub async fn run<C: FeedClient>(client: &C, config: &Config) -> Result<Aggregation, ConfigError> {
    let sources = load_sources(&config.feeds, config.default_max_items).await?;

    let options = FetchOptions {
        timeout: config.fetch_timeout(),
        concurrency: config.max_concurrent_fetches,
    };
    let report = fetch_all(client, &sources, options).await;
    let fetched = report.entries.len();

    let entries = aggregate(report.entries);

    tracing::info!(
        sources = sources.len(),
        failed = report.failures.len(),
        fetched = fetched,
        kept = entries.len(),
        "Aggregation complete"
    );

    Ok(Aggregation {
        sources,
        entries,
        failures: report.failures,
    })
}
