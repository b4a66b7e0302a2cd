//! Feed sources, fetching and normalization.
//!
//! This module covers everything between the source list on disk and a
//! flat list of uniform entries:
//!
//! - [`sources`] - Loads the JSON source list (`feeds.json`)
//! - [`parser`] - Turns RSS/Atom/JSON Feed bytes into raw entries using `feed-rs`
//! - [`fetcher`] - Fetches every source concurrently, isolating per-source failures
//! - [`normalize`] - Fills defaults and picks description/timestamp fields
//!
//! # Example
//!
//! ```ignore
//! use herald::feed::{fetch_all, load_sources, normalize, FetchOptions, HttpFeedClient};
//!
//! let sources = load_sources(Path::new("feeds.json"), 10).await?;
//! let client = HttpFeedClient::new("herald/0.1")?;
//! let report = fetch_all(&client, &sources, FetchOptions::default()).await;
//! let entries: Vec<_> = report
//!     .entries
//!     .into_iter()
//!     .map(|e| normalize(e.entry, &e.source_name))
//!     .collect();
//! ```

mod fetcher;
mod normalize;
mod parser;
mod sources;

pub use fetcher::{
    fetch_all, FeedClient, FetchError, FetchOptions, FetchReport, HttpFeedClient, SourceFailure,
    SourcedEntry,
};
pub use normalize::{normalize, Entry, PLACEHOLDER_LINK, UNTITLED};
pub use parser::{parse_feed, RawEntry};
pub use sources::{load_sources, Source};
