//! Herald builds a static news page from a list of RSS/Atom feeds.
//!
//! One run loads the source list, fetches every feed (a failing feed only
//! loses its own entries), merges the entries, drops duplicates by link,
//! orders them newest first and renders a single HTML document.
//!
//! - [`config`]: `herald.toml` settings and the fatal [`config::ConfigError`]
//! - [`feed`]: source list, fetching, parsing and normalization
//! - [`aggregate`]: deduplication, ranking and the pipeline driver
//! - [`render`]: sanitizer, relative times and the page template
//! - [`util`]: URL and text helpers

pub mod aggregate;
pub mod config;
pub mod feed;
pub mod render;
pub mod util;
