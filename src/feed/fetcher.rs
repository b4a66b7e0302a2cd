use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::feed::parser::{parse_feed, RawEntry};
use crate::feed::sources::Source;
use crate::util::{validate_url, UrlValidationError};

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching a single source.
///
/// A `FetchError` never escapes [`fetch_all`]: it is logged, recorded in
/// the [`FetchReport`], and the source contributes no entries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source address is not an http(s) URL
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Fetch exceeded the per-source timeout
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// Feed document could not be parsed as RSS, Atom or JSON Feed
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Turns a feed address into its entries.
///
/// The fetch isolator owns the timeout; implementations only need to do
/// the work and report failure through [`FetchError`].
pub trait FeedClient {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<RawEntry>, FetchError>> + Send;
}

/// [`FeedClient`] backed by reqwest and feed-rs.
///
/// One attempt per call: no retries, no conditional requests.
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    client: reqwest::Client,
}

impl HttpFeedClient {
    /// Builds a client that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

impl FeedClient for HttpFeedClient {
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FetchError> {
        let url = validate_url(url)?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
        parse_feed(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

/// Settings for one [`fetch_all`] pass.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Upper bound on a single source's fetch, including body and parse
    pub timeout: Duration,
    /// Number of sources in flight at once (0 is treated as 1)
    pub concurrency: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            concurrency: 8,
        }
    }
}

/// A raw entry together with the name of the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedEntry {
    pub source_name: String,
    pub entry: RawEntry,
}

/// A source whose fetch failed.
#[derive(Debug)]
pub struct SourceFailure {
    pub url: String,
    pub name: String,
    pub error: FetchError,
}

/// Outcome of fetching every source.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Entries of all successful sources, in source-list order then feed order
    pub entries: Vec<SourcedEntry>,
    /// Sources that contributed nothing because their fetch failed
    pub failures: Vec<SourceFailure>,
}

/// Fetches every source, isolating failures per source.
///
/// Sources are fetched concurrently, at most `options.concurrency` at a time,
/// each bounded by `options.timeout`. A successful source contributes its
/// first `max_items` entries. A failed source is logged, recorded in
/// [`FetchReport::failures`] and contributes nothing; it never aborts the
/// other fetches.
///
/// Results are joined in source-list order regardless of completion order,
/// so the flattened entry sequence is deterministic.
pub async fn fetch_all<C: FeedClient>(
    client: &C,
    sources: &[Source],
    options: FetchOptions,
) -> FetchReport {
    let outcomes: Vec<(&Source, Result<Vec<RawEntry>, FetchError>)> = stream::iter(sources)
        .map(|source| async move {
            let result = match tokio::time::timeout(options.timeout, client.fetch(&source.url)).await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(options.timeout)),
            };
            (source, result)
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let mut report = FetchReport::default();
    for (source, result) in outcomes {
        match result {
            Ok(entries) => {
                let total = entries.len();
                report.entries.extend(
                    entries
                        .into_iter()
                        .take(source.max_items)
                        .map(|entry| SourcedEntry {
                            source_name: source.name.clone(),
                            entry,
                        }),
                );
                tracing::debug!(
                    url = %source.url,
                    total = total,
                    kept = total.min(source.max_items),
                    "Fetched source"
                );
            }
            Err(error) => {
                tracing::warn!(url = %source.url, name = %source.name, error = %error, "Source fetch failed");
                report.failures.push(SourceFailure {
                    url: source.url.clone(),
                    name: source.name.clone(),
                    error,
                });
            }
        }
    }

    report
}
