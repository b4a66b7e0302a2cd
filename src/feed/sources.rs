use serde::Deserialize;
use std::path::Path;

use crate::config::{Config, ConfigError};

/// A feed the page aggregates, as declared in the source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Address of the RSS/Atom document.
    pub url: String,
    /// Display name shown on every card from this source.
    pub name: String,
    /// Upper bound on entries taken from this source, in feed order.
    pub max_items: usize,
}

#[derive(Debug, Deserialize)]
struct SourceList {
    sources: Vec<SourceDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceDecl {
    url: String,
    name: String,
    #[serde(default)]
    max_items: Option<usize>,
}

/// Loads the source list from a JSON file.
///
/// The file has the shape `{ "sources": [ { "url", "name", "maxItems"? } ] }`.
/// Sources without `maxItems` are capped at `default_max_items`. An explicit
/// `"maxItems": 0` is honored and the source contributes nothing; it does not
/// fall back to the default. Order is preserved: it decides which copy of a
/// duplicated entry survives.
///
/// Values are only trimmed here. A blank or unusable `url` is reported by
/// the fetcher as a failure of that one source, and a blank `name` is kept.
///
/// # Errors
///
/// - [`ConfigError::SourcesMissing`] if the file does not exist
/// - [`ConfigError::SourcesRead`] / [`ConfigError::TooLarge`] if it cannot be read
/// - [`ConfigError::SourcesMalformed`] if it is empty, not JSON, or lacks `url`/`name`
pub async fn load_sources(
    path: &Path,
    default_max_items: usize,
) -> Result<Vec<Source>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::SourcesMissing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::SourcesRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.len() as u64 > Config::MAX_FILE_SIZE {
        return Err(ConfigError::TooLarge(format!(
            "Source list is {} bytes (max {} bytes)",
            content.len(),
            Config::MAX_FILE_SIZE
        )));
    }

    let sources =
        parse_sources(&content, default_max_items).map_err(|source| ConfigError::SourcesMalformed {
            path: path.to_path_buf(),
            source,
        })?;

    if sources.is_empty() {
        tracing::warn!(path = %path.display(), "Source list declares no sources");
    } else {
        tracing::info!(path = %path.display(), count = sources.len(), "Loaded sources");
    }

    Ok(sources)
}

fn parse_sources(content: &str, default_max_items: usize) -> Result<Vec<Source>, serde_json::Error> {
    let list: SourceList = serde_json::from_str(content)?;

    Ok(list
        .sources
        .into_iter()
        .map(|decl| Source {
            url: decl.url.trim().to_string(),
            name: decl.name.trim().to_string(),
            max_items: decl.max_items.unwrap_or(default_max_items),
        })
        .collect())
}
