use thiserror::Error;
use url::Url;

/// Schemes a rendered link or image source may use. Relative URLs are
/// accepted separately.
const SAFE_LINK_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates a URL string for use as a feed source.
///
/// Feed addresses come from the operator's own source list, so only the
/// shape is checked: the string must parse and use `http` or `https`.
///
/// # Errors
///
/// Returns [`UrlValidationError`] if:
/// - The URL cannot be parsed ([`UrlValidationError::InvalidUrl`])
/// - The scheme is not `http` or `https` ([`UrlValidationError::UnsupportedScheme`])
///
/// # Examples
///
/// ```
/// use herald::util::validate_url;
///
/// let url = validate_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("file:///etc/passwd").is_err());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Returns `true` if `href` may be emitted as a link target in the page.
///
/// Relative references are allowed. Absolute URLs must use one of
/// `http`, `https`, `ftp`, `mailto` or `tel`, which rules out `javascript:`
/// and `data:` payloads smuggled in through feed content.
///
/// ```
/// use herald::util::is_safe_href;
///
/// assert!(is_safe_href("https://example.com/post"));
/// assert!(is_safe_href("/relative/path"));
/// assert!(!is_safe_href("javascript:alert(1)"));
/// ```
pub fn is_safe_href(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => SAFE_LINK_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
