//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: feed address checks and safe-link filtering for rendered markup
//! - **Text processing**: HTML-to-text snippets and control character stripping
//!
//! # Examples
//!
//! ```
//! use herald::util::{html_to_text, is_safe_href, validate_url};
//!
//! // Validate a feed URL
//! let url = validate_url("https://example.com/feed.xml").unwrap();
//!
//! // Reject script URLs before they reach the page
//! assert!(!is_safe_href("javascript:void(0)"));
//!
//! // Flatten markup into a snippet
//! assert_eq!(html_to_text("<p>Breaking</p>"), "Breaking");
//! ```

mod text;
mod url_validator;

pub use text::{collapse_whitespace, html_to_text, strip_control_chars};
pub use url_validator::{is_safe_href, validate_url, UrlValidationError};
