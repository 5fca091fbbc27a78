//! Error types for rs-microdata.
//!
//! Malformed microdata is never an error: missing attributes, dangling
//! `itemref` ids and unknown tags degrade to empty or skipped values. Only
//! the collaborators around the extractor (fetching, reading, URL parsing)
//! can fail.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or transport failure while fetching a document.
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP request for {url} returned status {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Numeric HTTP status code.
        status: u16,
    },

    /// A fetch target or configured base URL could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The offending input.
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The byte stream could not be read into a document.
    #[error("HTML parsing failed: {0}")]
    ParseError(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
