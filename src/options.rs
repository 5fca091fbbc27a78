//! Configuration options for microdata extraction.
//!
//! The `Options` struct carries the immutable per-document configuration:
//! the base URL used for link resolution, the nesting and item bounds, and
//! the settings handed to the HTTP fetcher.

use url::Url;

use crate::error::{Error, Result};

/// Default maximum depth of nested items.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default budget of nested items per document.
pub const DEFAULT_MAX_ITEMS: usize = 10_000;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts for transient fetch failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// User agent string sent by the fetcher.
pub const DEFAULT_USER_AGENT: &str = concat!("rs-microdata/", env!("CARGO_PKG_VERSION"));

/// Configuration options for microdata extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_microdata::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     max_depth: 16,
///     ..Options::with_base_url("http://example.com/page")
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Location of the document, used to make `src`/`href` values absolute.
    ///
    /// A `<base href>` element in the document takes precedence and is itself
    /// resolved against this URL. When `None`, relative URLs are emitted as
    /// written.
    ///
    /// Default: `None`
    pub base_url: Option<String>,

    /// Maximum depth of nested items.
    ///
    /// An item nested deeper than this is emitted with its types and id but
    /// without properties.
    ///
    /// Default: `64`
    pub max_depth: usize,

    /// Budget of nested items emitted per document.
    ///
    /// Every nested item placed in a property counts, including each copy
    /// of an item shared through `itemref`. Once spent, further nested
    /// items are emitted with their types and id but without properties.
    ///
    /// Default: `10_000`
    pub max_items: usize,

    /// User agent for [`crate::parse_url`].
    pub user_agent: String,

    /// Request timeout for [`crate::parse_url`] in seconds.
    ///
    /// Default: `30`
    pub timeout_secs: u64,

    /// Attempts made for connection errors and 5xx responses.
    ///
    /// Default: `3`
    pub max_retries: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_items: DEFAULT_MAX_ITEMS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Options {
    /// Default options with the given base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Parse the configured base URL.
    ///
    /// An empty string is treated like `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL is set but not a valid
    /// absolute URL.
    pub fn parsed_base_url(&self) -> Result<Option<Url>> {
        match self.base_url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Url::parse(raw).map(Some).map_err(|source| Error::InvalidUrl {
                url: raw.to_string(),
                source,
            }),
        }
    }
}
