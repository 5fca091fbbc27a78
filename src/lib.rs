//! # rs-microdata
//!
//! Extraction of HTML Microdata (`itemscope`, `itemtype`, `itemprop`,
//! `itemid`, `itemref`) into a forest of typed items.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_microdata::{parse_html, Options};
//!
//! let html = r#"<div itemscope itemtype="http://schema.org/Person">
//!   <span itemprop="name">Penelope</span>
//!   <a itemprop="url" href="/people/penelope">profile</a>
//! </div>"#;
//!
//! let data = parse_html(html, &Options::with_base_url("http://example.com/"))?;
//! assert_eq!(data.items[0].text("name"), Some("Penelope"));
//! assert_eq!(data.items[0].text("url"), Some("http://example.com/people/penelope"));
//! println!("{}", data.to_json().unwrap_or_default());
//! # Ok::<(), rs_microdata::Error>(())
//! ```
//!
//! ## Behaviour
//!
//! - **Lenient**: malformed microdata never fails; missing attributes and
//!   dangling `itemref` ids degrade to empty or skipped values
//! - **Terminating**: `itemref` cycles are cut and nesting depth is bounded
//! - **Stable output**: serialized property keys are sorted, values keep
//!   document order

mod error;
mod options;
mod result;

/// DOM helpers over `dom_query`'s arena tree.
pub mod dom;

/// Microdata algorithm (scope walker, item builder, value rules, id index).
pub mod microdata;

/// URL resolution against the document base.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// HTTP retrieval for [`parse_url`].
pub mod fetch;

use std::io::Read;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::Options;
pub use result::{Item, Microdata, Properties, Value};

/// Extracts microdata from a decoded HTML document.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `options.base_url` is set but invalid.
///
/// # Example
///
/// ```rust
/// use rs_microdata::{parse_html, Options};
///
/// let html = r#"<div itemscope><meta itemprop="length" content="1.70"></div>"#;
/// let data = parse_html(html, &Options::default())?;
/// assert_eq!(data.items[0].text("length"), Some("1.70"));
/// # Ok::<(), rs_microdata::Error>(())
/// ```
pub fn parse_html(html: &str, options: &Options) -> Result<Microdata> {
    let doc = dom::Document::from(html);
    microdata::extract(&doc, options)
}

/// Extracts microdata from raw HTML bytes.
///
/// The charset comes from `content_type` (e.g. `text/html; charset=ISO-8859-1`)
/// when it names a known encoding, else from a `<meta>` declaration, else
/// UTF-8. Invalid sequences are replaced with U+FFFD.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `options.base_url` is set but invalid.
pub fn parse_bytes(html: &[u8], content_type: Option<&str>, options: &Options) -> Result<Microdata> {
    let html_str = encoding::transcode_to_utf8(html, content_type);
    parse_html(&html_str, options)
}

/// Reads a whole document from `reader` and extracts microdata from it.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the stream cannot be read, and
/// [`Error::InvalidUrl`] for an invalid `options.base_url`.
pub fn parse_reader<R: Read>(
    mut reader: R,
    content_type: Option<&str>,
    options: &Options,
) -> Result<Microdata> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| Error::ParseError(format!("failed to read document: {e}")))?;
    parse_bytes(&buffer, content_type, options)
}

/// Fetches `url` with an HTTP GET and extracts microdata from the response.
///
/// The response's final URL (after redirects) is the base URL, overriding
/// `options.base_url`; the `Content-Type` header supplies the charset.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`], [`Error::Fetch`] or [`Error::HttpStatus`]
/// when the document cannot be retrieved.
pub fn parse_url(url: &str, options: &Options) -> Result<Microdata> {
    let fetched = fetch::fetch_document(url, options)?;
    let options = Options {
        base_url: Some(fetched.final_url),
        ..options.clone()
    };
    parse_bytes(&fetched.body, fetched.content_type.as_deref(), &options)
}
