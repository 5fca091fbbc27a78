//! URL Utility Functions
//!
//! Resolution of `src`/`href` attribute values against the document's base
//! URL. Resolution is total: whatever cannot be resolved is returned as
//! written.

use url::Url;

/// Check if a string is an absolute URL (any scheme).
#[must_use]
pub fn is_absolute_url(s: &str) -> bool {
    Url::parse(s.trim()).is_ok()
}

/// Convert a relative or absolute URL to absolute form.
///
/// # Arguments
/// * `url_str` - The attribute value (relative or absolute)
/// * `base` - The document base URL, if known
///
/// # Returns
/// * The trimmed input unchanged when it is already absolute
/// * The resolved URL when a base is available and joining succeeds
/// * The trimmed input otherwise
#[must_use]
pub fn resolve_url(url_str: &str, base: Option<&Url>) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    if is_absolute_url(url_str) {
        return url_str.to_string();
    }

    match base.map(|base| base.join(url_str)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => url_str.to_string(),
    }
}

/// Compute the effective base URL of a document.
///
/// A `<base href>` value wins over the configured base; a relative one is
/// resolved against it. Unparseable values leave the configured base as is.
#[must_use]
pub fn effective_base(configured: Option<Url>, base_href: Option<&str>) -> Option<Url> {
    let Some(href) = base_href.map(str::trim).filter(|h| !h.is_empty()) else {
        return configured;
    };

    let parsed = match &configured {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };

    match parsed {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!(href, error = %e, "ignoring unusable <base href>");
            configured
        }
    }
}
