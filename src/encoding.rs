//! Character encoding detection and transcoding.
//!
//! The charset is resolved from, in order: the declared `Content-Type`
//! (HTTP header or caller-supplied), a `<meta>` declaration in the first
//! kilobyte, and finally UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `charset=...` inside a Content-Type value
#[allow(clippy::expect_used)]
static CONTENT_TYPE_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;,]+)"#).expect("valid regex")
});

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Extract the charset parameter from a Content-Type value such as
/// `text/html; charset=ISO-8859-1`.
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    CONTENT_TYPE_PARAM_RE
        .captures(content_type)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Detect character encoding of HTML bytes.
///
/// A recognised charset in `content_type` wins; otherwise the first 1024
/// bytes are scanned for `<meta charset>` and `<meta http-equiv>`
/// declarations. Unknown labels are ignored. Defaults to UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some(encoding) = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    if let Some(charset) = extract_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    if let Some(charset) = extract_content_type_charset(&head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    UTF_8
}

/// Extract charset from `<meta charset="...">` tag.
fn extract_charset(html: &str) -> Option<String> {
    CHARSET_META_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract charset from `<meta http-equiv="Content-Type" content="...; charset=...">` tag.
fn extract_content_type_charset(html: &str) -> Option<String> {
    CONTENT_TYPE_CHARSET_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid sequences become U+FFFD rather than errors. A byte order mark
/// overrides every declaration.
///
/// # Examples
///
/// ```
/// use rs_microdata::encoding::transcode_to_utf8;
///
/// let html = b"<p>Caf\xE9</p>";
/// let utf8_str = transcode_to_utf8(html, Some("text/html; charset=ISO-8859-1"));
/// assert_eq!(utf8_str, "<p>Café</p>");
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(html, content_type);
    let (decoded, used, had_errors) = encoding.decode(html);

    if had_errors {
        tracing::debug!(encoding = used.name(), "replaced malformed byte sequences while decoding");
    }

    decoded.into_owned()
}
