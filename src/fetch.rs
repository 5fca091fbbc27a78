//! HTTP retrieval of documents for [`crate::parse_url`].

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{Error, Result};
use crate::options::Options;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// A fetched document, still undecoded.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// URL after redirects; the document's base URL.
    pub final_url: String,
    /// `Content-Type` response header, if any.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Create a configured HTTP client.
///
/// # Errors
///
/// Returns [`Error::Fetch`] if the TLS backend cannot be initialised.
pub fn create_client(options: &Options) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(options.timeout_secs))
        .user_agent(options.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// GET `url` and return its body, content type and final URL.
///
/// Connection errors, timeouts and 5xx responses are retried with
/// exponential backoff up to `options.max_retries` attempts. Other
/// non-success statuses fail immediately.
///
/// # Errors
///
/// - [`Error::InvalidUrl`] if `url` is not an absolute URL
/// - [`Error::Fetch`] on transport failure
/// - [`Error::HttpStatus`] on a non-success status
pub fn fetch_document(url: &str, options: &Options) -> Result<FetchedDocument> {
    let target = url::Url::parse(url.trim()).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let client = create_client(options)?;
    let attempts = options.max_retries.max(1);

    let mut attempt = 0;
    loop {
        if attempt > 0 {
            // 500ms, 1000ms, 2000ms, ...
            let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1).min(6));
            tracing::debug!(attempt, delay_ms = delay, "Retrying after delay");
            thread::sleep(Duration::from_millis(delay));
        }
        attempt += 1;
        let last = attempt >= attempts;

        let response = match client.get(target.clone()).send() {
            Ok(response) => response,
            Err(e) if !last && (e.is_connect() || e.is_timeout()) => {
                tracing::warn!(error = %e, attempt, max_retries = attempts, "Connection error, will retry");
                continue;
            }
            Err(e) => return Err(Error::Fetch(e)),
        };

        let status = response.status();
        if status.is_server_error() && !last {
            tracing::warn!(status = %status, attempt, max_retries = attempts, "Server error, will retry");
            continue;
        }
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: target.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();

        tracing::debug!(url = %final_url, bytes = body.len(), content_type = ?content_type, "fetched document");

        return Ok(FetchedDocument {
            final_url,
            content_type,
            body,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(create_client(&Options::default()).is_ok());
    }

    #[test]
    fn relative_url_is_rejected_before_any_request() {
        let result = fetch_document("/not/absolute", &Options::default());
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }
}
