//! Resource fetching for the Lantern engine.
//!
//! The engine consumes exactly one network operation: "give me the headers
//! and body for this URL". [`Fetcher`] is that seam. [`NetworkFetcher`] is
//! the production implementation (blocking HTTP via `reqwest`, plus local
//! files), and tests substitute in-memory fetchers.

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use thiserror::Error;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("Lantern/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// A fetched resource: lowercased response headers and the decoded body text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Response headers, keyed by lowercase header name.
    pub headers: HashMap<String, String>,
    /// Response body as text.
    pub body: String,
}

/// Why a fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built or the request could not complete.
    #[error("request to '{url}' failed: {source}")]
    Request {
        /// The requested URL.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("'{url}' answered with HTTP status {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// The response uses a content or transfer encoding we cannot decode.
    #[error("'{url}' uses unsupported {header}: {value}")]
    UnsupportedEncoding {
        /// The requested URL.
        url: String,
        /// The offending header name.
        header: String,
        /// The offending header value.
        value: String,
    },
    /// A local file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can turn a URL into a [`Response`].
pub trait Fetcher {
    /// Fetch `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the resource cannot be retrieved, the
    /// status is not a success, or the encoding is unsupported.
    fn fetch(&self, url: &str) -> Result<Response, FetchError>;
}

/// Blocking fetcher for `http://`, `https://` and `file://` URLs.
///
/// Anything without a scheme is treated as a filesystem path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkFetcher;

impl NetworkFetcher {
    /// Create a new network fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fetch_http(url: &str) -> Result<Response, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(request_error)?;

        let response = client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.trim().to_string()))
            })
            .collect();

        check_encoding(url, &headers)?;

        let body = response.text().map_err(request_error)?;
        Ok(Response { headers, body })
    }

    fn fetch_file(url: &str) -> Result<Response, FetchError> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        let body = fs::read_to_string(path).map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(Response {
            headers: HashMap::new(),
            body,
        })
    }
}

impl Fetcher for NetworkFetcher {
    fn fetch(&self, url: &str) -> Result<Response, FetchError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Self::fetch_http(url)
        } else {
            Self::fetch_file(url)
        }
    }
}

/// Reject bodies we cannot decode.
///
/// The client is built without decompression support, so any
/// `content-encoding` other than identity would hand us compressed bytes.
fn check_encoding(url: &str, headers: &HashMap<String, String>) -> Result<(), FetchError> {
    for (header, accepted) in [
        ("content-encoding", &["identity"][..]),
        ("transfer-encoding", &["identity", "chunked"][..]),
    ] {
        if let Some(value) = headers.get(header) {
            if !accepted.iter().any(|ok| value.eq_ignore_ascii_case(ok)) {
                return Err(FetchError::UnsupportedEncoding {
                    url: url.to_string(),
                    header: header.to_string(),
                    value: value.clone(),
                });
            }
        }
    }
    Ok(())
}
