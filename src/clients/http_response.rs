//! HTTP response type returned by transports.
//!
//! [`HttpResponse`] keeps the status code, the headers (keyed by lowercase
//! name so lookups are case-insensitive) and the raw, undecoded body.

use std::collections::HashMap;

use bytes::Bytes;

/// A raw HTTP response.
///
/// # Example
///
/// ```rust
/// use slumber::clients::HttpResponse;
///
/// let response = HttpResponse::new(200, Default::default(), "ok")
///     .with_header("Content-Type", "text/plain; charset=utf-8");
///
/// assert!(response.is_success());
/// assert_eq!(response.header("content-type"), Some("text/plain; charset=utf-8"));
/// assert_eq!(response.media_type(), Some("text/plain".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, Vec<String>>,
    /// Raw response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response, normalizing header names to lowercase.
    #[must_use]
    pub fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: impl Into<Bytes>,
    ) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }

        Self {
            code,
            headers: normalized,
            body: body.into(),
        }
    }

    /// Appends a header value.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the declared content type without its parameters.
    ///
    /// `application/json; charset=utf-8` yields `application/json`. Returns
    /// `None` when the header is missing or blank.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.header("content-type")
            .map(|value| value.split(';').next().unwrap_or_default().trim())
            .filter(|value| !value.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// Returns the `Location` header, if present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for 3xx status codes.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.code >= 300 && self.code <= 399
    }

    /// Returns `true` for 4xx status codes.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.code >= 400 && self.code <= 499
    }

    /// Returns `true` for 5xx status codes.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500 && self.code <= 599
    }
}
