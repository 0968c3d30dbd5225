//! HTTP-specific error types.
//!
//! Status codes in the 4xx range surface as [`HttpError::Client`], codes in
//! the 5xx range as [`HttpError::Server`]. Both carry an
//! [`HttpResponseError`] with the status code, the request URL, the response
//! and its raw body. Every other status is returned to the caller untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use slumber::{Error, HttpError};
//!
//! match api.child("users")?.id(1)?.get(None).await {
//!     Ok(user) => println!("{user:?}"),
//!     Err(Error::Http(HttpError::Client(e))) if e.code == 404 => println!("no such user"),
//!     Err(e) => return Err(e),
//! }
//! ```

use bytes::Bytes;
use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// Error returned when a request receives a 4xx or 5xx response.
#[derive(Debug, Error)]
#[error("{kind} Error {code}: {url}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The URL the request was sent to.
    pub url: String,
    /// The full response.
    pub response: HttpResponse,
    /// The raw response body.
    pub content: Bytes,
    kind: &'static str,
}

impl HttpResponseError {
    /// Builds the error for a 4xx response.
    #[must_use]
    pub fn client(url: impl Into<String>, response: HttpResponse) -> Self {
        Self::with_kind("Client", url, response)
    }

    /// Builds the error for a 5xx response.
    #[must_use]
    pub fn server(url: impl Into<String>, response: HttpResponse) -> Self {
        Self::with_kind("Server", url, response)
    }

    fn with_kind(kind: &'static str, url: impl Into<String>, response: HttpResponse) -> Self {
        Self {
            code: response.code,
            url: url.into(),
            content: response.body.clone(),
            response,
            kind,
        }
    }
}

/// Unified error type for HTTP exchanges.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a 4xx status.
    #[error(transparent)]
    Client(HttpResponseError),

    /// The server answered with a 5xx status.
    #[error(transparent)]
    Server(HttpResponseError),

    /// Network or connection error raised by reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by a custom transport.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// A redirect was requested for a response that cannot be followed.
    #[error("Cannot follow redirect: {reason}")]
    InvalidRedirect {
        /// Why the redirect could not be followed.
        reason: String,
    },
}

impl HttpError {
    /// Returns the status code when the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Client(e) | Self::Server(e) => Some(e.code),
            _ => None,
        }
    }
}
