//! Transport abstraction and the default reqwest-backed session.
//!
//! Every resource derived from one [`Api`](crate::Api) shares a single
//! [`Transport`]. The default implementation, [`HttpSession`], wraps a
//! `reqwest::Client` and the caller's [`Credentials`]; anything else that
//! can turn a [`TransportRequest`] into an [`HttpResponse`] can stand in for
//! it (a proxy, a recorder, a test double).

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::auth::Credentials;
use crate::clients::errors::HttpError;
use crate::clients::http_request::{RequestData, TransportRequest};
use crate::clients::http_response::HttpResponse;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Performs HTTP exchanges on behalf of resources.
///
/// Implementations own connection pooling, TLS, timeouts and any retry
/// policy. Status codes are returned as-is; classification happens in the
/// resource layer.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] or [`HttpError::Transport`] when no
    /// response could be obtained.
    async fn request(&self, request: TransportRequest) -> Result<HttpResponse, HttpError>;
}

/// Default transport built on `reqwest`.
///
/// Redirects are not followed, so 3xx responses reach the caller together
/// with their `Location` header.
///
/// # Thread Safety
///
/// `HttpSession` is `Send + Sync`; one session is shared by every resource
/// derived from the same root.
///
/// # Example
///
/// ```rust
/// use slumber::{Credentials, HttpSession};
///
/// let session = HttpSession::new(Some(Credentials::bearer("token"))).unwrap();
/// assert!(session.credentials().is_some());
/// ```
pub struct HttpSession {
    client: reqwest::Client,
    credentials: Option<Credentials>,
}

// Verify HttpSession is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpSession>();
};

impl HttpSession {
    /// Creates a session with a fresh client and optional credentials.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying client cannot be
    /// created (e.g. TLS initialization failure).
    pub fn new(credentials: Option<Credentials>) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(format!("slumber-rs/{SDK_VERSION}"))
            .build()?;

        Ok(Self::with_client(client, credentials))
    }

    /// Wraps a caller-configured client.
    ///
    /// Use this to set timeouts, proxies or a redirect policy of your own.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, credentials: Option<Credentials>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Returns the credentials attached to this session.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the underlying reqwest client.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Builds the multipart form for a file upload.
    ///
    /// Top-level fields of an unencoded object body become text parts.
    fn multipart_form(request: &TransportRequest) -> Result<reqwest::multipart::Form, HttpError> {
        let mut form = reqwest::multipart::Form::new();

        if let Some(RequestData::Fields(serde_json::Value::Object(fields))) = &request.data {
            for (name, value) in fields {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form = form.text(name.clone(), text);
            }
        }

        for file in request.files.iter().flatten() {
            let mut part = reqwest::multipart::Part::bytes(file.content.to_vec())
                .file_name(file.file_name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime)?;
            }
            form = form.part(file.field.clone(), part);
        }

        Ok(form)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSession")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpSession {
    async fn request(&self, request: TransportRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str());

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(query) = &request.query {
            builder = builder.query(query);
        }

        if let Some(credentials) = &self.credentials {
            builder = credentials.apply(builder);
        }

        if request.has_files() {
            builder = builder.multipart(Self::multipart_form(&request)?);
        } else {
            match &request.data {
                Some(RequestData::Encoded(body)) => builder = builder.body(body.clone()),
                Some(RequestData::Fields(value)) => builder = builder.json(value),
                None => {}
            }
        }

        let res = builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?;

        Ok(HttpResponse::new(code, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http_request::{FilePart, HttpMethod};
    use serde_json::json;

    #[test]
    fn test_session_construction_without_credentials() {
        let session = HttpSession::new(None).unwrap();
        assert!(session.credentials().is_none());
    }

    #[test]
    fn test_session_debug_masks_credentials() {
        let session = HttpSession::new(Some(Credentials::bearer("secret"))).unwrap();
        let debug = format!("{session:?}");
        assert!(debug.contains("HttpSession"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpSession>();
    }

    #[test]
    fn test_parse_response_headers_keeps_undecodable_values() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::LOCATION,
            reqwest::header::HeaderValue::from_bytes(b"/caf\xe9/").unwrap(),
        );
        headers.append("x-tag", reqwest::header::HeaderValue::from_static("a"));
        headers.append("x-tag", reqwest::header::HeaderValue::from_static("b"));

        let parsed = HttpSession::parse_response_headers(&headers);

        assert_eq!(parsed["location"], vec!["/caf\u{fffd}/".to_string()]);
        assert_eq!(parsed["x-tag"], vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_multipart_form_rejects_invalid_mime() {
        let mut request = TransportRequest::new(HttpMethod::Post, "http://example.com/");
        request.data = Some(RequestData::Fields(json!({"title": "report", "pages": 3})));
        request.files = Some(vec![
            FilePart::new("upload", "report.pdf", "pdf").mime("not a mime")
        ]);

        assert!(matches!(
            HttpSession::multipart_form(&request),
            Err(HttpError::Network(_))
        ));
    }

    #[test]
    fn test_multipart_form_accepts_fields_and_files() {
        let mut request = TransportRequest::new(HttpMethod::Post, "http://example.com/");
        request.data = Some(RequestData::Fields(json!({"title": "report", "pages": 3})));
        request.files = Some(vec![
            FilePart::new("upload", "report.pdf", "pdf").mime("application/pdf")
        ]);

        assert!(HttpSession::multipart_form(&request).is_ok());
    }
}
