//! HTTP request types handed to a [`Transport`](crate::clients::Transport).
//!
//! A [`TransportRequest`] is the fully resolved exchange a resource wants to
//! perform: method, absolute URL, query parameters, headers and an optional
//! body or set of file parts.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

/// HTTP methods issued by resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the method as it appears on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Body of an outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestData {
    /// A body already encoded by the negotiated codec.
    Encoded(Bytes),
    /// A structured value left unencoded because file parts are attached.
    ///
    /// The transport decides how to fold it into the multipart form.
    Fields(serde_json::Value),
}

/// A file attached to a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// Raw file content.
    pub content: Bytes,
    /// Optional MIME type of the content.
    pub mime: Option<String>,
}

impl FilePart {
    /// Creates a new file part without an explicit MIME type.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content: content.into(),
            mime: None,
        }
    }

    /// Sets the MIME type of the file content.
    #[must_use]
    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .field("mime", &self.mime)
            .finish()
    }
}

/// A resolved request ready to be sent by a transport.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL, trailing-slash policy already applied.
    pub url: String,
    /// Query parameters appended by the transport.
    pub query: Option<HashMap<String, String>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body, if any.
    pub data: Option<RequestData>,
    /// File parts for multipart uploads.
    pub files: Option<Vec<FilePart>>,
}

impl TransportRequest {
    /// Creates a request with no body, query or headers.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: None,
            headers: HashMap::new(),
            data: None,
            files: None,
        }
    }

    /// Returns `true` when the request carries at least one file part.
    #[must_use]
    pub fn has_files(&self) -> bool {
        self.files.as_ref().is_some_and(|files| !files.is_empty())
    }

    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
