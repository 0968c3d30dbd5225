//! Resource nodes: URL traversal and verb dispatch.
//!
//! A [`Resource`] is an immutable handle on one URL plus a
//! [`ResourceConfig`] snapshot. Traversal never mutates a node; it derives a
//! new one:
//!
//! - [`ResourceAttributes::child`] appends a named path segment
//! - [`Resource::id`] appends an id segment
//! - [`Resource::refine`] overrides id, format and URL in one step
//!
//! The verbs ([`get`](Resource::get), [`post`](Resource::post),
//! [`put`](Resource::put), [`patch`](Resource::patch),
//! [`delete`](Resource::delete)) send the request through the shared
//! transport, classify the status and decode the body.
//!
//! # Status handling
//!
//! | Status      | Result                                              |
//! |-------------|-----------------------------------------------------|
//! | 2xx         | Decoded body (`delete`: `true`)                     |
//! | 4xx         | [`HttpError::Client`]                               |
//! | 5xx         | [`HttpError::Server`]                               |
//! | anything else | `None` (`put`: [`PutOutcome::NotUpdated`], `delete`: `false`) |
//!
//! # Example
//!
//! ```rust,ignore
//! use slumber::{Api, ResourceAttributes};
//!
//! let api = Api::new("http://api.example.com/")?;
//!
//! // GET http://api.example.com/users/1/
//! let user = api.child("users")?.id(1)?.get(None).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::clients::{
    FilePart, HttpError, HttpMethod, HttpResponse, HttpResponseError, RequestData,
    TransportRequest,
};
use crate::config::ResourceConfig;
use crate::error::{Error, Result};
use crate::rest::path::{url_join, Segment, UrlRef};
use crate::rest::response::{Payload, PutOutcome};

/// Prefix marking names that are never turned into child resources.
pub const INTERNAL_PREFIX: char = '_';

/// Query parameters sent with a request.
pub type Query = HashMap<String, String>;

/// Shared child derivation for the root and every resource.
pub trait ResourceAttributes {
    /// Returns the configuration snapshot of this node.
    fn resource_config(&self) -> &ResourceConfig;

    /// Derives the child resource `name` below this node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeNotFound`] for names starting with `_`,
    /// and [`Error::Path`] if the name cannot be joined onto the URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slumber::{Api, ResourceAttributes};
    ///
    /// let api = Api::new("http://api.example.com/").unwrap();
    /// let posts = api.child("users").unwrap().id(1).unwrap().child("posts").unwrap();
    /// assert_eq!(posts.url().to_string(), "http://api.example.com/users/1/posts");
    ///
    /// assert!(api.child("_private").is_err());
    /// ```
    fn child(&self, name: &str) -> Result<Resource> {
        if name.starts_with(INTERNAL_PREFIX) {
            return Err(Error::AttributeNotFound {
                name: name.to_string(),
            });
        }

        let config = self.resource_config();
        let base_url = url_join(config.base_url(), [name])?;
        Ok(Resource::from_config(config.with_base_url(base_url)))
    }
}

/// Optional overrides applied by [`Resource::refine`].
///
/// All three may be combined. The URL override wins over the id segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Refinement {
    id: Option<Segment>,
    format: Option<String>,
    url_override: Option<UrlRef>,
}

impl Refinement {
    /// Creates an empty refinement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an id segment to the URL.
    #[must_use]
    pub fn id(mut self, id: impl Into<Segment>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Overrides the body format.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Replaces the URL wholesale, bypassing path joining.
    #[must_use]
    pub fn url_override(mut self, url: impl Into<UrlRef>) -> Self {
        self.url_override = Some(url.into());
        self
    }

    /// Returns `true` when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_none() && self.format.is_none() && self.url_override.is_none()
    }
}

/// An immutable handle on one remote resource.
///
/// Cloning is cheap; clones point at the same snapshot.
#[derive(Clone, Debug)]
pub struct Resource {
    config: Arc<ResourceConfig>,
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

impl ResourceAttributes for Resource {
    fn resource_config(&self) -> &ResourceConfig {
        &self.config
    }
}

impl Resource {
    /// Wraps a configuration snapshot.
    #[must_use]
    pub fn from_config(config: ResourceConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the URL of this resource.
    #[must_use]
    pub fn url(&self) -> &UrlRef {
        self.config.base_url()
    }

    /// Returns `true` if both handles are the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.config, &other.config)
    }

    /// Derives a node with the given overrides.
    ///
    /// An empty refinement returns this very node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Path`] if the id cannot be joined onto the URL.
    pub fn refine(&self, refinement: Refinement) -> Result<Self> {
        if refinement.is_empty() {
            return Ok(self.clone());
        }

        let mut config = (*self.config).clone();

        if let Some(id) = refinement.id {
            config = config.with_base_url(url_join(self.config.base_url(), [id])?);
        }

        if let Some(format) = refinement.format {
            config = config.with_format(format);
        }

        if let Some(url) = refinement.url_override {
            config = config.with_base_url(url);
        }

        Ok(Self::from_config(config))
    }

    /// Derives the node for one item of this collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Path`] if the id cannot be joined onto the URL.
    pub fn id(&self, id: impl Into<Segment>) -> Result<Self> {
        self.refine(Refinement::new().id(id))
    }

    /// Derives a node using another body format.
    #[must_use]
    pub fn with_format(&self, format: impl Into<String>) -> Self {
        Self::from_config(self.config.with_format(format))
    }

    /// Sends a request and classifies the response status.
    ///
    /// Returns the raw response for 2xx, 1xx, 3xx and any status outside
    /// 100-599. Use this when the caller needs headers, e.g. to drive
    /// [`handle_redirect`](Self::handle_redirect).
    ///
    /// # Errors
    ///
    /// - [`HttpError::Client`] for 4xx responses
    /// - [`HttpError::Server`] for 5xx responses
    /// - [`Error::Codec`] if no codec matches the node's format or the body
    ///   cannot be encoded
    /// - [`Error::Path`] if a byte URL is not valid UTF-8
    /// - [`HttpError::Network`] / [`HttpError::Transport`] on transport failure
    pub async fn request(
        &self,
        method: HttpMethod,
        data: Option<Value>,
        files: Option<Vec<FilePart>>,
        query: Option<Query>,
    ) -> Result<HttpResponse> {
        let config = &self.config;
        let url = self.request_url()?;

        let codec = config.serializer().codec_named(config.format())?;

        let mut request = TransportRequest::new(method, url.clone());
        request.query = query;
        request
            .headers
            .insert("accept".to_string(), codec.content_type().to_string());

        if files.as_ref().is_some_and(|files| !files.is_empty()) {
            request.data = data.map(RequestData::Fields);
            request.files = files;
        } else {
            request
                .headers
                .insert("content-type".to_string(), codec.content_type().to_string());
            if let Some(data) = data {
                request.data = Some(RequestData::Encoded(Bytes::from(codec.encode(&data)?)));
            }
        }

        tracing::debug!("{} {}", method, url);
        let response = config.session().request(request).await?;
        tracing::debug!("{} {} returned {}", method, url, response.code);

        if response.is_client_error() {
            return Err(HttpError::Client(HttpResponseError::client(url, response)).into());
        }
        if response.is_server_error() {
            return Err(HttpError::Server(HttpResponseError::server(url, response)).into());
        }

        Ok(response)
    }

    /// Returns the URL requests are sent to, with the trailing slash applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Path`] if a byte URL is not valid UTF-8.
    pub fn request_url(&self) -> Result<String> {
        let url = if self.config.append_slash() {
            self.config.base_url().with_trailing_slash()
        } else {
            self.config.base_url().clone()
        };
        Ok(url.to_request_url()?.into_owned())
    }

    /// Decodes a response body with the codec for its declared content type.
    ///
    /// Falls back to the raw body when the response has no content type or
    /// no codec is registered for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if a matching codec fails to decode the body.
    pub fn decode(&self, response: &HttpResponse) -> Result<Payload> {
        let Some(content_type) = response.media_type() else {
            return Ok(Payload::Raw(response.body.clone()));
        };

        match self.config.serializer().codec_for(&content_type) {
            Ok(codec) => Ok(Payload::Decoded(codec.decode(&response.body)?)),
            Err(_) => {
                tracing::warn!(
                    "No codec registered for response content type {}, returning raw body",
                    content_type
                );
                Ok(Payload::Raw(response.body.clone()))
            }
        }
    }

    async fn send(
        &self,
        method: HttpMethod,
        data: Option<Value>,
        files: Option<Vec<FilePart>>,
        query: Option<Query>,
    ) -> Result<Option<Payload>> {
        let response = self.request(method, data, files, query).await?;
        self.body_outcome(&response)
    }

    /// Result of `get`, `post`, `put` and `patch` for a classified response.
    ///
    /// `put` turns `None` into [`PutOutcome::NotUpdated`].
    fn body_outcome(&self, response: &HttpResponse) -> Result<Option<Payload>> {
        if response.is_success() {
            self.decode(response).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Result of `delete` for a classified response.
    const fn delete_outcome(response: &HttpResponse) -> bool {
        response.is_success()
    }

    /// Sends a GET request.
    ///
    /// Returns `None` for non-2xx statuses outside the error ranges.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`decode`](Self::decode).
    pub async fn get(&self, query: Option<Query>) -> Result<Option<Payload>> {
        self.send(HttpMethod::Get, None, None, query).await
    }

    /// Sends a POST request with an optional body.
    ///
    /// Returns `None` for non-2xx statuses outside the error ranges.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`decode`](Self::decode).
    pub async fn post(&self, data: Option<Value>, query: Option<Query>) -> Result<Option<Payload>> {
        self.send(HttpMethod::Post, data, None, query).await
    }

    /// Sends a multipart POST request with file parts.
    ///
    /// The body is not encoded; its top-level fields travel as form fields.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`decode`](Self::decode).
    pub async fn post_files(
        &self,
        data: Option<Value>,
        files: Vec<FilePart>,
        query: Option<Query>,
    ) -> Result<Option<Payload>> {
        self.send(HttpMethod::Post, data, Some(files), query).await
    }

    /// Sends a PATCH request with an optional body.
    ///
    /// Returns `None` for non-2xx statuses outside the error ranges.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`decode`](Self::decode).
    pub async fn patch(&self, data: Option<Value>, query: Option<Query>) -> Result<Option<Payload>> {
        self.send(HttpMethod::Patch, data, None, query).await
    }

    /// Sends a multipart PATCH request with file parts.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`decode`](Self::decode).
    pub async fn patch_files(
        &self,
        data: Option<Value>,
        files: Vec<FilePart>,
        query: Option<Query>,
    ) -> Result<Option<Payload>> {
        self.send(HttpMethod::Patch, data, Some(files), query).await
    }

    /// Sends a PUT request with an optional body.
    ///
    /// Returns [`PutOutcome::NotUpdated`] for non-2xx statuses outside the
    /// error ranges.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`decode`](Self::decode).
    pub async fn put(&self, data: Option<Value>, query: Option<Query>) -> Result<PutOutcome> {
        self.send(HttpMethod::Put, data, None, query)
            .await
            .map(PutOutcome::from)
    }

    /// Sends a multipart PUT request with file parts.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request) and [`decode`](Self::decode).
    pub async fn put_files(
        &self,
        data: Option<Value>,
        files: Vec<FilePart>,
        query: Option<Query>,
    ) -> Result<PutOutcome> {
        self.send(HttpMethod::Put, data, Some(files), query)
            .await
            .map(PutOutcome::from)
    }

    /// Sends a DELETE request.
    ///
    /// Returns `true` for any 2xx status (204 included) and `false` for
    /// statuses outside the error ranges.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, query: Option<Query>) -> Result<bool> {
        let response = self.request(HttpMethod::Delete, None, None, query).await?;
        Ok(Self::delete_outcome(&response))
    }

    /// Follows the `Location` of a response with a GET.
    ///
    /// Never called automatically. Relative locations are resolved against
    /// the URL this resource sends requests to; absolute ones are used
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRedirect`] when the response has no
    /// `Location` header or a blank one, otherwise see [`get`](Self::get).
    pub async fn handle_redirect(
        &self,
        response: &HttpResponse,
        query: Option<Query>,
    ) -> Result<Option<Payload>> {
        let location = response
            .location()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .ok_or_else(|| HttpError::InvalidRedirect {
                reason: format!("response with status {} has no Location header", response.code),
            })?;

        let target = self.resolve_location(location);
        tracing::debug!("Following redirect from {} to {}", self.url(), target);

        self.refine(Refinement::new().url_override(target))?
            .get(query)
            .await
    }

    fn resolve_location(&self, location: &str) -> String {
        if url::Url::parse(location).is_ok() {
            return location.to_string();
        }

        self.request_url()
            .ok()
            .and_then(|base| url::Url::parse(&base).ok())
            .and_then(|base| base.join(location).ok())
            .map_or_else(|| location.to_string(), String::from)
    }
}
