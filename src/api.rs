//! The client root.
//!
//! [`Api`] is the top of the resource tree. It validates configuration,
//! opens the transport session once and builds the codec registry, then
//! hands out child resources through [`ResourceAttributes`].

use std::sync::Arc;

use crate::auth::Credentials;
use crate::clients::{HttpSession, Transport};
use crate::config::ResourceConfig;
use crate::error::{ConfigError, Result};
use crate::rest::{Resource, ResourceAttributes, UrlRef};
use crate::serialize::{FormatRegistry, DEFAULT_FORMAT};

/// Entry point of a REST API.
///
/// # Example
///
/// ```rust,ignore
/// use slumber::{Api, Credentials, ResourceAttributes};
/// use serde_json::json;
///
/// let api = Api::builder()
///     .base_url("https://api.example.com/v1/")
///     .auth(Credentials::bearer("token"))
///     .build()?;
///
/// let created = api.child("users")?.post(Some(json!({"name": "ada"})), None).await?;
/// let removed = api.child("users")?.id(1)?.delete(None).await?;
/// ```
#[derive(Clone, Debug)]
pub struct Api {
    root: Resource,
}

// Verify Api is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Api>();
};

impl Api {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`](crate::Error::Http) if the HTTP session
    /// cannot be created.
    pub fn new(base_url: impl Into<UrlRef>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Creates a new builder for constructing an `Api`.
    #[must_use]
    pub fn builder() -> ApiBuilder {
        ApiBuilder::new()
    }

    /// Returns the root resource.
    #[must_use]
    pub const fn root(&self) -> &Resource {
        &self.root
    }
}

impl ResourceAttributes for Api {
    fn resource_config(&self) -> &ResourceConfig {
        self.root.resource_config()
    }
}

/// Builder for constructing [`Api`] instances.
///
/// `base_url` is required. All other fields have defaults.
///
/// # Defaults
///
/// - `format`: `json`
/// - `append_slash`: `true`
/// - `session`: a new [`HttpSession`] carrying `auth`
/// - `serializer`: a [`FormatRegistry`] with JSON and YAML, defaulting to `format`
///
/// # Example
///
/// ```rust
/// use slumber::{Api, ResourceAttributes};
///
/// let api = Api::builder()
///     .base_url("http://api.example.com")
///     .format("yaml")
///     .append_slash(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(api.resource_config().format(), "yaml");
/// assert!(!api.resource_config().append_slash());
/// ```
#[derive(Debug, Default)]
pub struct ApiBuilder {
    base_url: Option<UrlRef>,
    auth: Option<Credentials>,
    format: Option<String>,
    append_slash: Option<bool>,
    session: Option<Arc<dyn Transport>>,
    serializer: Option<Arc<FormatRegistry>>,
}

impl ApiBuilder {
    /// Creates a new builder with all fields unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<UrlRef>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets credentials for the default session.
    ///
    /// Ignored when a custom session is supplied.
    #[must_use]
    pub fn auth(mut self, auth: Credentials) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the default body format name.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets whether request URLs get a trailing `/`.
    #[must_use]
    pub const fn append_slash(mut self, append_slash: bool) -> Self {
        self.append_slash = Some(append_slash);
        self
    }

    /// Supplies the transport session shared by every resource.
    #[must_use]
    pub fn session(mut self, session: Arc<dyn Transport>) -> Self {
        self.session = Some(session);
        self
    }

    /// Supplies the codec registry shared by every resource.
    #[must_use]
    pub fn serializer(mut self, serializer: Arc<FormatRegistry>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Builds the [`Api`], validating the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredField`] if `base_url` is not set
    /// - [`CodecError::NotAvailable`](crate::serialize::CodecError) if
    ///   `format` names no built-in codec and no registry was supplied
    /// - [`HttpError::Network`](crate::clients::HttpError) if the default
    ///   session cannot be created
    pub fn build(self) -> Result<Api> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let serializer = match self.serializer {
            Some(serializer) => serializer,
            None => Arc::new(FormatRegistry::new(self.format.as_deref())?),
        };

        let session: Arc<dyn Transport> = match self.session {
            Some(session) => {
                if self.auth.is_some() {
                    tracing::debug!("Custom session supplied, credentials are not attached");
                }
                session
            }
            None => Arc::new(HttpSession::new(self.auth)?),
        };

        let format = self.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        let append_slash = self.append_slash.unwrap_or(true);

        tracing::debug!("Creating API client for {}", base_url);

        let config = ResourceConfig::new(base_url, format, append_slash, session, serializer);
        Ok(Api {
            root: Resource::from_config(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_missing_base_url_fails() {
        let result = Api::builder().format("json").build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingRequiredField { field: "base_url" }))
        ));
    }

    #[test]
    fn test_defaults() {
        let api = Api::new("http://api.example.com/").unwrap();
        let config = api.resource_config();

        assert_eq!(config.base_url(), &UrlRef::from("http://api.example.com/"));
        assert_eq!(config.format(), "json");
        assert!(config.append_slash());
        assert_eq!(config.serializer().default_content_type(), "application/json");
    }

    #[test]
    fn test_format_sets_registry_default() {
        let api = Api::builder()
            .base_url("http://api.example.com/")
            .format("yaml")
            .build()
            .unwrap();

        assert_eq!(api.resource_config().serializer().default_format(), "yaml");
    }

    #[test]
    fn test_unknown_format_without_registry_fails() {
        let result = Api::builder()
            .base_url("http://api.example.com/")
            .format("xml")
            .build();
        assert!(matches!(result, Err(Error::Codec(_))));
    }

    #[test]
    fn test_supplied_serializer_is_shared() {
        let registry = Arc::new(FormatRegistry::default());
        let api = Api::builder()
            .base_url("http://api.example.com/")
            .serializer(Arc::clone(&registry))
            .build()
            .unwrap();

        let child = api.child("users").unwrap();
        assert!(Arc::ptr_eq(child.resource_config().serializer(), &registry));
    }

    #[test]
    fn test_children_share_session() {
        let api = Api::new("http://api.example.com/").unwrap();
        let users = api.child("users").unwrap();
        let posts = users.id(1).unwrap().child("posts").unwrap();

        assert!(posts.resource_config().shares_backend_with(api.resource_config()));
        assert_eq!(
            posts.url(),
            &UrlRef::from("http://api.example.com/users/1/posts")
        );
    }

    #[test]
    fn test_root_rejects_internal_names() {
        let api = Api::new("http://api.example.com/").unwrap();
        assert!(matches!(
            api.child("_session"),
            Err(Error::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_byte_base_url() {
        let api = Api::new(&b"http://api.example.com/r\xc7\x9d"[..]).unwrap();
        let child = api.child("items").unwrap();
        assert_eq!(
            child.url(),
            &UrlRef::Bytes(b"http://api.example.com/r\xc7\x9d/items".to_vec())
        );
    }
}
