//! The configuration snapshot carried by every resource.
//!
//! A [`ResourceConfig`] pairs a URL with the settings used to talk to it:
//! the default body format, the trailing-slash policy, the shared transport
//! session and the shared codec registry. Snapshots are never mutated;
//! deriving a resource builds a new snapshot with one field replaced, while
//! the session and registry stay shared by reference down the whole chain.

use std::sync::Arc;

use crate::clients::Transport;
use crate::rest::UrlRef;
use crate::serialize::FormatRegistry;

/// Immutable per-resource configuration.
#[derive(Clone, Debug)]
pub struct ResourceConfig {
    base_url: UrlRef,
    format: String,
    append_slash: bool,
    session: Arc<dyn Transport>,
    serializer: Arc<FormatRegistry>,
}

// Verify ResourceConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceConfig>();
};

impl ResourceConfig {
    /// Creates a snapshot from its parts.
    #[must_use]
    pub fn new(
        base_url: UrlRef,
        format: impl Into<String>,
        append_slash: bool,
        session: Arc<dyn Transport>,
        serializer: Arc<FormatRegistry>,
    ) -> Self {
        Self {
            base_url,
            format: format.into(),
            append_slash,
            session,
            serializer,
        }
    }

    /// Returns the URL of the resource.
    #[must_use]
    pub const fn base_url(&self) -> &UrlRef {
        &self.base_url
    }

    /// Returns the format name used for request bodies and `Accept`.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Returns whether a trailing `/` is appended to request URLs.
    #[must_use]
    pub const fn append_slash(&self) -> bool {
        self.append_slash
    }

    /// Returns the shared transport session.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn Transport> {
        &self.session
    }

    /// Returns the shared codec registry.
    #[must_use]
    pub const fn serializer(&self) -> &Arc<FormatRegistry> {
        &self.serializer
    }

    /// Returns a copy pointing at another URL.
    #[must_use]
    pub fn with_base_url(&self, base_url: UrlRef) -> Self {
        Self {
            base_url,
            ..self.clone()
        }
    }

    /// Returns a copy using another format.
    #[must_use]
    pub fn with_format(&self, format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..self.clone()
        }
    }

    /// Returns `true` if both snapshots share one session and one registry.
    #[must_use]
    pub fn shares_backend_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.session, &other.session) && Arc::ptr_eq(&self.serializer, &other.serializer)
    }
}
