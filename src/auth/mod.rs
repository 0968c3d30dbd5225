//! Credentials attached to the default transport session.
//!
//! Resources never look inside [`Credentials`]; the value is handed to
//! [`HttpSession`](crate::clients::HttpSession) at construction and applied
//! to every outgoing request.
//!
//! # Security
//!
//! The [`Debug`] implementation masks secret values so credentials can be
//! logged alongside the rest of a configuration.
//!
//! ```rust
//! use slumber::Credentials;
//!
//! let auth = Credentials::basic("admin", Some("hunter2"));
//! let debug = format!("{auth:?}");
//! assert!(debug.contains("admin"));
//! assert!(!debug.contains("hunter2"));
//! ```

use std::fmt;

/// Authentication applied by the transport session.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic authentication.
    Basic {
        /// User name.
        username: String,
        /// Optional password.
        password: Option<String>,
    },
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// An arbitrary header carrying a secret (e.g. an API key header).
    Header {
        /// Header name.
        name: String,
        /// Header value.
        value: String,
    },
}

impl Credentials {
    /// Creates basic authentication credentials.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: Option<impl Into<String>>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.map(Into::into),
        }
    }

    /// Creates bearer token credentials.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Creates credentials sent in a custom header.
    #[must_use]
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header {
            name: name.into(),
            value: value.into(),
        }
    }

    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Basic { username, password } => builder.basic_auth(username, password.as_ref()),
            Self::Bearer(token) => builder.bearer_auth(token),
            Self::Header { name, value } => builder.header(name.as_str(), value.as_str()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, password } => write!(
                f,
                "Credentials::Basic({username}, {})",
                if password.is_some() { "*****" } else { "None" }
            ),
            Self::Bearer(_) => write!(f, "Credentials::Bearer(*****)"),
            Self::Header { name, .. } => write!(f, "Credentials::Header({name}: *****)"),
        }
    }
}
