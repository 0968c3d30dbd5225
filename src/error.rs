//! Error types for the crate.
//!
//! Each layer has its own error enum ([`ConfigError`], [`PathError`],
//! [`CodecError`], [`HttpError`]); [`Error`] wraps them all for the resource
//! and root APIs.
//!
//! # Example
//!
//! ```rust
//! use slumber::{Api, ConfigError, Error};
//!
//! let result = Api::builder().build();
//! assert!(matches!(
//!     result,
//!     Err(Error::Config(ConfigError::MissingRequiredField { field: "base_url" }))
//! ));
//! ```

use thiserror::Error;

use crate::clients::HttpError;
use crate::rest::PathError;
use crate::serialize::CodecError;

/// Errors that can occur while configuring a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the client.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Client configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A URL segment could not be joined.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Codec lookup, encoding or decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The HTTP exchange failed or returned a 4xx/5xx status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A name reserved for internal use was requested as a child resource.
    #[error("'{name}' is not a resource attribute")]
    AttributeNotFound {
        /// The rejected name.
        name: String,
    },
}

impl Error {
    /// Returns the HTTP status code for client and server errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
