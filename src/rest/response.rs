//! Decoded response bodies.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The body of a successful response.
///
/// Bodies whose declared content type has a registered codec are decoded;
/// everything else (no `Content-Type`, or a type nobody decodes) is handed
/// back raw.
///
/// # Example
///
/// ```rust
/// use slumber::Payload;
/// use serde_json::json;
///
/// let payload = Payload::Decoded(json!({"id": 1, "name": "ada"}));
/// assert_eq!(payload.as_value().unwrap()["name"], "ada");
///
/// let raw = Payload::Raw("hello".into());
/// assert!(raw.is_raw());
/// assert_eq!(raw.as_bytes().unwrap().as_ref(), b"hello");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A body decoded by the codec matching the response content type.
    Decoded(Value),
    /// An undecoded body.
    Raw(Bytes),
}

impl Payload {
    /// Returns the decoded value, if any.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Decoded(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Consumes the payload and returns the decoded value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Decoded(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw body, if the payload was not decoded.
    #[must_use]
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            Self::Decoded(_) => None,
        }
    }

    /// Returns `true` for an undecoded body.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Deserializes the payload into a typed value.
    ///
    /// Raw bodies are parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the payload does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Decoded(value) => T::deserialize(value),
            Self::Raw(bytes) => serde_json::from_slice(bytes),
        }
    }
}

/// The result of a PUT that did not fail.
///
/// A 2xx response carries the decoded body. Any other status outside the
/// 4xx and 5xx error ranges means the resource was not updated.
///
/// # Example
///
/// ```rust
/// use slumber::{Payload, PutOutcome};
/// use serde_json::json;
///
/// let outcome = PutOutcome::Updated(Payload::Decoded(json!({"id": 1})));
/// assert!(outcome.is_updated());
///
/// assert!(!PutOutcome::NotUpdated.is_updated());
/// assert_eq!(PutOutcome::NotUpdated.into_payload(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum PutOutcome {
    /// The server accepted the update and answered with this body.
    Updated(Payload),
    /// The server answered with a non-2xx, non-error status.
    NotUpdated,
}

impl PutOutcome {
    /// Returns `true` if the update was accepted.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    /// Returns the response body of an accepted update.
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Updated(payload) => Some(payload),
            Self::NotUpdated => None,
        }
    }

    /// Consumes the outcome and returns the body of an accepted update.
    #[must_use]
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            Self::Updated(payload) => Some(payload),
            Self::NotUpdated => None,
        }
    }
}

impl From<Option<Payload>> for PutOutcome {
    fn from(body: Option<Payload>) -> Self {
        body.map_or(Self::NotUpdated, Self::Updated)
    }
}
