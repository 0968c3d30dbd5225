//! The [`Codec`] trait and the built-in JSON and YAML codecs.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while looking up or running a codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// No codec is registered for the requested format or content type.
    #[error("No codec available for '{content_type}'")]
    NotAvailable {
        /// The format name or content type that was looked up.
        content_type: String,
    },

    /// A value could not be encoded.
    #[error("Failed to encode {content_type} body: {reason}")]
    Encode {
        /// Content type of the codec.
        content_type: String,
        /// Underlying failure.
        reason: String,
    },

    /// A body could not be decoded.
    #[error("Failed to decode {content_type} body: {reason}")]
    Decode {
        /// Content type of the codec.
        content_type: String,
        /// Underlying failure.
        reason: String,
    },
}

/// Encodes structured values to wire bodies and back for one format.
///
/// A codec has a short format name (`json`), a primary content type sent
/// in `Accept` and `Content-Type` headers, and optionally further content
/// types it can decode.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Short format name, e.g. `json`.
    fn key(&self) -> &str;

    /// Primary content type, e.g. `application/json`.
    fn content_type(&self) -> &str;

    /// All content types this codec decodes. Defaults to the primary one.
    fn content_types(&self) -> Vec<&str> {
        vec![self.content_type()]
    }

    /// Encodes a value into a wire body.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the value cannot be represented.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Decodes a wire body into a value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the body is malformed.
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError>;
}

/// JSON codec backed by `serde_json`.
///
/// # Example
///
/// ```rust
/// use slumber::serialize::{Codec, JsonCodec};
/// use serde_json::json;
///
/// let codec = JsonCodec;
/// let body = codec.encode(&json!({"id": 1})).unwrap();
/// assert_eq!(codec.decode(&body).unwrap(), json!({"id": 1}));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Content types decoded as JSON.
    pub const CONTENT_TYPES: &'static [&'static str] = &[
        "application/json",
        "application/x-javascript",
        "text/javascript",
        "text/x-javascript",
        "text/x-json",
    ];
}

impl Codec for JsonCodec {
    fn key(&self) -> &str {
        "json"
    }

    fn content_type(&self) -> &str {
        Self::CONTENT_TYPES[0]
    }

    fn content_types(&self) -> Vec<&str> {
        Self::CONTENT_TYPES.to_vec()
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode {
            content_type: self.content_type().to_string(),
            reason: e.to_string(),
        })
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(body).map_err(|e| CodecError::Decode {
            content_type: self.content_type().to_string(),
            reason: e.to_string(),
        })
    }
}

/// YAML codec backed by `serde_yaml`.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn key(&self) -> &str {
        "yaml"
    }

    fn content_type(&self) -> &str {
        "text/yaml"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| CodecError::Encode {
                content_type: self.content_type().to_string(),
                reason: e.to_string(),
            })
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        serde_yaml::from_slice(body).map_err(|e| CodecError::Decode {
            content_type: self.content_type().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_codec_identity() {
        assert_eq!(JsonCodec.key(), "json");
        assert_eq!(JsonCodec.content_type(), "application/json");
        assert!(JsonCodec.content_types().contains(&"text/x-json"));
    }

    #[test]
    fn test_json_decode_error() {
        let result = JsonCodec.decode(b"{not json");
        assert!(matches!(
            result,
            Err(CodecError::Decode { content_type, .. }) if content_type == "application/json"
        ));
    }

    #[test]
    fn test_yaml_codec_decodes_documents() {
        let value = YamlCodec.decode(b"name: slumber\ntags:\n  - rest\n  - client\n").unwrap();
        assert_eq!(value, json!({"name": "slumber", "tags": ["rest", "client"]}));
    }

    #[test]
    fn test_yaml_codec_encodes_mapping() {
        let body = YamlCodec.encode(&json!({"id": 3})).unwrap();
        assert_eq!(String::from_utf8(body).unwrap().trim(), "id: 3");
    }

    #[test]
    fn test_yaml_default_content_types() {
        assert_eq!(YamlCodec.content_types(), vec!["text/yaml"]);
    }

    #[test]
    fn test_not_available_message() {
        let error = CodecError::NotAvailable {
            content_type: "text/plain".to_string(),
        };
        assert_eq!(error.to_string(), "No codec available for 'text/plain'");
    }
}
