//! The [`FormatRegistry`] mapping format names and content types to codecs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::serialize::codec::{Codec, CodecError, JsonCodec, YamlCodec};

/// Format used when none is configured.
pub const DEFAULT_FORMAT: &str = "json";

/// Registry of codecs keyed by format name and by content type.
///
/// The registry always holds a default codec, used for requests when a
/// resource does not ask for a specific format.
///
/// # Example
///
/// ```rust
/// use slumber::serialize::FormatRegistry;
///
/// let registry = FormatRegistry::new(Some("yaml")).unwrap();
/// assert_eq!(registry.default_content_type(), "text/yaml");
///
/// let codec = registry.codec_for("application/json; charset=utf-8").unwrap();
/// assert_eq!(codec.key(), "json");
/// ```
#[derive(Clone, Debug)]
pub struct FormatRegistry {
    by_name: HashMap<String, Arc<dyn Codec>>,
    by_content_type: HashMap<String, Arc<dyn Codec>>,
    default: Arc<dyn Codec>,
}

impl FormatRegistry {
    /// Creates a registry with the JSON and YAML codecs.
    ///
    /// `default` names the default format and falls back to `json`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotAvailable`] if `default` names neither
    /// built-in codec.
    pub fn new(default: Option<&str>) -> Result<Self, CodecError> {
        let mut registry = Self::with_codec(Arc::new(JsonCodec));
        registry.register_codec(Arc::new(YamlCodec));
        registry.set_default(default.unwrap_or(DEFAULT_FORMAT))?;
        Ok(registry)
    }

    /// Creates a registry holding a single codec, which becomes the default.
    #[must_use]
    pub fn with_codec(codec: Arc<dyn Codec>) -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
            by_content_type: HashMap::new(),
            default: Arc::clone(&codec),
        };
        registry.register_codec(codec);
        registry
    }

    /// Registers a codec under its format name and all of its content types.
    ///
    /// Replaces any codec previously registered under the same keys.
    pub fn register_codec(&mut self, codec: Arc<dyn Codec>) {
        for content_type in codec.content_types() {
            self.by_content_type
                .insert(normalize(content_type), Arc::clone(&codec));
        }
        if self.default.key() == codec.key() {
            self.default = Arc::clone(&codec);
        }
        self.by_name.insert(codec.key().to_string(), codec);
    }

    /// Installs or replaces the codec for one exact content type.
    pub fn register(&mut self, content_type: &str, codec: Arc<dyn Codec>) {
        self.by_content_type.insert(normalize(content_type), codec);
    }

    /// Makes the named format the default.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotAvailable`] if no codec has that name.
    pub fn set_default(&mut self, format: &str) -> Result<(), CodecError> {
        self.default = self.codec_named(format)?;
        Ok(())
    }

    /// Looks up a codec by content type.
    ///
    /// Parameters such as `; charset=utf-8` are ignored and matching is
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotAvailable`] if nothing is registered for it.
    pub fn codec_for(&self, content_type: &str) -> Result<Arc<dyn Codec>, CodecError> {
        let key = normalize(content_type);
        self.by_content_type
            .get(&key)
            .cloned()
            .ok_or(CodecError::NotAvailable { content_type: key })
    }

    /// Looks up a codec by format name, e.g. `json`.
    ///
    /// A full content type is accepted as well.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotAvailable`] if no codec matches.
    pub fn codec_named(&self, format: &str) -> Result<Arc<dyn Codec>, CodecError> {
        match self.by_name.get(format) {
            Some(codec) => Ok(Arc::clone(codec)),
            None if format.contains('/') => self.codec_for(format),
            None => Err(CodecError::NotAvailable {
                content_type: format.to_string(),
            }),
        }
    }

    /// Returns the default codec.
    #[must_use]
    pub fn default_codec(&self) -> Arc<dyn Codec> {
        Arc::clone(&self.default)
    }

    /// Returns the default format name.
    #[must_use]
    pub fn default_format(&self) -> &str {
        self.default.key()
    }

    /// Returns the content type of the default codec.
    #[must_use]
    pub fn default_content_type(&self) -> &str {
        self.default.content_type()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::with_codec(Arc::new(JsonCodec));
        registry.register_codec(Arc::new(YamlCodec));
        registry
    }
}

fn normalize(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[derive(Debug)]
    struct PlainText;

    impl Codec for PlainText {
        fn key(&self) -> &str {
            "text"
        }

        fn content_type(&self) -> &str {
            "text/plain"
        }

        fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
            Ok(value.as_str().unwrap_or_default().as_bytes().to_vec())
        }

        fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
            Ok(Value::String(String::from_utf8_lossy(body).into_owned()))
        }
    }

    #[test]
    fn test_default_is_json() {
        let registry = FormatRegistry::new(None).unwrap();
        assert_eq!(registry.default_format(), "json");
        assert_eq!(registry.default_content_type(), "application/json");

        let body = registry.default_codec().encode(&serde_json::json!({"id": 1})).unwrap();
        assert_eq!(body, br#"{"id":1}"#);
    }

    #[test]
    fn test_unknown_default_fails() {
        let result = FormatRegistry::new(Some("xml"));
        assert!(matches!(
            result,
            Err(CodecError::NotAvailable { content_type }) if content_type == "xml"
        ));
    }

    #[test]
    fn test_codec_for_strips_parameters() {
        let registry = FormatRegistry::default();
        let codec = registry.codec_for("Text/YAML; charset=utf-8").unwrap();
        assert_eq!(codec.key(), "yaml");
    }

    #[test]
    fn test_codec_for_accepts_json_aliases() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.codec_for("text/javascript").unwrap().key(), "json");
    }

    #[test]
    fn test_codec_for_missing_content_type() {
        let registry = FormatRegistry::default();
        assert!(matches!(
            registry.codec_for("text/plain"),
            Err(CodecError::NotAvailable { content_type }) if content_type == "text/plain"
        ));
    }

    #[test]
    fn test_codec_named_accepts_content_type() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.codec_named("text/yaml").unwrap().key(), "yaml");
        assert!(registry.codec_named("xml").is_err());
    }

    #[test]
    fn test_register_exact_content_type() {
        let mut registry = FormatRegistry::default();
        registry.register("text/plain", Arc::new(PlainText));

        assert_eq!(registry.codec_for("text/plain").unwrap().key(), "text");
        // Only the content type is registered, not the format name.
        assert!(registry.codec_named("text").is_err());
    }

    #[test]
    fn test_register_replaces_existing_content_type() {
        let mut registry = FormatRegistry::default();
        registry.register("application/json", Arc::new(PlainText));
        assert_eq!(registry.codec_for("application/json").unwrap().key(), "text");
    }

    #[test]
    fn test_with_codec_and_set_default() {
        let mut registry = FormatRegistry::with_codec(Arc::new(PlainText));
        assert_eq!(registry.default_content_type(), "text/plain");

        let plain = registry.default_codec();
        assert_eq!(plain.decode(b"hi").unwrap(), Value::String("hi".to_string()));

        registry.register_codec(Arc::new(JsonCodec));
        registry.set_default("json").unwrap();
        assert_eq!(registry.default_format(), "json");
        assert_eq!(registry.default_codec().key(), "json");
        assert!(registry.set_default("xml").is_err());
        assert_eq!(registry.default_codec().key(), "json");
    }
}
