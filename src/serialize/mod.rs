//! Request and response body codecs.
//!
//! A [`Codec`] turns a [`serde_json::Value`] into a wire body and back. The
//! [`FormatRegistry`] finds codecs by format name (`json`, `yaml`) when a
//! request is encoded, and by the response's declared content type when a
//! body is decoded.
//!
//! Built-in codecs:
//!
//! - [`JsonCodec`]: `application/json` (plus legacy JavaScript/JSON types)
//! - [`YamlCodec`]: `text/yaml`

mod codec;
mod registry;

pub use codec::{Codec, CodecError, JsonCodec, YamlCodec};
pub use registry::{FormatRegistry, DEFAULT_FORMAT};
