//! URL path joining for resource traversal.
//!
//! Every resource URL is produced by [`url_join`], which splits a base URL
//! into scheme, authority, path, query and fragment, appends segments to
//! the path with POSIX joining rules and reassembles the result.
//!
//! # Text and byte URLs
//!
//! A base URL is either text or a raw byte sequence ([`UrlRef`]). The joined
//! URL keeps the representation of its base:
//!
//! - Text bases accept text segments as-is; byte segments must be ASCII.
//! - Byte bases accept only ASCII segments, text or bytes. The base's own
//!   encoding is unknown, so nothing else can be appended safely.
//! - Byte bases may contain any byte value. They are parsed as Latin-1,
//!   which maps each byte to one char, and re-encoded the same way, so
//!   non-ASCII path bytes survive the round trip exactly.
//!
//! # Example
//!
//! ```rust
//! use slumber::rest::{url_join, UrlRef};
//!
//! let url = url_join("http://example.com", ["users", "1"]).unwrap();
//! assert_eq!(url, "http://example.com/users/1");
//!
//! let url = url_join(&b"http://example.com/r\xc7\x9d"[..], ["test"]).unwrap();
//! assert_eq!(url, UrlRef::Bytes(b"http://example.com/r\xc7\x9d/test".to_vec()));
//! ```

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Errors raised while joining URL segments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A segment cannot be reconciled with the base URL's representation.
    #[error("Can't mix non-ASCII bytes and strings in URL paths: '{segment}'")]
    EncodingMismatch {
        /// The offending segment, lossily decoded for display.
        segment: String,
    },

    /// A byte URL is not valid UTF-8 and cannot be sent.
    #[error("URL is not valid UTF-8: '{url}'")]
    NonUtf8Url {
        /// The URL, lossily decoded for display.
        url: String,
    },
}

/// A URL held either as text or as raw bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum UrlRef {
    /// A text URL.
    Text(String),
    /// A byte URL of unknown encoding.
    Bytes(Vec<u8>),
}

impl UrlRef {
    /// Returns `true` if the URL ends with `/`.
    #[must_use]
    pub fn ends_with_slash(&self) -> bool {
        match self {
            Self::Text(url) => url.ends_with('/'),
            Self::Bytes(url) => url.ends_with(b"/"),
        }
    }

    /// Returns the URL with a trailing `/`, unless it already has one.
    #[must_use]
    pub fn with_trailing_slash(&self) -> Self {
        if self.ends_with_slash() {
            return self.clone();
        }
        match self {
            Self::Text(url) => Self::Text(format!("{url}/")),
            Self::Bytes(url) => {
                let mut url = url.clone();
                url.push(b'/');
                Self::Bytes(url)
            }
        }
    }

    /// Returns the URL as text for the transport.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NonUtf8Url`] for a byte URL that is not UTF-8.
    pub fn to_request_url(&self) -> Result<Cow<'_, str>, PathError> {
        match self {
            Self::Text(url) => Ok(Cow::Borrowed(url)),
            Self::Bytes(url) => std::str::from_utf8(url).map(Cow::Borrowed).map_err(|_| {
                PathError::NonUtf8Url {
                    url: String::from_utf8_lossy(url).into_owned(),
                }
            }),
        }
    }
}

impl fmt::Display for UrlRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(url) => f.write_str(url),
            Self::Bytes(url) => f.write_str(&String::from_utf8_lossy(url)),
        }
    }
}

impl fmt::Debug for UrlRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(url) => write!(f, "Text({url:?})"),
            Self::Bytes(url) => write!(f, "Bytes(b\"{}\")", url.escape_ascii()),
        }
    }
}

impl From<&str> for UrlRef {
    fn from(url: &str) -> Self {
        Self::Text(url.to_string())
    }
}

impl From<String> for UrlRef {
    fn from(url: String) -> Self {
        Self::Text(url)
    }
}

impl From<&String> for UrlRef {
    fn from(url: &String) -> Self {
        Self::Text(url.clone())
    }
}

impl From<&[u8]> for UrlRef {
    fn from(url: &[u8]) -> Self {
        Self::Bytes(url.to_vec())
    }
}

impl From<Vec<u8>> for UrlRef {
    fn from(url: Vec<u8>) -> Self {
        Self::Bytes(url)
    }
}

impl From<&Self> for UrlRef {
    fn from(url: &Self) -> Self {
        url.clone()
    }
}

impl PartialEq<&str> for UrlRef {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Self::Text(url) if url == other)
    }
}

impl PartialEq<&[u8]> for UrlRef {
    fn eq(&self, other: &&[u8]) -> bool {
        matches!(self, Self::Bytes(url) if url.as_slice() == *other)
    }
}

/// One path segment appended by [`url_join`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A text segment.
    Text(String),
    /// A byte segment. Must be ASCII to be joined.
    Bytes(Vec<u8>),
}

impl Segment {
    /// Returns the segment as text, provided it is ASCII.
    fn ascii(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => s.is_ascii().then_some(Cow::Borrowed(s.as_str())),
            Self::Bytes(b) => std::str::from_utf8(b)
                .ok()
                .filter(|s| s.is_ascii())
                .map(Cow::Borrowed),
        }
    }

    /// Returns the segment as text for joining onto a text base.
    fn for_text_base(&self) -> Result<Cow<'_, str>, PathError> {
        match self {
            Self::Text(s) => Ok(Cow::Borrowed(s.as_str())),
            Self::Bytes(_) => self.ascii().ok_or_else(|| self.mismatch()),
        }
    }

    /// Returns the segment as text for joining onto a byte base.
    fn for_byte_base(&self) -> Result<Cow<'_, str>, PathError> {
        self.ascii().ok_or_else(|| self.mismatch())
    }

    fn mismatch(&self) -> PathError {
        PathError::EncodingMismatch {
            segment: match self {
                Self::Text(s) => s.clone(),
                Self::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            },
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Segment {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Segment {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<&[u8]> for Segment {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Segment {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&Self> for Segment {
    fn from(segment: &Self) -> Self {
        segment.clone()
    }
}

macro_rules! segment_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Segment {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

segment_from_display!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char);

/// The five components of a URL, as produced by `urlsplit`-style parsing.
#[derive(Debug, PartialEq, Eq)]
struct UrlParts<'a> {
    scheme: &'a str,
    /// Whether `//` followed the scheme, even with an empty netloc.
    has_authority: bool,
    netloc: &'a str,
    path: &'a str,
    query: &'a str,
    fragment: &'a str,
}

impl<'a> UrlParts<'a> {
    fn split(url: &'a str) -> Self {
        let (scheme, rest) = match url.find(':') {
            Some(idx) if is_scheme(&url[..idx]) => (&url[..idx], &url[idx + 1..]),
            _ => ("", url),
        };

        let (has_authority, netloc, rest) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find(|c| matches!(c, '/' | '?' | '#')).unwrap_or(after.len());
                (true, &after[..end], &after[end..])
            }
            None => (false, "", rest),
        };

        let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        Self {
            scheme,
            has_authority,
            netloc,
            path,
            query,
            fragment,
        }
    }

    fn unsplit(&self, path: &str) -> String {
        let mut url = String::with_capacity(
            self.scheme.len() + self.netloc.len() + path.len() + self.query.len() + 8,
        );

        if !self.scheme.is_empty() {
            url.push_str(&self.scheme.to_ascii_lowercase());
            url.push(':');
        }
        if self.has_authority || !self.netloc.is_empty() {
            url.push_str("//");
            url.push_str(self.netloc);
            if !path.is_empty() && !path.starts_with('/') {
                url.push('/');
            }
        }
        url.push_str(path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(self.query);
        }
        if !self.fragment.is_empty() {
            url.push('#');
            url.push_str(self.fragment);
        }
        url
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Appends segments with POSIX joining rules.
///
/// A segment starting with `/` replaces everything before it.
fn join_path<'s>(path: &str, segments: impl IntoIterator<Item = &'s str>) -> String {
    let mut joined = path.to_string();
    for segment in segments {
        if segment.starts_with('/') {
            joined = segment.to_string();
        } else if joined.is_empty() || joined.ends_with('/') {
            joined.push_str(segment);
        } else {
            joined.push('/');
            joined.push_str(segment);
        }
    }
    joined
}

fn join_text(base: &str, segments: &[Cow<'_, str>]) -> String {
    let parts = UrlParts::split(base);
    let path = if parts.path.is_empty() { "/" } else { parts.path };
    let path = join_path(path, segments.iter().map(AsRef::as_ref));
    parts.unsplit(&path)
}

fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn latin1_encode(text: &str) -> Vec<u8> {
    // Every char came from a Latin-1 decode or an ASCII segment.
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Joins a base URL with any number of path segments.
///
/// An empty base path becomes `/`, so joining with no segments normalizes
/// the URL. The result has the same representation (text or bytes) as
/// `base`.
///
/// # Errors
///
/// Returns [`PathError::EncodingMismatch`] when a segment cannot be
/// represented in the base's encoding: a non-ASCII byte segment, or a
/// non-ASCII text segment joined onto a byte base.
///
/// # Example
///
/// ```rust
/// use slumber::rest::url_join;
///
/// assert_eq!(url_join("http://example.com", [""; 0]).unwrap(), "http://example.com/");
/// assert_eq!(url_join("http://example.com/", ["test/"]).unwrap(), "http://example.com/test/");
/// assert_eq!(url_join("http://example.com/a/b", ["/c"]).unwrap(), "http://example.com/c");
/// ```
pub fn url_join<I, S>(base: impl Into<UrlRef>, segments: I) -> Result<UrlRef, PathError>
where
    I: IntoIterator<Item = S>,
    S: Into<Segment>,
{
    let segments: Vec<Segment> = segments.into_iter().map(Into::into).collect();

    match base.into() {
        UrlRef::Text(base) => {
            let segments = segments
                .iter()
                .map(Segment::for_text_base)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(UrlRef::Text(join_text(&base, &segments)))
        }
        UrlRef::Bytes(base) => {
            let segments = segments
                .iter()
                .map(Segment::for_byte_base)
                .collect::<Result<Vec<_>, _>>()?;
            let joined = join_text(&latin1_decode(&base), &segments);
            Ok(UrlRef::Bytes(latin1_encode(&joined)))
        }
    }
}
