//! HTTP transport types.
//!
//! This module holds the layer beneath resources: the [`Transport`] seam,
//! the default reqwest-backed [`HttpSession`], and the request, response and
//! error types exchanged across it.
//!
//! # Overview
//!
//! - [`Transport`]: Sends a [`TransportRequest`] and returns an [`HttpResponse`]
//! - [`HttpSession`]: Default transport, shared by every resource of one root
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`FilePart`]: A file attached to a multipart upload
//! - [`HttpError`]: Status classification and network failures
//!
//! Redirects are never followed by the session. Status codes outside the
//! 4xx and 5xx ranges are handed back to the resource layer, which decides
//! what each verb returns.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError};
pub use http_client::{HttpSession, Transport, SDK_VERSION};
pub use http_request::{FilePart, HttpMethod, RequestData, TransportRequest};
pub use http_response::HttpResponse;
