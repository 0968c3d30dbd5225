//! # Slumber
//!
//! A dynamic REST API client. Chained names become URL path segments, and
//! HTTP verbs on the resulting resource send requests whose bodies are
//! encoded and decoded according to the negotiated content type.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Api`], the root of a resource tree, configured through [`ApiBuilder`]
//! - [`Resource`], an immutable node that derives children and sends requests
//! - [`url_join`](rest::url_join), URL path joining for text and byte URLs
//! - [`FormatRegistry`](serialize::FormatRegistry) with JSON and YAML codecs
//! - [`HttpSession`], the default reqwest-backed [`Transport`]
//!
//! ## Quick Start
//!
//! ```rust
//! use slumber::{Api, ResourceAttributes};
//!
//! let api = Api::new("http://api.example.com/").unwrap();
//!
//! // Nodes are derived, never mutated
//! let user = api.child("users").unwrap().id(1).unwrap();
//! assert_eq!(user.url().to_string(), "http://api.example.com/users/1");
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use slumber::{Api, Credentials, ResourceAttributes};
//! use serde_json::json;
//!
//! let api = Api::builder()
//!     .base_url("https://api.example.com/")
//!     .auth(Credentials::basic("user", Some("password")))
//!     .build()?;
//!
//! // GET https://api.example.com/users/1/
//! let user = api.child("users")?.id(1)?.get(None).await?;
//!
//! // POST https://api.example.com/users/
//! let created = api.child("users")?.post(Some(json!({"name": "ada"})), None).await?;
//!
//! // DELETE https://api.example.com/users/1/
//! let deleted: bool = api.child("users")?.id(1)?.delete(None).await?;
//! ```
//!
//! ## Status Handling
//!
//! 4xx responses fail with [`HttpError::Client`], 5xx with
//! [`HttpError::Server`]. Other non-2xx statuses are not errors: `get`,
//! `post` and `patch` return `None`, `put` returns
//! [`PutOutcome::NotUpdated`] and `delete` returns `false`.
//! Redirects are never followed automatically; see
//! [`Resource::handle_redirect`].
//!
//! ## Design Principles
//!
//! - **Immutable nodes**: Every derivation builds a new configuration snapshot
//! - **Shared backend**: One transport session and one registry per root
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
pub mod serialize;

pub use api::{Api, ApiBuilder};
pub use auth::Credentials;
pub use config::ResourceConfig;
pub use error::{ConfigError, Error, Result};

// Re-export transport types
pub use clients::{
    FilePart, HttpError, HttpMethod, HttpResponse, HttpResponseError, HttpSession, Transport,
    TransportRequest,
};

// Re-export resource types
pub use rest::{Payload, PutOutcome, Query, Refinement, Resource, ResourceAttributes, UrlRef};
