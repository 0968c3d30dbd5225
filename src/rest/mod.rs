//! REST resource traversal.
//!
//! This module turns chained names into URLs and URLs into HTTP exchanges:
//!
//! - [`url_join`]: joins path segments onto a text or byte URL
//! - [`Resource`]: an immutable node with verb methods
//! - [`ResourceAttributes`]: child derivation shared with [`Api`](crate::Api)
//! - [`Refinement`]: id, format and URL overrides for [`Resource::refine`]
//! - [`Payload`]: the decoded or raw body of a successful response
//! - [`PutOutcome`]: whether a PUT was applied, with its body

mod path;
mod resource;
mod response;

pub use path::{url_join, PathError, Segment, UrlRef};
pub use resource::{Query, Refinement, Resource, ResourceAttributes, INTERNAL_PREFIX};
pub use response::{Payload, PutOutcome};
