#![allow(clippy::must_use_candidate)]

//! GraphQL request handling for the caching proxy
//!
//! Parses the JSON request body into a [`RequestEnvelope`] and classifies
//! the contained document by operation type. This is not a GraphQL engine:
//! documents are only parsed far enough to tell queries from mutations.

mod classify;
mod request;

pub use classify::{Classification, Operation, OperationKind, classify};
pub use grache_core::RequestEnvelope;
pub use request::{RequestError, parse_request};
