#![allow(clippy::must_use_candidate)]

//! Shared types for the Grache GraphQL caching proxy

mod envelope;
mod error;
pub mod headers;

pub use envelope::RequestEnvelope;
pub use error::HttpError;
pub use headers::*;
