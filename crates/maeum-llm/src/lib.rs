//! Generation backend abstraction for maeum.
//!
//! Turns that need free text (error triage and unclassified turns) are
//! forwarded through the [`Generator`] trait. The crate ships one
//! implementation, [`HttpBackend`], which talks to a chat server exposing
//! a JSON chat endpoint and a health endpoint.
//!
//! # Architecture
//!
//! - [`Generator`] defines the `generate(payload) -> text` contract
//! - [`HttpBackend`] implements it over HTTP
//! - [`GenerationRequest`] is the wire payload

pub mod error;
pub mod generator;
pub mod http;
pub mod types;

pub use error::{BackendError, Result};
pub use generator::Generator;
pub use http::HttpBackend;
pub use types::{ErrorContext, GenerationRequest};
