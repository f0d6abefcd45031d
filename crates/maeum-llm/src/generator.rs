//! The [`Generator`] capability.
//!
//! The classification core never talks HTTP directly; it forwards turns
//! through this trait so tests can inject a deterministic stub.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::GenerationRequest;

/// Something that turns a forwarded turn into free text.
///
/// The main implementation is [`HttpBackend`](crate::http::HttpBackend).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Send the payload and return the backend's answer unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`](crate::error::BackendError) on network
    /// failure, non-success status, timeout or a malformed body.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Check whether the backend is reachable.
    async fn health(&self) -> Result<()> {
        Ok(())
    }
}
