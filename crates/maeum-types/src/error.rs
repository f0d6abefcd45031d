//! Error types for the maeum turn classifier.
//!
//! [`MaeumError`] covers every failure a turn can surface. None of them
//! is fatal to a session: the worst outcome for a turn is a visible
//! failure line, after which the next turn is processed independently.

use thiserror::Error;

/// Top-level error type for maeum.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MaeumError {
    // ── Turn-level (recoverable) ─────────────────────────────────────

    /// A clarify selection was not one of the offered options.
    ///
    /// The same menu is re-rendered; the turn is not dispatched yet.
    #[error("bad selection: {input:?} (expected 1-4)")]
    BadSelection {
        /// The raw selection text, trimmed.
        input: String,
    },

    /// A forwarded turn exceeded its deadline.
    #[error("backend call timed out after {secs}s")]
    Timeout {
        /// The configured deadline, in seconds.
        secs: u64,
    },

    /// The caller aborted a forwarded turn.
    #[error("turn cancelled")]
    Cancelled,

    /// The generation backend failed (network, status, malformed body).
    #[error("backend error: {0}")]
    Backend(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A vocabulary entry is malformed or self-contradictory.
    ///
    /// Raised during validation; the vocabulary skips the entry.
    #[error("invalid pattern {name}: {reason}")]
    InvalidPattern {
        /// Pattern name as declared.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MaeumError {
    /// Whether the error only affects the current turn.
    ///
    /// Configuration and I/O failures are raised at startup; everything
    /// else is reported for one turn and the session continues.
    pub fn is_turn_local(&self) -> bool {
        matches!(
            self,
            Self::BadSelection { .. } | Self::Timeout { .. } | Self::Cancelled | Self::Backend(_)
        )
    }
}

/// Convenience alias used throughout maeum.
pub type Result<T> = std::result::Result<T, MaeumError>;
