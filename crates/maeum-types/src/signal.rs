//! Detection evidence and the actions a turn resolves to.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::context::Phase;

/// Evidence category.
///
/// Declared lowest priority first so the derived `Ord` is the priority
/// order: `Error > Path > Context > Arch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Arch,
    Context,
    Path,
    Error,
}

impl SignalKind {
    /// The action a lone signal of this kind resolves to.
    pub fn action(self) -> Action {
        match self {
            SignalKind::Error => Action::ErrorCut,
            SignalKind::Path => Action::PathJudge,
            SignalKind::Context => Action::ContextSet,
            SignalKind::Arch => Action::ArchSnapshot,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalKind::Arch => "arch",
            SignalKind::Context => "context",
            SignalKind::Path => "path",
            SignalKind::Error => "error",
        })
    }
}

/// One piece of evidence found in a turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Byte range of the evidence within the turn text.
    pub span: Range<usize>,
    /// Phase named by the evidence; set only for context signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

impl Signal {
    pub fn new(kind: SignalKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            phase: None,
        }
    }

    pub fn context(phase: Phase, span: Range<usize>) -> Self {
        Self {
            kind: SignalKind::Context,
            span,
            phase: Some(phase),
        }
    }

    /// Whether two evidence spans share at least one byte.
    pub fn overlaps(&self, other: &Signal) -> bool {
        self.span.start < other.span.end && other.span.start < self.span.end
    }
}

/// What a turn resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    ArchSnapshot,
    PathJudge,
    ContextSet,
    ErrorCut,
    Clarify,
    /// No evidence: forward verbatim.
    Silent,
}

impl Action {
    /// Whether the action calls the generation backend.
    pub fn is_forwarded(self) -> bool {
        matches!(self, Action::ErrorCut | Action::Silent)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ArchSnapshot => "ARCH_SNAPSHOT",
            Action::PathJudge => "PATH_JUDGE",
            Action::ContextSet => "CONTEXT_SET",
            Action::ErrorCut => "ERROR_CUT",
            Action::Clarify => "CLARIFY",
            Action::Silent => "SILENT",
        })
    }
}
