//! Priority resolution and the ambiguity predicate.
//!
//! Priority is fixed: ERROR > PATH > CONTEXT > ARCH, and a turn with no
//! signal is SILENT. A menu is offered only when the turn is structurally
//! ambiguous (see [`is_ambiguous`]); every other multi-signal turn takes
//! the highest-priority signal without asking.

use tracing::debug;

use maeum_types::{Action, Signal, SignalKind};

/// Kind pairs that read plausibly as either action.
const CONFUSABLE: &[(SignalKind, SignalKind)] = &[
    (SignalKind::Path, SignalKind::Arch),
    (SignalKind::Context, SignalKind::Arch),
    (SignalKind::Error, SignalKind::Path),
];

fn confusable(a: SignalKind, b: SignalKind) -> bool {
    CONFUSABLE
        .iter()
        .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
}

/// Whether the turn needs a clarify menu.
///
/// True iff two signals of different kinds form a confusable pair and
/// their evidence spans overlap, i.e. the same characters support both
/// readings. A stack trace that also looks like a listing, or a path
/// that mentions a phase word, is not ambiguous.
pub fn is_ambiguous(signals: &[Signal]) -> bool {
    signals.iter().enumerate().any(|(i, a)| {
        signals[i + 1..]
            .iter()
            .any(|b| a.kind != b.kind && confusable(a.kind, b.kind) && a.overlaps(b))
    })
}

/// Outcome of resolving one turn's signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One action, and the signal that chose it (none for SILENT).
    Act {
        action: Action,
        signal: Option<Signal>,
    },
    /// Structurally ambiguous: ask the user.
    Clarify,
}

impl Resolution {
    pub fn action(&self) -> Action {
        match self {
            Resolution::Act { action, .. } => *action,
            Resolution::Clarify => Action::Clarify,
        }
    }
}

/// The highest-priority signal, if any.
pub fn highest(signals: &[Signal]) -> Option<&Signal> {
    signals.iter().max_by_key(|s| s.kind)
}

/// Deterministic pick for a turn's signal set.
pub fn resolve(signals: &[Signal]) -> Resolution {
    if is_ambiguous(signals) {
        debug!(signals = signals.len(), "ambiguous turn");
        return Resolution::Clarify;
    }
    let resolution = match highest(signals) {
        Some(signal) => Resolution::Act {
            action: signal.kind.action(),
            signal: Some(signal.clone()),
        },
        None => Resolution::Act {
            action: Action::Silent,
            signal: None,
        },
    };
    debug!(action = %resolution.action(), signals = signals.len(), "turn resolved");
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::SignalDetector;
    use maeum_types::Phase;

    fn sig(kind: SignalKind, span: std::ops::Range<usize>) -> Signal {
        Signal::new(kind, span)
    }

    #[test]
    fn no_signals_is_silent() {
        assert_eq!(resolve(&[]).action(), Action::Silent);
    }

    #[test]
    fn single_signal_maps_directly() {
        for kind in [
            SignalKind::Error,
            SignalKind::Path,
            SignalKind::Context,
            SignalKind::Arch,
        ] {
            assert_eq!(resolve(&[sig(kind, 0..3)]).action(), kind.action());
        }
    }

    #[test]
    fn priority_law_without_ambiguity() {
        // Disjoint spans: never ambiguous, the maximum wins.
        let all = [
            sig(SignalKind::Arch, 0..2),
            sig(SignalKind::Context, 3..5),
            sig(SignalKind::Path, 6..8),
            sig(SignalKind::Error, 9..11),
        ];
        for mask in 1u8..16 {
            let subset: Vec<Signal> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| s.clone())
                .collect();
            let max = subset.iter().map(|s| s.kind).max().unwrap();
            assert!(!is_ambiguous(&subset));
            assert_eq!(resolve(&subset).action(), max.action(), "mask {mask}");
        }
    }

    #[test]
    fn overlapping_confusable_pair_is_ambiguous() {
        let signals = [sig(SignalKind::Path, 4..20), sig(SignalKind::Arch, 0..20)];
        assert!(is_ambiguous(&signals));
        assert_eq!(resolve(&signals), Resolution::Clarify);
    }

    #[test]
    fn overlapping_non_confusable_pair_resolves() {
        // error + arch: a stack trace that also looks like a listing
        let signals = [sig(SignalKind::Error, 0..9), sig(SignalKind::Arch, 0..40)];
        assert!(!is_ambiguous(&signals));
        assert_eq!(resolve(&signals).action(), Action::ErrorCut);

        // path + context are never confused
        let signals = [sig(SignalKind::Path, 0..20), sig(SignalKind::Context, 4..10)];
        assert_eq!(resolve(&signals).action(), Action::PathJudge);
    }

    #[test]
    fn disjoint_confusable_pair_resolves() {
        let signals = [sig(SignalKind::Error, 0..9), sig(SignalKind::Path, 10..30)];
        assert_eq!(resolve(&signals).action(), Action::ErrorCut);
    }

    #[test]
    fn winning_signal_is_carried() {
        let ctx = Signal::context(Phase::Refactor, 0..8);
        match resolve(&[ctx.clone()]) {
            Resolution::Act { signal, .. } => assert_eq!(signal, Some(ctx)),
            other => panic!("unexpected {other:?}"),
        }
    }

    // ── Through the detector ────────────────────────────────────────

    fn action_for(text: &str) -> Action {
        resolve(&SignalDetector::new().detect(text)).action()
    }

    #[test]
    fn decorated_path_line_asks() {
        assert_eq!(action_for("├── src/user/user.service.ts"), Action::Clarify);
    }

    #[test]
    fn error_named_file_asks() {
        assert_eq!(action_for("src/errors/TypeError.ts"), Action::Clarify);
    }

    #[test]
    fn tree_with_phase_folder_asks() {
        assert_eq!(action_for("├── refactor\n└── main.ts"), Action::Clarify);
    }

    #[test]
    fn plain_turns_resolve() {
        assert_eq!(action_for("src/user/user.controller.ts"), Action::PathJudge);
        assert_eq!(action_for("TypeError: x is undefined"), Action::ErrorCut);
        assert_eq!(action_for("지금 MVP 빠르게"), Action::ContextSet);
        assert_eq!(action_for("."), Action::ArchSnapshot);
        assert_eq!(action_for("what is a monad?"), Action::Silent);
    }

    #[test]
    fn trace_with_frame_paths_is_error() {
        let text = "Traceback (most recent call last):\n  File \"app/api/users.py\", line 3\napp/api/users.py\napp/services/user_service.py\nKeyError: 'id'";
        assert_eq!(action_for(text), Action::ErrorCut);
    }
}
