//! Session-scoped phase state.
//!
//! The store owns the current [`Phase`]; tolerance is derived on read.
//! The only mutation is [`ContextStore::set_phase`], which is what
//! CONTEXT_SET performs. Every session owns its own store.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::info;

use maeum_types::{ContextState, Phase};

/// One recorded phase declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextNote {
    pub phase: Phase,
    /// The text that declared the phase.
    pub text: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ContextStore {
    phase: Phase,
    notes: VecDeque<ContextNote>,
    note_limit: usize,
}

impl ContextStore {
    /// A fresh store in the default state (MVP/HIGH).
    pub fn new(note_limit: usize) -> Self {
        Self {
            phase: Phase::default(),
            notes: VecDeque::new(),
            note_limit,
        }
    }

    pub fn state(&self) -> ContextState {
        ContextState::from_phase(self.phase)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Transition to `phase` unconditionally and remember the declaration.
    ///
    /// Any phase is reachable from any phase. The oldest note is dropped
    /// once the history reaches its limit.
    pub fn set_phase(&mut self, phase: Phase, text: &str) {
        let from = self.phase;
        self.phase = phase;
        if self.note_limit > 0 {
            if self.notes.len() == self.note_limit {
                self.notes.pop_front();
            }
            self.notes.push_back(ContextNote {
                phase,
                text: text.trim().to_string(),
                at: Utc::now(),
            });
        }
        info!(%from, to = %phase, tolerance = %phase.tolerance(), "context phase set");
    }

    /// Phase declarations, oldest first.
    pub fn notes(&self) -> impl Iterator<Item = &ContextNote> {
        self.notes.iter()
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maeum_types::Tolerance;

    #[test]
    fn starts_at_mvp_high() {
        let store = ContextStore::default();
        assert_eq!(store.state(), ContextState::from_phase(Phase::Mvp));
        assert_eq!(store.state().tolerance, Tolerance::High);
        assert_eq!(store.notes().count(), 0);
    }

    #[test]
    fn any_phase_reachable_from_any_phase() {
        let mut store = ContextStore::default();
        for from in Phase::ALL {
            for to in Phase::ALL {
                store.set_phase(from, "");
                store.set_phase(to, "");
                assert_eq!(store.phase(), to);
                assert_eq!(store.state().tolerance, to.tolerance());
            }
        }
    }

    #[test]
    fn notes_are_bounded() {
        let mut store = ContextStore::new(3);
        for (i, phase) in Phase::ALL.into_iter().enumerate() {
            store.set_phase(phase, &format!("  note {i} "));
        }
        let notes: Vec<_> = store.notes().map(|n| n.text.as_str()).collect();
        assert_eq!(notes, vec!["note 1", "note 2", "note 3"]);
        assert_eq!(store.phase(), Phase::Stabilize);
    }

    #[test]
    fn zero_limit_keeps_no_history() {
        let mut store = ContextStore::new(0);
        store.set_phase(Phase::Refactor, "refactor");
        assert_eq!(store.notes().count(), 0);
        assert_eq!(store.phase(), Phase::Refactor);
    }

    #[test]
    fn stores_are_isolated() {
        let mut a = ContextStore::default();
        let b = ContextStore::default();
        a.set_phase(Phase::Stabilize, "안정화");
        assert_eq!(a.phase(), Phase::Stabilize);
        assert_eq!(b.phase(), Phase::Mvp);
    }
}
