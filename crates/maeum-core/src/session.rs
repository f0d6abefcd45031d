//! One interactive session.
//!
//! A [`Session`] owns its context store and the pending clarify turn.
//! Sessions may share a [`Dispatcher`] but never share state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use maeum_types::session::SessionInfo;
use maeum_types::{Action, ContextState, Phase, Result, Signal};

use crate::clarify::{parse_selection, render_menu};
use crate::context_store::ContextStore;
use crate::dispatcher::{Dispatcher, TurnOutcome, TurnOutput};
use crate::resolver::Resolution;

/// A turn parked behind the clarify menu.
#[derive(Debug, Clone)]
struct PendingTurn {
    text: String,
    signals: Vec<Signal>,
}

pub struct Session {
    info: SessionInfo,
    store: ContextStore,
    dispatcher: Arc<Dispatcher>,
    pending: Option<PendingTurn>,
}

impl Session {
    pub fn new(dispatcher: Arc<Dispatcher>, note_limit: usize) -> Self {
        let info = SessionInfo::new();
        debug!(session = info.short_id(), "session started");
        Self {
            info,
            store: ContextStore::new(note_limit),
            dispatcher,
            pending: None,
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn state(&self) -> ContextState {
        self.store.state()
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Explicit CONTEXT_SET, bypassing detection.
    pub fn set_phase(&mut self, phase: Phase, text: &str) {
        self.store.set_phase(phase, text);
    }

    /// The menu to show again while a selection is outstanding.
    pub fn pending_menu(&self) -> Option<String> {
        self.pending.as_ref().map(|_| render_menu())
    }

    /// Classify and dispatch one turn.
    ///
    /// While a clarify menu is outstanding the turn is read as the
    /// selection instead.
    ///
    /// # Errors
    ///
    /// [`MaeumError::BadSelection`](maeum_types::MaeumError::BadSelection)
    /// for an invalid selection (the menu stays pending), otherwise
    /// whatever the dispatched action fails with. No error ends the session.
    pub async fn handle_turn(&mut self, text: &str, cancel: &CancellationToken) -> Result<TurnOutcome> {
        if let Some(pending) = &self.pending {
            let action = parse_selection(text)?;
            let PendingTurn { text, signals } = pending.clone();
            self.pending = None;
            debug!(session = self.info.short_id(), %action, "clarify resolved");
            return self
                .dispatcher
                .execute(action, &text, &signals, &mut self.store, cancel)
                .await;
        }

        let (signals, resolution) = self.dispatcher.classify(text);
        match resolution {
            Resolution::Clarify => {
                self.pending = Some(PendingTurn {
                    text: text.to_string(),
                    signals,
                });
                Ok(TurnOutcome {
                    action: Action::Clarify,
                    output: TurnOutput::Menu(render_menu()),
                })
            }
            Resolution::Act { action, .. } => {
                self.dispatcher
                    .execute(action, text, &signals, &mut self.store, cancel)
                    .await
            }
        }
    }
}
