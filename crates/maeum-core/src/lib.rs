//! # maeum-core
//!
//! The per-turn decision engine. Given raw turn text it decides what kind
//! of response is needed before anything is sent to a backend.
//!
//! # Turn pipeline
//!
//! ```text
//! text -> SignalDetector -> resolver --(ambiguous)--> clarify menu
//!                               |                          |
//!                               v                          v
//!                           Dispatcher <--- selection -----+
//!                 local: snapshot | path judge | context set
//!                 forwarded: error cut | silent (Generator)
//! ```
//!
//! # Modules
//!
//! - [`detector`] -- evidence detection over raw text
//! - [`resolver`] -- priority order and the ambiguity predicate
//! - [`clarify`] -- the one-shot menu
//! - [`context_store`] -- session phase and tolerance
//! - [`path_judge`] -- role classification and GO/NO-GO verdicts
//! - [`patterns`] -- the pattern vocabulary
//! - [`graph`] -- semantic graph building and edge inference
//! - [`matcher`] -- pattern scoring against a graph
//! - [`snapshot`] -- the four-line ARCH_SNAPSHOT
//! - [`error_cut`] -- forwarded error payloads
//! - [`input`] -- line-oriented turn buffering
//! - [`tree`] -- project tree sources
//! - [`dispatcher`] -- action execution
//! - [`session`] -- per-session state

pub mod clarify;
pub mod context_store;
pub mod detector;
pub mod dispatcher;
pub mod error_cut;
pub mod graph;
pub mod input;
pub mod matcher;
pub mod path_judge;
pub mod patterns;
pub mod resolver;
pub mod session;
pub mod snapshot;
pub mod tree;

pub use context_store::ContextStore;
pub use detector::SignalDetector;
pub use dispatcher::{Dispatcher, TurnOutcome, TurnOutput};
pub use graph::{FileEntry, SemanticGraph, SemanticGraphBuilder};
pub use input::{InputEvent, TurnBuffer};
pub use path_judge::PathRoleJudge;
pub use patterns::{Pattern, PatternVocabulary};
pub use resolver::{Resolution, resolve};
pub use session::Session;
pub use tree::{StaticTree, TreeSource};
