//! # maeum-types
//!
//! Core type definitions for maeum, a turn classifier that sits in front
//! of a code-assistant backend.
//!
//! This crate is the foundation of the dependency graph. It contains:
//!
//! - **[`error`]** -- [`MaeumError`] and the crate-wide [`Result`]
//! - **[`config`]** -- Configuration schema
//! - **[`context`]** -- Session phase and derived tolerance
//! - **[`role`]** -- File roles and path verdicts
//! - **[`signal`]** -- Detection evidence and resolved actions
//! - **[`session`]** -- Session identity

pub mod config;
pub mod context;
pub mod error;
pub mod role;
pub mod session;
pub mod signal;

pub use context::{ContextState, Phase, Tolerance};
pub use error::{MaeumError, Result};
pub use role::{Decision, Role, Verdict};
pub use signal::{Action, Signal, SignalKind};
