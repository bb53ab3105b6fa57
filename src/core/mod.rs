//! Core hierarchical state machine types and logic.
//!
//! This module contains the pure part of the runtime:
//! - State and event key traits
//! - The immutable state graph with guards and actions as data
//! - History memory for composite states
//! - The transition resolver (LCA, exit and entry chains)
//!
//! Nothing in this module runs an action or spawns a task; the effectful
//! shell lives in [`crate::effects`].

mod action;
mod graph;
mod guard;
mod history;
mod resolver;
mod state;

pub use action::{
    state_action, transition_action, ActionEffect, ActionError, StateAction, TransitionAction,
};
pub use graph::{HistoryPolicy, StateGraph, StateNode, Transition, TransitionKind};
pub use guard::Guard;
pub use history::HistoryMemory;
pub use resolver::{ResolvedTransition, Resolver};
pub use state::{EventId, StateId};
