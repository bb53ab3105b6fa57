//! Builder for the behavior of a single state.

use crate::builder::transition::TransitionBuilder;
use crate::core::{state_action, ActionEffect, ActionError, EventId, StateAction, StateId};
use std::sync::Arc;
use std::future::Future;

/// Declares entry actions, exit actions and transitions of one state.
///
/// Several builders for the same state are merged in declaration order.
///
/// # Example
///
/// ```
/// use statecraft::builder::{StateBuilder, TransitionBuilder};
///
/// let door = StateBuilder::<&str, &str, ()>::new("Open")
///     .on_entry(|| async { Ok(()) })
///     .on_exit(|| async { Ok(()) })
///     .transition(TransitionBuilder::on("close").goto("Closed"));
///
/// assert_eq!(door.key(), &"Open");
/// ```
pub struct StateBuilder<S: StateId, E: EventId, A> {
    pub(crate) state: S,
    pub(crate) entry_actions: Vec<StateAction>,
    pub(crate) exit_actions: Vec<StateAction>,
    pub(crate) transitions: Vec<TransitionBuilder<S, E, A>>,
}

impl<S: StateId, E: EventId, A: 'static> StateBuilder<S, E, A> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Append an async action run whenever the state is entered.
    pub fn on_entry<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.entry_actions.push(state_action(action));
        self
    }

    /// Append an async action run whenever the state is exited.
    pub fn on_exit<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.exit_actions.push(state_action(action));
        self
    }

    /// Append an entry action that builds a Stillwater effect.
    pub fn on_entry_effect<F>(mut self, effect: F) -> Self
    where
        F: Fn() -> ActionEffect + Send + Sync + 'static,
    {
        self.entry_actions.push(Arc::new(effect));
        self
    }

    pub fn on_exit_effect<F>(mut self, effect: F) -> Self
    where
        F: Fn() -> ActionEffect + Send + Sync + 'static,
    {
        self.exit_actions.push(Arc::new(effect));
        self
    }

    /// Add a candidate transition. Candidates for the same event are tried
    /// in the order they are added.
    pub fn transition(mut self, transition: TransitionBuilder<S, E, A>) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn key(&self) -> &S {
        &self.state
    }
}
