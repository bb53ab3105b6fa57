//! Builder for declaring a superstate and its substates.

use crate::core::{HistoryPolicy, StateId};

/// Declares the substates of one composite state.
///
/// # Example
///
/// ```
/// use statecraft::builder::HierarchyBuilder;
/// use statecraft::core::HistoryPolicy;
///
/// let hierarchy = HierarchyBuilder::on("Player")
///     .history(HistoryPolicy::Deep)
///     .initial("Stopped")
///     .substates(["Playing", "Paused"]);
///
/// assert_eq!(hierarchy.substate_keys(), &["Stopped", "Playing", "Paused"]);
/// ```
#[derive(Clone, Debug)]
pub struct HierarchyBuilder<S: StateId> {
    pub(crate) superstate: S,
    pub(crate) history: HistoryPolicy,
    pub(crate) initials: Vec<S>,
    pub(crate) substates: Vec<S>,
}

impl<S: StateId> HierarchyBuilder<S> {
    /// Start a hierarchy on the given superstate.
    pub fn on(superstate: S) -> Self {
        Self {
            superstate,
            history: HistoryPolicy::None,
            initials: Vec::new(),
            substates: Vec::new(),
        }
    }

    /// Set the history policy (defaults to [`HistoryPolicy::None`]).
    pub fn history(mut self, policy: HistoryPolicy) -> Self {
        self.history = policy;
        self
    }

    /// Add the initial substate. It is also registered as a substate.
    pub fn initial(mut self, state: S) -> Self {
        self.initials.push(state.clone());
        self.substates.push(state);
        self
    }

    /// Add a substate.
    pub fn substate(mut self, state: S) -> Self {
        self.substates.push(state);
        self
    }

    /// Add several substates at once.
    pub fn substates(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.substates.extend(states);
        self
    }

    pub fn superstate(&self) -> &S {
        &self.superstate
    }

    pub fn substate_keys(&self) -> &[S] {
        &self.substates
    }
}
