//! History memory for composite states.
//!
//! Each composite state may remember the substate that was active when it was
//! last exited. The memory is written while an exit chain is processed and
//! consulted whenever a composite is entered.

use super::graph::{HistoryPolicy, StateGraph};
use super::state::{EventId, StateId};
use std::collections::HashMap;

/// How the substates below a composite are chosen while entering it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Descent {
    /// Apply each composite's own history policy.
    Default,
    /// Follow initial substates, ignoring memory.
    Initial,
    /// Follow memory at every level, falling back to initial substates.
    Memory,
}

/// Per-composite record of the last active substate.
///
/// Owned exclusively by one machine instance and never shared between
/// instances. Reading never fails; a missing entry means "use the initial
/// substate".
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{HierarchyBuilder, StateGraphBuilder};
/// use statecraft::core::{HistoryMemory, HistoryPolicy, StateGraph};
///
/// let graph: StateGraph<&str, &str> = StateGraphBuilder::new()
///     .hierarchy(
///         HierarchyBuilder::on("Player")
///             .history(HistoryPolicy::Shallow)
///             .initial("Stopped")
///             .substate("Playing"),
///     )
///     .build()
///     .unwrap();
///
/// let mut memory = HistoryMemory::new();
/// assert_eq!(memory.resolve_entry(&graph, &"Player"), vec!["Stopped"]);
///
/// memory.record_exit_chain(&graph, &["Playing", "Player"]);
/// assert_eq!(memory.resolve_entry(&graph, &"Player"), vec!["Playing"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryMemory<S: StateId> {
    last_active: HashMap<S, S>,
}

impl<S: StateId> Default for HistoryMemory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId> HistoryMemory<S> {
    pub fn new() -> Self {
        Self {
            last_active: HashMap::new(),
        }
    }

    /// Last active substate remembered for a composite.
    pub fn get(&self, state: &S) -> Option<&S> {
        self.last_active.get(state)
    }

    pub fn len(&self) -> usize {
        self.last_active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_active.is_empty()
    }

    pub fn entries(&self) -> &HashMap<S, S> {
        &self.last_active
    }

    /// Remember `active_child` as the last active substate of `state`.
    ///
    /// Only composites with a history policy record, plus composites nested
    /// under a deep-history ancestor so the full configuration can be
    /// restored. Returns whether anything was written.
    pub fn record_exit<E: EventId, A>(
        &mut self,
        graph: &StateGraph<S, E, A>,
        state: &S,
        active_child: &S,
    ) -> bool {
        let Some(node) = graph.node(state) else {
            return false;
        };
        if !node.is_composite() {
            return false;
        }
        if !node.history().remembers() && !graph.has_deep_ancestor(state) {
            return false;
        }
        self.last_active.insert(state.clone(), active_child.clone());
        true
    }

    /// Record history for every composite in an exit chain.
    ///
    /// The chain is innermost first and starts at the active leaf, so the
    /// active child of each exited composite is the state exited just before
    /// it.
    pub fn record_exit_chain<E: EventId, A>(&mut self, graph: &StateGraph<S, E, A>, chain: &[S]) {
        for pair in chain.windows(2) {
            self.record_exit(graph, &pair[1], &pair[0]);
        }
    }

    /// States entered below `state` until a leaf is reached, outermost first.
    ///
    /// `state` itself is not included. Leaves and unknown states resolve to an
    /// empty descent.
    pub fn resolve_entry<E: EventId, A>(&self, graph: &StateGraph<S, E, A>, state: &S) -> Vec<S> {
        let mut descent = Vec::new();
        let mut mode = Descent::Default;
        let mut cursor = state.clone();

        while let Some(node) = graph.node(&cursor) {
            if !node.is_composite() {
                break;
            }
            let remembered = self.get(&cursor).or_else(|| node.default_child());
            let (child, next_mode) = match mode {
                Descent::Default => match node.history() {
                    HistoryPolicy::None => (node.default_child(), Descent::Default),
                    HistoryPolicy::Shallow => (remembered, Descent::Initial),
                    HistoryPolicy::Deep => (remembered, Descent::Memory),
                },
                Descent::Initial => (node.default_child(), Descent::Initial),
                Descent::Memory => (remembered, Descent::Memory),
            };
            let Some(child) = child.cloned() else {
                break;
            };
            descent.push(child.clone());
            cursor = child;
            mode = next_mode;
        }

        descent
    }
}
