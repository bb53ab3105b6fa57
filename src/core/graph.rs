//! Immutable state graph.
//!
//! The graph is an arena of [`StateNode`]s keyed by state identity. Parents
//! are stored as keys and children as ordered key lists; the graph owns every
//! node and nodes never own each other.

use super::action::{StateAction, TransitionAction};
use super::guard::Guard;
use super::state::{EventId, StateId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How a composite state is re-entered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryPolicy {
    /// Always re-enter through the initial substate.
    #[default]
    None,
    /// Restore the last active direct substate, then follow initial substates.
    Shallow,
    /// Restore the whole nested configuration that was last active.
    Deep,
}

impl HistoryPolicy {
    pub fn remembers(self) -> bool {
        !matches!(self, HistoryPolicy::None)
    }
}

/// Whether a transition leaves and re-enters states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    External,
    /// Runs transition actions only; no state is exited or entered.
    Internal,
}

/// A candidate reaction of a state to an event.
pub struct Transition<S: StateId, A> {
    pub source: S,
    pub target: S,
    pub kind: TransitionKind,
    pub guard: Option<Guard<A>>,
    pub actions: Vec<TransitionAction<A>>,
}

impl<S: StateId, A> Transition<S, A> {
    /// Check whether the guard (if any) accepts the payload.
    pub fn accepts(&self, payload: &A) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(payload))
    }

    pub fn is_internal(&self) -> bool {
        self.kind == TransitionKind::Internal
    }
}

impl<S: StateId, A> Clone for Transition<S, A> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            target: self.target.clone(),
            kind: self.kind,
            guard: self.guard.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<S: StateId, A> fmt::Debug for Transition<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("guarded", &self.guard.is_some())
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// A single state in the graph.
pub struct StateNode<S: StateId, E: EventId, A> {
    pub(crate) key: S,
    pub(crate) parent: Option<S>,
    pub(crate) children: Vec<S>,
    pub(crate) initial: Option<S>,
    pub(crate) history: HistoryPolicy,
    pub(crate) entry_actions: Vec<StateAction>,
    pub(crate) exit_actions: Vec<StateAction>,
    pub(crate) transitions: HashMap<E, Vec<Transition<S, A>>>,
}

impl<S: StateId, E: EventId, A> StateNode<S, E, A> {
    pub(crate) fn new(key: S) -> Self {
        Self {
            key,
            parent: None,
            children: Vec::new(),
            initial: None,
            history: HistoryPolicy::None,
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            transitions: HashMap::new(),
        }
    }

    pub fn key(&self) -> &S {
        &self.key
    }

    pub fn parent(&self) -> Option<&S> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[S] {
        &self.children
    }

    pub fn initial(&self) -> Option<&S> {
        self.initial.as_ref()
    }

    pub fn history(&self) -> HistoryPolicy {
        self.history
    }

    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn entry_actions(&self) -> &[StateAction] {
        &self.entry_actions
    }

    pub fn exit_actions(&self) -> &[StateAction] {
        &self.exit_actions
    }

    /// Candidate transitions for an event, in declaration order.
    pub fn transitions_for(&self, event: &E) -> &[Transition<S, A>] {
        self.transitions
            .get(event)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Substate used when no history applies: the declared initial substate,
    /// or the first declared substate for history composites without one.
    pub fn default_child(&self) -> Option<&S> {
        self.initial.as_ref().or_else(|| self.children.first())
    }
}

impl<S: StateId, E: EventId, A> fmt::Debug for StateNode<S, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("initial", &self.initial)
            .field("history", &self.history)
            .field("entry_actions", &self.entry_actions.len())
            .field("exit_actions", &self.exit_actions.len())
            .field("events", &self.transitions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Immutable tree of states produced by
/// [`StateGraphBuilder`](crate::builder::StateGraphBuilder).
pub struct StateGraph<S: StateId, E: EventId, A = ()> {
    nodes: HashMap<S, StateNode<S, E, A>>,
    roots: Vec<S>,
}

impl<S: StateId, E: EventId, A> StateGraph<S, E, A> {
    /// Assemble a graph from nodes whose links have already been validated.
    pub(crate) fn from_parts(nodes: HashMap<S, StateNode<S, E, A>>, roots: Vec<S>) -> Self {
        Self { nodes, roots }
    }

    pub fn node(&self, state: &S) -> Option<&StateNode<S, E, A>> {
        self.nodes.get(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.nodes.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level states (children of the implicit super-root).
    pub fn roots(&self) -> &[S] {
        &self.roots
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.nodes.keys()
    }

    pub fn parent(&self, state: &S) -> Option<&S> {
        self.nodes.get(state).and_then(StateNode::parent)
    }

    pub fn is_composite(&self, state: &S) -> bool {
        self.nodes.get(state).is_some_and(StateNode::is_composite)
    }

    /// The state followed by its ancestors, innermost first.
    pub fn path_to_root(&self, state: &S) -> Vec<S> {
        let mut path = Vec::new();
        let mut cursor = Some(state.clone());
        while let Some(current) = cursor {
            cursor = self.parent(&current).cloned();
            path.push(current);
        }
        path
    }

    /// Ancestors followed by the state itself, outermost first.
    pub fn path_from_root(&self, state: &S) -> Vec<S> {
        let mut path = self.path_to_root(state);
        path.reverse();
        path
    }

    /// Number of ancestors above the state; top-level states have depth 0.
    pub fn depth(&self, state: &S) -> usize {
        self.path_to_root(state).len().saturating_sub(1)
    }

    /// True if `ancestor` is a proper ancestor of `state`.
    pub fn is_ancestor(&self, ancestor: &S, state: &S) -> bool {
        let mut cursor = self.parent(state);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// True if any proper ancestor of the state uses deep history.
    pub fn has_deep_ancestor(&self, state: &S) -> bool {
        let mut cursor = self.parent(state);
        while let Some(current) = cursor {
            if self
                .node(current)
                .is_some_and(|n| n.history == HistoryPolicy::Deep)
            {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

impl<S: StateId, E: EventId, A> fmt::Debug for StateGraph<S, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("roots", &self.roots)
            .field("states", &self.nodes.len())
            .finish()
    }
}
