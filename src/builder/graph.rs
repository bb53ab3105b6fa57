//! Builder for constructing state graphs.

use crate::builder::error::BuildError;
use crate::builder::hierarchy::HierarchyBuilder;
use crate::builder::state::StateBuilder;
use crate::builder::validation::validate_hierarchies;
use crate::core::{EventId, StateGraph, StateId, StateNode};
use std::collections::HashMap;
use stillwater::validation::Validation;

/// Builder for constructing a [`StateGraph`] with a fluent API.
///
/// Every state mentioned anywhere (hierarchy, state behavior or transition
/// target) becomes a node. States without a superstate are top-level.
pub struct StateGraphBuilder<S: StateId, E: EventId, A = ()> {
    hierarchies: Vec<HierarchyBuilder<S>>,
    states: Vec<StateBuilder<S, E, A>>,
}

impl<S: StateId, E: EventId, A: 'static> StateGraphBuilder<S, E, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            hierarchies: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Declare the substates of a composite state.
    pub fn hierarchy(mut self, hierarchy: HierarchyBuilder<S>) -> Self {
        self.hierarchies.push(hierarchy);
        self
    }

    /// Declare the behavior of a state.
    pub fn state(mut self, state: StateBuilder<S, E, A>) -> Self {
        self.states.push(state);
        self
    }

    /// Declare the behavior of several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = StateBuilder<S, E, A>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Build the graph.
    ///
    /// Returns every configuration problem found if the hierarchy is invalid.
    pub fn build(self) -> Result<StateGraph<S, E, A>, BuildError<S>> {
        if let Validation::Failure(errors) = validate_hierarchies(&self.hierarchies) {
            return Err(BuildError::InvalidConfiguration(
                errors.iter().cloned().collect(),
            ));
        }

        let mut nodes: HashMap<S, StateNode<S, E, A>> = HashMap::new();
        let mut order: Vec<S> = Vec::new();

        for hierarchy in self.hierarchies {
            for substate in &hierarchy.substates {
                let node = ensure(&mut nodes, &mut order, substate);
                node.parent = Some(hierarchy.superstate.clone());
            }
            let node = ensure(&mut nodes, &mut order, &hierarchy.superstate);
            node.children = hierarchy.substates;
            node.initial = hierarchy.initials.into_iter().next();
            node.history = hierarchy.history;
        }

        for state in self.states {
            let key = state.state;
            ensure(&mut nodes, &mut order, &key);
            for builder in state.transitions {
                let (event, transition) = builder.into_transition(key.clone());
                ensure(&mut nodes, &mut order, &transition.target);
                ensure(&mut nodes, &mut order, &key)
                    .transitions
                    .entry(event)
                    .or_default()
                    .push(transition);
            }
            let node = ensure(&mut nodes, &mut order, &key);
            node.entry_actions.extend(state.entry_actions);
            node.exit_actions.extend(state.exit_actions);
        }

        let roots = order
            .into_iter()
            .filter(|key| nodes.get(key).is_some_and(|n| n.parent.is_none()))
            .collect();

        Ok(StateGraph::from_parts(nodes, roots))
    }
}

impl<S: StateId, E: EventId, A: 'static> Default for StateGraphBuilder<S, E, A> {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure<'n, S: StateId, E: EventId, A>(
    nodes: &'n mut HashMap<S, StateNode<S, E, A>>,
    order: &mut Vec<S>,
    key: &S,
) -> &'n mut StateNode<S, E, A> {
    nodes.entry(key.clone()).or_insert_with(|| {
        order.push(key.clone());
        StateNode::new(key.clone())
    })
}
