//! Hierarchy-aware transition resolution.
//!
//! Resolution is pure: it reads the graph, the active path and the history
//! memory and describes what has to happen, without running any action or
//! touching machine state. History updates caused by the exit chain are
//! staged on a copy of the memory and returned with the result.

use super::action::TransitionAction;
use super::graph::{StateGraph, Transition, TransitionKind};
use super::history::HistoryMemory;
use super::state::{EventId, StateId};
use std::fmt;

/// Everything needed to execute one transition.
pub struct ResolvedTransition<S: StateId, A> {
    /// State that declared the matching transition.
    pub source: S,
    pub target: S,
    pub kind: TransitionKind,
    /// States to exit, innermost first. Starts at the active leaf.
    pub exit_chain: Vec<S>,
    /// States to enter, outermost first. Ends at a leaf.
    pub entry_chain: Vec<S>,
    pub actions: Vec<TransitionAction<A>>,
    /// Active path after the transition, root first.
    pub next_path: Vec<S>,
    /// History memory after the exit chain has been recorded.
    pub next_history: HistoryMemory<S>,
}

impl<S: StateId, A> fmt::Debug for ResolvedTransition<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTransition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("exit_chain", &self.exit_chain)
            .field("entry_chain", &self.entry_chain)
            .field("actions", &self.actions.len())
            .field("next_path", &self.next_path)
            .finish()
    }
}

/// Resolves events against a graph.
pub struct Resolver<'g, S: StateId, E: EventId, A> {
    graph: &'g StateGraph<S, E, A>,
}

impl<'g, S: StateId, E: EventId, A> Resolver<'g, S, E, A> {
    pub fn new(graph: &'g StateGraph<S, E, A>) -> Self {
        Self { graph }
    }

    /// Find the transition an event triggers on the active path.
    ///
    /// The path is searched from the leaf outward so substates override their
    /// ancestors; within one state, candidates are tried in declaration order
    /// and the first accepting guard wins.
    pub fn find_transition(
        &self,
        path: &[S],
        event: &E,
        payload: &A,
    ) -> Option<&'g Transition<S, A>> {
        path.iter().rev().find_map(|state| {
            self.graph
                .node(state)?
                .transitions_for(event)
                .iter()
                .find(|t| t.accepts(payload))
        })
    }

    /// Least common ancestor of a transition's source and target.
    ///
    /// `None` stands for the implicit super-root. A target that is the source
    /// itself or one of its ancestors is exited and re-entered, so its parent
    /// is returned. A target below the source keeps the source active.
    pub fn lca(&self, source: &S, target: &S) -> Option<S> {
        if source == target || self.graph.is_ancestor(target, source) {
            return self.graph.parent(target).cloned();
        }
        let source_chain = self.graph.path_to_root(source);
        self.graph
            .path_to_root(target)
            .into_iter()
            .find(|state| source_chain.contains(state))
    }

    /// Active states below the ancestor, innermost first.
    pub fn exit_chain(&self, path: &[S], ancestor: Option<&S>) -> Vec<S> {
        path.iter()
            .rev()
            .take_while(|state| Some(*state) != ancestor)
            .cloned()
            .collect()
    }

    /// States from just below the ancestor down to a leaf under `target`.
    pub fn entry_chain(&self, ancestor: Option<&S>, target: &S, history: &HistoryMemory<S>) -> Vec<S> {
        let down = self.graph.path_from_root(target);
        let start = ancestor
            .and_then(|a| down.iter().position(|state| state == a))
            .map_or(0, |index| index + 1);
        let mut chain = down[start..].to_vec();
        chain.extend(history.resolve_entry(self.graph, target));
        chain
    }

    /// Full path entered when the machine starts in `state`.
    pub fn initial_entry(&self, state: &S, history: &HistoryMemory<S>) -> Vec<S> {
        self.entry_chain(None, state, history)
    }

    /// Resolve an event; `None` means no transition matched.
    pub fn resolve(
        &self,
        path: &[S],
        history: &HistoryMemory<S>,
        event: &E,
        payload: &A,
    ) -> Option<ResolvedTransition<S, A>> {
        let transition = self.find_transition(path, event, payload)?;

        if transition.is_internal() {
            return Some(ResolvedTransition {
                source: transition.source.clone(),
                target: transition.target.clone(),
                kind: TransitionKind::Internal,
                exit_chain: Vec::new(),
                entry_chain: Vec::new(),
                actions: transition.actions.clone(),
                next_path: path.to_vec(),
                next_history: history.clone(),
            });
        }

        let ancestor = self.lca(&transition.source, &transition.target);
        let exit_chain = self.exit_chain(path, ancestor.as_ref());

        let mut next_history = history.clone();
        next_history.record_exit_chain(self.graph, &exit_chain);

        let entry_chain = self.entry_chain(ancestor.as_ref(), &transition.target, &next_history);

        let kept = path.len() - exit_chain.len();
        let mut next_path = path[..kept].to_vec();
        next_path.extend(entry_chain.iter().cloned());

        Some(ResolvedTransition {
            source: transition.source.clone(),
            target: transition.target.clone(),
            kind: TransitionKind::External,
            exit_chain,
            entry_chain,
            actions: transition.actions.clone(),
            next_path,
            next_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{HierarchyBuilder, StateBuilder, StateGraphBuilder, TransitionBuilder};
    use crate::core::graph::HistoryPolicy;

    type Graph = StateGraph<&'static str, &'static str, i32>;

    fn two_trees() -> Graph {
        StateGraphBuilder::new()
            .hierarchy(
                HierarchyBuilder::on("G1")
                    .initial("P1"),
            )
            .hierarchy(
                HierarchyBuilder::on("P1")
                    .initial("S")
                    .substate("SiblingOfS"),
            )
            .hierarchy(HierarchyBuilder::on("G2").initial("P2"))
            .hierarchy(
                HierarchyBuilder::on("P2")
                    .initial("D")
                    .substate("SiblingOfD"),
            )
            .state(StateBuilder::new("S").transition(TransitionBuilder::on("go").goto("D")))
            .build()
            .unwrap()
    }

    fn common_ancestor() -> Graph {
        StateGraphBuilder::new()
            .hierarchy(
                HierarchyBuilder::on("A")
                    .initial("P1")
                    .substate("P2"),
            )
            .hierarchy(HierarchyBuilder::on("P1").initial("S").substate("S2"))
            .hierarchy(HierarchyBuilder::on("P2").initial("D").substate("D2"))
            .state(
                StateBuilder::new("S")
                    .transition(TransitionBuilder::on("go").goto("D2"))
                    .transition(TransitionBuilder::on("self").goto("S"))
                    .transition(TransitionBuilder::on("tick")),
            )
            .state(
                StateBuilder::new("P1")
                    .transition(TransitionBuilder::on("up").goto("P1"))
                    .transition(TransitionBuilder::on("down").goto("S2")),
            )
            .state(
                StateBuilder::new("A")
                    .transition(TransitionBuilder::on("go").goto("D"))
                    .transition(TransitionBuilder::on("reset").goto("A")),
            )
            .build()
            .unwrap()
    }

    fn path(graph: &Graph, leaf: &'static str) -> Vec<&'static str> {
        graph.path_from_root(&leaf)
    }

    #[test]
    fn no_common_ancestor_exits_up_and_enters_down() {
        let g = two_trees();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        let resolved = resolver
            .resolve(&path(&g, "S"), &history, &"go", &0)
            .unwrap();

        assert_eq!(resolved.exit_chain, vec!["S", "P1", "G1"]);
        assert_eq!(resolved.entry_chain, vec!["G2", "P2", "D"]);
        assert_eq!(resolved.next_path, vec!["G2", "P2", "D"]);
        assert_eq!(resolver.lca(&"S", &"D"), None);
    }

    #[test]
    fn common_ancestor_stays_active() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        let resolved = resolver
            .resolve(&path(&g, "S"), &history, &"go", &0)
            .unwrap();

        assert_eq!(resolver.lca(&"S", &"D2"), Some("A"));
        assert_eq!(resolved.exit_chain, vec!["S", "P1"]);
        assert_eq!(resolved.entry_chain, vec!["P2", "D2"]);
        assert_eq!(resolved.next_path, vec!["A", "P2", "D2"]);
    }

    #[test]
    fn innermost_transition_wins() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);

        let transition = resolver
            .find_transition(&path(&g, "S"), &"go", &0)
            .unwrap();

        assert_eq!(transition.source, "S");
        assert_eq!(transition.target, "D2");

        let from_sibling = resolver
            .find_transition(&path(&g, "S2"), &"go", &0)
            .unwrap();
        assert_eq!(from_sibling.source, "A");
    }

    #[test]
    fn self_transition_reenters_state() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        let resolved = resolver
            .resolve(&path(&g, "S"), &history, &"self", &0)
            .unwrap();

        assert_eq!(resolved.exit_chain, vec!["S"]);
        assert_eq!(resolved.entry_chain, vec!["S"]);
        assert_eq!(resolved.kind, TransitionKind::External);
    }

    #[test]
    fn internal_transition_has_no_chains() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();
        let active = path(&g, "S");

        let resolved = resolver.resolve(&active, &history, &"tick", &0).unwrap();

        assert_eq!(resolved.kind, TransitionKind::Internal);
        assert!(resolved.exit_chain.is_empty());
        assert!(resolved.entry_chain.is_empty());
        assert_eq!(resolved.next_path, active);
    }

    #[test]
    fn transition_on_ancestor_exits_from_active_leaf() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        let resolved = resolver
            .resolve(&path(&g, "S2"), &history, &"reset", &0)
            .unwrap();

        assert_eq!(resolved.exit_chain, vec!["S2", "P1", "A"]);
        assert_eq!(resolved.entry_chain, vec!["A", "P1", "S"]);
    }

    #[test]
    fn target_ancestor_is_exited_and_reentered() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        let resolved = resolver
            .resolve(&path(&g, "S2"), &history, &"up", &0)
            .unwrap();

        assert_eq!(resolved.exit_chain, vec!["S2", "P1"]);
        assert_eq!(resolved.entry_chain, vec!["P1", "S"]);
    }

    #[test]
    fn target_descendant_keeps_source_active() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        let resolved = resolver
            .resolve(&path(&g, "S"), &history, &"down", &0)
            .unwrap();

        assert_eq!(resolver.lca(&"P1", &"S2"), Some("P1"));
        assert_eq!(resolved.exit_chain, vec!["S"]);
        assert_eq!(resolved.entry_chain, vec!["S2"]);
    }

    #[test]
    fn unknown_event_does_not_match() {
        let g = common_ancestor();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        assert!(resolver
            .resolve(&path(&g, "S"), &history, &"nothing", &0)
            .is_none());
    }

    #[test]
    fn rejected_guard_falls_through_to_ancestor() {
        let g: Graph = StateGraphBuilder::new()
            .hierarchy(HierarchyBuilder::on("Parent").initial("Child").substate("Other"))
            .state(
                StateBuilder::new("Child").transition(
                    TransitionBuilder::on("e")
                        .when(|n: &i32| *n > 10)
                        .goto("Other"),
                ),
            )
            .state(StateBuilder::new("Parent").transition(TransitionBuilder::on("e").goto("Elsewhere")))
            .build()
            .unwrap();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();
        let active = path(&g, "Child");

        let big = resolver.resolve(&active, &history, &"e", &50).unwrap();
        let small = resolver.resolve(&active, &history, &"e", &1).unwrap();

        assert_eq!(big.target, "Other");
        assert_eq!(small.target, "Elsewhere");
        assert_eq!(small.exit_chain, vec!["Child", "Parent"]);
    }

    #[test]
    fn exit_chain_is_staged_into_history() {
        let g: Graph = StateGraphBuilder::new()
            .hierarchy(
                HierarchyBuilder::on("Player")
                    .history(HistoryPolicy::Shallow)
                    .initial("Stopped")
                    .substate("Playing"),
            )
            .state(StateBuilder::new("Player").transition(TransitionBuilder::on("off").goto("Off")))
            .state(StateBuilder::new("Off").transition(TransitionBuilder::on("on").goto("Player")))
            .build()
            .unwrap();
        let resolver = Resolver::new(&g);
        let history = HistoryMemory::new();

        let off = resolver
            .resolve(&path(&g, "Playing"), &history, &"off", &0)
            .unwrap();
        assert!(history.is_empty());
        assert_eq!(off.next_history.get(&"Player"), Some(&"Playing"));

        let on = resolver
            .resolve(&off.next_path, &off.next_history, &"on", &0)
            .unwrap();
        assert_eq!(on.entry_chain, vec!["Player", "Playing"]);
    }

    #[test]
    fn initial_entry_descends_to_leaf() {
        let g = two_trees();
        let resolver = Resolver::new(&g);

        assert_eq!(
            resolver.initial_entry(&"G2", &HistoryMemory::new()),
            vec!["G2", "P2", "D"]
        );
    }
}
