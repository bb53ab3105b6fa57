//! Property-based tests for transition resolution.
//!
//! These tests use proptest to generate random state hierarchies and check
//! that resolved exit and entry chains are always well-formed.

use proptest::prelude::*;
use proptest::sample::Index;
use statecraft::builder::{HierarchyBuilder, StateBuilder, StateGraphBuilder, TransitionBuilder};
use statecraft::core::{Guard, HistoryMemory, HistoryPolicy, Resolver, StateGraph};
use std::collections::BTreeMap;

type Graph = StateGraph<u32, &'static str, ()>;

/// A random forest: `parents[i]` is the parent of state `i + 1`; state 0 is always a root.
#[derive(Debug, Clone)]
struct Forest {
    parents: Vec<Option<u32>>,
    policies: Vec<HistoryPolicy>,
}

impl Forest {
    fn size(&self) -> u32 {
        self.parents.len() as u32 + 1
    }

    fn children(&self) -> BTreeMap<u32, Vec<u32>> {
        let mut children: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (offset, parent) in self.parents.iter().enumerate() {
            if let Some(parent) = parent {
                children.entry(*parent).or_default().push(offset as u32 + 1);
            }
        }
        children
    }

    fn graph(&self, source: u32, target: u32) -> Graph {
        let mut builder = StateGraphBuilder::new();
        for (parent, children) in self.children() {
            let policy = self.policies[parent as usize % self.policies.len()];
            builder = builder.hierarchy(
                HierarchyBuilder::on(parent)
                    .history(policy)
                    .initial(children[0])
                    .substates(children[1..].iter().copied()),
            );
        }
        builder
            .states((0..self.size()).map(StateBuilder::new))
            .state(StateBuilder::new(source).transition(TransitionBuilder::on("go").goto(target)))
            .build()
            .unwrap()
    }
}

fn arbitrary_policy() -> impl Strategy<Value = HistoryPolicy> {
    prop_oneof![
        Just(HistoryPolicy::None),
        Just(HistoryPolicy::Shallow),
        Just(HistoryPolicy::Deep),
    ]
}

prop_compose! {
    fn arbitrary_forest()(
        links in prop::collection::vec((any::<bool>(), any::<Index>()), 0..12),
        policies in prop::collection::vec(arbitrary_policy(), 1..4),
    ) -> Forest {
        let parents = links
            .iter()
            .enumerate()
            .map(|(offset, (detached, index))| {
                // earlier states only, so the result is always acyclic
                (!detached).then(|| index.index(offset + 1) as u32)
            })
            .collect();
        Forest { parents, policies }
    }
}

fn assert_descends(graph: &Graph, chain: &[u32]) -> Result<(), TestCaseError> {
    for pair in chain.windows(2) {
        prop_assert_eq!(graph.parent(&pair[1]), Some(&pair[0]));
    }
    Ok(())
}

proptest! {
    #[test]
    fn resolved_chains_are_well_formed(
        forest in arbitrary_forest(),
        start in any::<Index>(),
        declaring in any::<Index>(),
        target in any::<Index>(),
    ) {
        let size = forest.size() as usize;
        let start = start.index(size) as u32;
        let target = target.index(size) as u32;

        // Pick the declaring state among the states active after entering `start`.
        let start_graph = forest.graph(start, start);
        let path = Resolver::new(&start_graph).initial_entry(&start, &HistoryMemory::new());
        let source = *declaring.get(&path);

        let graph = forest.graph(source, target);
        let resolver = Resolver::new(&graph);
        let history = HistoryMemory::new();
        let resolved = resolver.resolve(&path, &history, &"go", &()).unwrap();
        let ancestor = resolver.lca(&source, &target);

        // exit chain climbs from the active leaf
        prop_assert_eq!(resolved.exit_chain.first(), path.last());
        for pair in resolved.exit_chain.windows(2) {
            prop_assert_eq!(graph.parent(&pair[0]), Some(&pair[1]));
        }

        // neither chain touches the common ancestor or anything above it
        if let Some(ancestor) = &ancestor {
            let above = graph.path_to_root(ancestor);
            for state in resolved.exit_chain.iter().chain(&resolved.entry_chain) {
                prop_assert!(!above.contains(state));
            }
        }

        // entry chain starts just below the ancestor, passes the target and ends at a leaf
        let first = resolved.entry_chain[0];
        prop_assert_eq!(graph.parent(&first).copied(), ancestor);
        prop_assert!(resolved.entry_chain.contains(&target));
        assert_descends(&graph, &resolved.entry_chain)?;
        prop_assert!(!graph.is_composite(resolved.entry_chain.last().unwrap()));

        // the new active path is a complete root-to-leaf chain
        prop_assert_eq!(graph.parent(&resolved.next_path[0]), None);
        assert_descends(&graph, &resolved.next_path)?;
        prop_assert_eq!(resolved.next_path.last(), resolved.entry_chain.last());
    }

    #[test]
    fn resolution_is_deterministic(
        forest in arbitrary_forest(),
        start in any::<Index>(),
        target in any::<Index>(),
    ) {
        let size = forest.size() as usize;
        let start = start.index(size) as u32;
        let target = target.index(size) as u32;
        let graph = forest.graph(start, target);
        let resolver = Resolver::new(&graph);
        let path = resolver.initial_entry(&start, &HistoryMemory::new());
        let history = HistoryMemory::new();

        let first = resolver.resolve(&path, &history, &"go", &()).unwrap();
        let second = resolver.resolve(&path, &history, &"go", &()).unwrap();

        prop_assert_eq!(first.exit_chain, second.exit_chain);
        prop_assert_eq!(first.entry_chain, second.entry_chain);
        prop_assert_eq!(first.next_path, second.next_path);
    }

    #[test]
    fn deep_history_reentry_is_idempotent(
        forest in arbitrary_forest(),
        start in any::<Index>(),
    ) {
        let size = forest.size() as usize;
        let start = start.index(size) as u32;
        let deep = Forest {
            parents: forest.parents.clone(),
            policies: vec![HistoryPolicy::Deep],
        };
        let graph = deep.graph(start, start);
        let resolver = Resolver::new(&graph);
        let path = resolver.initial_entry(&start, &HistoryMemory::new());

        // exit everything, then re-enter the root through its remembered path
        let mut history = HistoryMemory::new();
        let leaving: Vec<u32> = path.iter().rev().copied().collect();
        history.record_exit_chain(&graph, &leaving);
        let restored = resolver.initial_entry(&path[0], &history);

        let mut again = history.clone();
        let leaving_again: Vec<u32> = restored.iter().rev().copied().collect();
        again.record_exit_chain(&graph, &leaving_again);

        prop_assert_eq!(&restored, &path);
        prop_assert_eq!(resolver.initial_entry(&path[0], &again), restored);
    }

    #[test]
    fn guard_is_deterministic(threshold in 0u32..100, value in 0u32..100) {
        let guard = Guard::new(move |v: &u32| *v >= threshold);
        prop_assert_eq!(guard.check(&value), guard.check(&value));
        prop_assert_eq!(guard.check(&value), value >= threshold);
    }
}
