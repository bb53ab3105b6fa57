//! Validation of hierarchy declarations.
//!
//! Uses Stillwater's `Validation` so that every configuration problem is
//! reported from one `build()` call instead of stopping at the first one.

use crate::builder::error::ConfigError;
use crate::builder::hierarchy::HierarchyBuilder;
use crate::core::{HistoryPolicy, StateId};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of a single configuration check.
pub(crate) type ConfigCheck<S> = Validation<(), NonEmptyVec<ConfigError<S>>>;

/// Run every hierarchy check, accumulating ALL problems.
pub(crate) fn validate_hierarchies<S: StateId>(hierarchies: &[HierarchyBuilder<S>]) -> ConfigCheck<S> {
    let mut checks: Vec<ConfigCheck<S>> = Vec::new();

    checks.extend(duplicate_hierarchies(hierarchies));
    for hierarchy in hierarchies {
        checks.push(initial_substate(hierarchy));
    }
    checks.extend(duplicate_substates(hierarchies));
    checks.extend(cycles(hierarchies));

    Validation::all_vec(checks).map(|_| ())
}

fn duplicate_hierarchies<S: StateId>(hierarchies: &[HierarchyBuilder<S>]) -> Vec<ConfigCheck<S>> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut checks = Vec::new();

    for hierarchy in hierarchies {
        let state = &hierarchy.superstate;
        let check = if !seen.insert(state) && reported.insert(state) {
            Validation::fail(ConfigError::DuplicateHierarchy {
                state: state.clone(),
            })
        } else {
            Validation::success(())
        };
        checks.push(check);
    }

    checks
}

fn initial_substate<S: StateId>(hierarchy: &HierarchyBuilder<S>) -> ConfigCheck<S> {
    let state = hierarchy.superstate.clone();
    match hierarchy.initials.len() {
        0 if hierarchy.history == HistoryPolicy::None && !hierarchy.substates.is_empty() => {
            Validation::fail(ConfigError::MissingInitialSubstate { state })
        }
        0 | 1 => Validation::success(()),
        _ => Validation::fail(ConfigError::MultipleInitialSubstates {
            state,
            initials: hierarchy.initials.clone(),
        }),
    }
}

fn duplicate_substates<S: StateId>(hierarchies: &[HierarchyBuilder<S>]) -> Vec<ConfigCheck<S>> {
    let mut owners: HashMap<&S, &S> = HashMap::new();
    let mut checks = Vec::new();

    for hierarchy in hierarchies {
        for substate in &hierarchy.substates {
            let check = if let Some(first) = owners.get(substate).copied() {
                Validation::fail(ConfigError::DuplicateSubstate {
                    state: substate.clone(),
                    first: first.clone(),
                    second: hierarchy.superstate.clone(),
                })
            } else {
                owners.insert(substate, &hierarchy.superstate);
                Validation::success(())
            };
            checks.push(check);
        }
    }

    checks
}

fn cycles<S: StateId>(hierarchies: &[HierarchyBuilder<S>]) -> Vec<ConfigCheck<S>> {
    let mut parents: HashMap<&S, &S> = HashMap::new();
    for hierarchy in hierarchies {
        for substate in &hierarchy.substates {
            parents.entry(substate).or_insert(&hierarchy.superstate);
        }
    }

    let mut reported = HashSet::new();
    let mut checks = Vec::new();

    for hierarchy in hierarchies {
        let start = &hierarchy.superstate;
        let mut visited = HashSet::new();
        let mut cursor = parents.get(start).copied();
        let mut cyclic = false;

        while let Some(current) = cursor {
            if current == start {
                cyclic = true;
                break;
            }
            if !visited.insert(current) {
                break;
            }
            cursor = parents.get(current).copied();
        }

        let check = if cyclic && reported.insert(start) {
            Validation::fail(ConfigError::CyclicHierarchy {
                state: start.clone(),
            })
        } else {
            Validation::success(())
        };
        checks.push(check);
    }

    checks
}
