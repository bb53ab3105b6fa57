//! Configuration errors raised while building a state graph.

use std::fmt::Debug;
use thiserror::Error;

/// A single problem found in a hierarchy declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError<S: Debug> {
    #[error("Composite state {state:?} has no initial substate and no history policy")]
    MissingInitialSubstate { state: S },

    #[error("Hierarchy on {state:?} declares more than one initial substate: {initials:?}")]
    MultipleInitialSubstates { state: S, initials: Vec<S> },

    #[error("State {state:?} is declared as a substate of both {first:?} and {second:?}")]
    DuplicateSubstate { state: S, first: S, second: S },

    #[error("Hierarchy on {state:?} is declared more than once")]
    DuplicateHierarchy { state: S },

    #[error("State {state:?} is its own ancestor")]
    CyclicHierarchy { state: S },
}

/// Errors that can occur when building a state graph.
#[derive(Debug, Error)]
pub enum BuildError<S: Debug> {
    /// Every configuration problem found, not just the first one.
    #[error("Invalid state machine configuration ({} problem(s)): {0:?}", .0.len())]
    InvalidConfiguration(Vec<ConfigError<S>>),
}

impl<S: Debug> BuildError<S> {
    pub fn problems(&self) -> &[ConfigError<S>] {
        match self {
            BuildError::InvalidConfiguration(problems) => problems,
        }
    }
}
