//! Runtime errors of a machine instance.

use crate::core::ActionError;
use std::fmt::{self, Debug};
use thiserror::Error;

/// Errors raised synchronously by lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("State machine is already initialized")]
    AlreadyInitialized,

    #[error("State machine is not initialized. Call .initialize(state) before .start()")]
    NotInitialized,

    #[error("Unknown state {0}")]
    UnknownState(String),

    #[error("State machine is not started. Call .start() before firing events")]
    NotStarted,

    #[error("State machine is already started")]
    AlreadyStarted,

    #[error("State machine has been stopped")]
    Stopped,
}

/// Phase of a transition in which an action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    Exit,
    Transition,
    Entry,
}

impl fmt::Display for ActionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionPhase::Exit => f.write_str("Exit"),
            ActionPhase::Transition => f.write_str("Transition"),
            ActionPhase::Entry => f.write_str("Entry"),
        }
    }
}

/// An entry, exit or transition action returned an error.
///
/// For transition actions `state` is the state that declared the transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{phase} action of state {state:?} failed: {source}")]
pub struct ActionFailure<S: Debug> {
    pub phase: ActionPhase,
    pub state: S,
    pub source: ActionError,
}

/// Errors returned by [`PassiveMachine::start`](crate::effects::PassiveMachine::start).
#[derive(Debug, Error)]
pub enum MachineError<S: Debug + 'static> {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Action(#[from] ActionFailure<S>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_failure_names_phase_and_state() {
        let failure = ActionFailure {
            phase: ActionPhase::Entry,
            state: "Loading",
            source: ActionError::new("timeout"),
        };

        assert_eq!(
            failure.to_string(),
            "Entry action of state \"Loading\" failed: timeout"
        );
    }

    #[test]
    fn machine_error_wraps_both_kinds() {
        let lifecycle: MachineError<&str> = LifecycleError::NotInitialized.into();
        let action: MachineError<&str> = ActionFailure {
            phase: ActionPhase::Exit,
            state: "A",
            source: ActionError::new("nope"),
        }
        .into();

        assert!(matches!(
            lifecycle,
            MachineError::Lifecycle(LifecycleError::NotInitialized)
        ));
        assert!(matches!(action, MachineError::Action(_)));
        assert!(lifecycle.to_string().contains("not initialized"));
    }
}
