//! Notification hooks for machine activity.
//!
//! Observers are called from the processing loop, synchronously, between
//! units of work. They must not block.

use crate::core::{EventId, StateId, TransitionKind};
use crate::effects::error::ActionFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Record of one committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S, E> {
    /// The event that triggered the transition
    pub event: E,
    /// Active leaf before the transition
    pub from: S,
    /// Active leaf after the transition
    pub to: S,
    pub kind: TransitionKind,
    /// Exited states, innermost first
    pub exited: Vec<S>,
    /// Entered states, outermost first
    pub entered: Vec<S>,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Receives notifications from a machine's processing loop.
///
/// Every method has a no-op default, so implementors only override what
/// they need.
pub trait MachineObserver<S: StateId, E: EventId>: Send + Sync {
    /// A transition matched and its actions are about to run.
    fn transition_begin(&self, _state: &S, _event: &E) {}

    /// A transition ran to completion and the active path was replaced.
    fn transition_completed(&self, _record: &TransitionRecord<S, E>) {}

    /// No transition on the active path matched the event.
    fn transition_declined(&self, _state: &S, _event: &E) {}

    /// An action failed; the active path was left unchanged.
    fn transition_failed(&self, _failure: &ActionFailure<S>, _event: &E) {}
}

/// A single notification captured by [`RecordingObserver`].
#[derive(Clone, Debug, PartialEq)]
pub enum Notification<S: StateId, E: EventId> {
    Begin { state: S, event: E },
    Completed(TransitionRecord<S, E>),
    Declined { state: S, event: E },
    Failed { failure: ActionFailure<S>, event: E },
}

/// Observer that keeps every notification in memory.
pub struct RecordingObserver<S: StateId, E: EventId> {
    notifications: Mutex<Vec<Notification<S, E>>>,
}

impl<S: StateId, E: EventId> Default for RecordingObserver<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, E: EventId> RecordingObserver<S, E> {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, notification: Notification<S, E>) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }

    /// All notifications in the order they were received.
    pub fn notifications(&self) -> Vec<Notification<S, E>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn completed(&self) -> Vec<TransitionRecord<S, E>> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Completed(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn declined(&self) -> Vec<(S, E)> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Declined { state, event } => Some((state, event)),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(ActionFailure<S>, E)> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Failed { failure, event } => Some((failure, event)),
                _ => None,
            })
            .collect()
    }
}

impl<S: StateId, E: EventId> MachineObserver<S, E> for RecordingObserver<S, E> {
    fn transition_begin(&self, state: &S, event: &E) {
        self.push(Notification::Begin {
            state: state.clone(),
            event: event.clone(),
        });
    }

    fn transition_completed(&self, record: &TransitionRecord<S, E>) {
        self.push(Notification::Completed(record.clone()));
    }

    fn transition_declined(&self, state: &S, event: &E) {
        self.push(Notification::Declined {
            state: state.clone(),
            event: event.clone(),
        });
    }

    fn transition_failed(&self, failure: &ActionFailure<S>, event: &E) {
        self.push(Notification::Failed {
            failure: failure.clone(),
            event: event.clone(),
        });
    }
}
