//! Builder for constructing transitions.

use crate::core::{
    transition_action, ActionEffect, ActionError, EventId, Guard, StateId, Transition, TransitionAction,
    TransitionKind,
};
use std::future::Future;
use std::sync::Arc;

/// Builder for the reaction of a state to one event.
///
/// Without a target the transition is internal: it runs its actions and
/// leaves the active states untouched.
///
/// # Example
///
/// ```
/// use statecraft::builder::TransitionBuilder;
///
/// let external = TransitionBuilder::<&str, &str, u32>::on("coin")
///     .when(|amount: &u32| *amount >= 50)
///     .goto("Unlocked");
///
/// let internal = TransitionBuilder::<&str, &str, u32>::on("coin")
///     .action(|_amount: &u32| async { Ok(()) });
///
/// assert_eq!(external.target_key(), Some(&"Unlocked"));
/// assert_eq!(internal.target_key(), None);
/// ```
pub struct TransitionBuilder<S: StateId, E: EventId, A> {
    event: E,
    target: Option<S>,
    guard: Option<Guard<A>>,
    actions: Vec<TransitionAction<A>>,
}

impl<S: StateId, E: EventId, A: 'static> TransitionBuilder<S, E, A> {
    /// Start a transition triggered by `event`.
    pub fn on(event: E) -> Self {
        Self {
            event,
            target: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Set the target state, making the transition external.
    pub fn goto(mut self, target: S) -> Self {
        self.target = Some(target);
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<A>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Append an async action run between the exit and entry phases.
    pub fn action<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn(&A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.actions.push(transition_action(action));
        self
    }

    /// Append a transition action that builds a Stillwater effect.
    pub fn effect<F>(mut self, effect: F) -> Self
    where
        F: Fn(&A) -> ActionEffect + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(effect));
        self
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn target_key(&self) -> Option<&S> {
        self.target.as_ref()
    }

    /// Attach the transition to its declaring state.
    pub(crate) fn into_transition(self, source: S) -> (E, Transition<S, A>) {
        let (target, kind) = match self.target {
            Some(target) => (target, TransitionKind::External),
            None => (source.clone(), TransitionKind::Internal),
        };
        let transition = Transition {
            source,
            target,
            kind,
            guard: self.guard,
            actions: self.actions,
        };
        (self.event, transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stillwater::prelude::*;

    #[test]
    fn transition_without_target_is_internal() {
        let (event, transition) = TransitionBuilder::<&str, &str, ()>::on("tick")
            .action(|_: &()| async { Ok(()) })
            .into_transition("Idle");

        assert_eq!(event, "tick");
        assert_eq!(transition.kind, TransitionKind::Internal);
        assert_eq!(transition.source, "Idle");
        assert_eq!(transition.target, "Idle");
        assert_eq!(transition.actions.len(), 1);
    }

    #[tokio::test]
    async fn effect_actions_receive_the_payload() {
        let (_, transition) = TransitionBuilder::<&str, &str, u32>::on("coin")
            .effect(|amount: &u32| {
                if *amount >= 50 {
                    pure(()).boxed()
                } else {
                    fail(ActionError::new("not enough")).boxed()
                }
            })
            .into_transition("Locked");

        assert!(transition.actions[0](&60).run(&()).await.is_ok());
        let error = transition.actions[0](&10).run(&()).await.unwrap_err();
        assert_eq!(error.message(), "not enough");
    }

    #[test]
    fn goto_makes_transition_external() {
        let (_, transition) = TransitionBuilder::<&str, &str, ()>::on("start")
            .goto("Running")
            .into_transition("Idle");

        assert_eq!(transition.kind, TransitionKind::External);
        assert_eq!(transition.target, "Running");
        assert!(transition.guard.is_none());
    }

    #[test]
    fn self_goto_stays_external() {
        let (_, transition) = TransitionBuilder::<&str, &str, ()>::on("restart")
            .goto("Idle")
            .into_transition("Idle");

        assert_eq!(transition.kind, TransitionKind::External);
        assert_eq!(transition.source, transition.target);
    }

    #[test]
    fn transition_builder_with_guard() {
        let (_, transition) = TransitionBuilder::<&str, &str, i32>::on("deposit")
            .when(|amount: &i32| *amount > 0)
            .goto("Funded")
            .into_transition("Empty");

        assert!(transition.accepts(&10));
        assert!(!transition.accepts(&-5));
    }

    #[test]
    fn later_guard_replaces_earlier_one() {
        let (_, transition) = TransitionBuilder::<&str, &str, i32>::on("e")
            .when(|_: &i32| false)
            .guard(Guard::new(|_: &i32| true))
            .into_transition("S");

        assert!(transition.accepts(&0));
    }
}
