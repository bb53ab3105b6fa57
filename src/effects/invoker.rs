//! Runs the actions of a resolved transition.

use crate::core::{EventId, ResolvedTransition, StateGraph, StateId, TransitionAction};
use crate::effects::error::{ActionFailure, ActionPhase};
use stillwater::effect::Effect;
use tracing::trace;

/// Executes entry, exit and transition actions in order.
///
/// Each action is awaited before the next one starts. The first failure
/// stops the sequence and is returned with the phase and state it came from.
pub struct ActionInvoker<'g, S: StateId, E: EventId, A> {
    graph: &'g StateGraph<S, E, A>,
}

impl<'g, S: StateId, E: EventId, A> ActionInvoker<'g, S, E, A> {
    pub fn new(graph: &'g StateGraph<S, E, A>) -> Self {
        Self { graph }
    }

    /// Run exit actions, innermost state first.
    pub async fn exit(&self, chain: &[S]) -> Result<(), ActionFailure<S>> {
        for state in chain {
            let Some(node) = self.graph.node(state) else {
                continue;
            };
            for action in node.exit_actions() {
                trace!(state = ?state, "running exit action");
                action().run(&()).await.map_err(|source| ActionFailure {
                    phase: ActionPhase::Exit,
                    state: state.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Run the actions attached to a transition.
    pub async fn transition(
        &self,
        source: &S,
        actions: &[TransitionAction<A>],
        payload: &A,
    ) -> Result<(), ActionFailure<S>> {
        for action in actions {
            trace!(state = ?source, "running transition action");
            action(payload).run(&()).await.map_err(|source_error| ActionFailure {
                phase: ActionPhase::Transition,
                state: source.clone(),
                source: source_error,
            })?;
        }
        Ok(())
    }

    /// Run entry actions, outermost state first.
    pub async fn enter(&self, chain: &[S]) -> Result<(), ActionFailure<S>> {
        for state in chain {
            let Some(node) = self.graph.node(state) else {
                continue;
            };
            for action in node.entry_actions() {
                trace!(state = ?state, "running entry action");
                action().run(&()).await.map_err(|source| ActionFailure {
                    phase: ActionPhase::Entry,
                    state: state.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Exit, transition and entry actions of one resolved transition.
    pub async fn execute(
        &self,
        resolved: &ResolvedTransition<S, A>,
        payload: &A,
    ) -> Result<(), ActionFailure<S>> {
        self.exit(&resolved.exit_chain).await?;
        self.transition(&resolved.source, &resolved.actions, payload)
            .await?;
        self.enter(&resolved.entry_chain).await
    }
}
