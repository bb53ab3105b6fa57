//! Action types for entry, exit and transition behavior.
//!
//! Actions are stored as factories: every invocation returns a fresh
//! Stillwater effect, which the invoker runs to completion before starting the
//! next action.

use std::future::Future;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use thiserror::Error;

/// Error raised by a user-supplied action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Effect produced by a single action invocation.
///
/// Actions need no environment, so effects run against `()`.
pub type ActionEffect = BoxedEffect<(), ActionError, ()>;

/// Entry or exit action of a state.
pub type StateAction = Arc<dyn Fn() -> ActionEffect + Send + Sync>;

/// Action attached to a transition; receives the event payload.
pub type TransitionAction<A> = Arc<dyn Fn(&A) -> ActionEffect + Send + Sync>;

/// Wrap an async closure as a [`StateAction`].
///
/// Each call of the returned action builds a fresh effect.
///
/// ```rust
/// use statecraft::core::state_action;
/// use stillwater::effect::Effect;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let action = state_action(|| async { Ok(()) });
/// assert!(action().run(&()).await.is_ok());
/// # }
/// ```
pub fn state_action<F, Fut>(action: F) -> StateAction
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    Arc::new(move || {
        let future = action();
        from_async(move |_: &()| future).boxed()
    })
}

/// Wrap an async closure over the payload as a [`TransitionAction`].
pub fn transition_action<A, F, Fut>(action: F) -> TransitionAction<A>
where
    A: 'static,
    F: Fn(&A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    Arc::new(move |payload: &A| {
        let future = action(payload);
        from_async(move |_: &()| future).boxed()
    })
}
