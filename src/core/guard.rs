//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the event payload. A transition
//! whose guard rejects the payload is skipped and the resolver moves on to
//! the next candidate.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Pure predicate that decides whether a transition accepts a payload.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Guard;
///
/// let large_order = Guard::new(|amount: &u32| *amount > 100);
///
/// assert!(large_order.check(&250));
/// assert!(!large_order.check(&20));
/// ```
pub struct Guard<A> {
    predicate: Arc<dyn Fn(&A) -> bool + Send + Sync>,
    _phantom: PhantomData<fn(&A)>,
}

impl<A> Guard<A> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic, free of side effects and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Check if the guard accepts this payload.
    pub fn check(&self, payload: &A) -> bool {
        (self.predicate)(payload)
    }
}

impl<A> Clone for Guard<A> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            _phantom: PhantomData,
        }
    }
}

impl<A> fmt::Debug for Guard<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
